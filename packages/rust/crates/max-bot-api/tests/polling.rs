#![allow(missing_docs)]

mod scripted_transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use max_bot_api::schemes::{Update, UpdateType};
use max_bot_api::{
    ApiRequest, BotApi, ClassifiedError, ClientConfig, DownloadedFile, MultipartUpload,
    PollingOptions, Transport, UpdatesQuery,
};

use scripted_transport::{
    ScriptedTransport, api_over, long_poll_timeout, message_created, server_error, updates_page,
    wait_for_requests,
};

fn mid_of(update: &Update) -> &str {
    match update {
        Update::MessageCreated(created) => created.message.body.mid.as_str(),
        other => panic!("unexpected update: {other:?}"),
    }
}

async fn next_update(stream: &mut max_bot_api::UpdateStream) -> Update {
    tokio::time::timeout(Duration::from_secs(5), stream.recv())
        .await
        .expect("update should arrive")
        .expect("stream should stay open")
}

#[tokio::test]
async fn polling_delivers_pages_in_order_and_advances_marker() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport
        .reply_json(updates_page(
            vec![message_created("m1", 7, "one"), message_created("m2", 7, "two")],
            Some(10),
        ))
        .reply_json(updates_page(vec![message_created("m3", 7, "three")], Some(12)));
    let api = api_over(&transport);

    let mut stream = api.start_polling_with(PollingOptions {
        limit: 5_000,
        types: vec![UpdateType::MessageCreated, UpdateType::MessageCallback],
        ..PollingOptions::default()
    });

    let mut mids = Vec::new();
    for _ in 0..3 {
        mids.push(mid_of(&next_update(&mut stream).await).to_string());
    }
    assert_eq!(mids, vec!["m1", "m2", "m3"]);

    wait_for_requests(&transport, 3).await;
    let requests = transport.requests();
    let first = &requests[0].request;
    assert_eq!(first.path, "updates");
    assert_eq!(first.query_value("marker"), None);
    assert_eq!(first.query_value("limit"), Some("1000"));
    assert_eq!(first.query_value("timeout"), Some("30"));
    assert_eq!(
        first.query_value("types"),
        Some("message_created,message_callback")
    );
    assert_eq!(first.timeout, Some(Duration::from_secs(35)));
    assert_eq!(requests[1].request.query_value("marker"), Some("10"));
    assert_eq!(requests[2].request.query_value("marker"), Some("12"));

    stream.stop().await;
    Ok(())
}

#[tokio::test]
async fn polling_marker_never_moves_backwards() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport
        .reply_json(updates_page(vec![message_created("m1", 1, "a")], Some(20)))
        .reply_json(updates_page(vec![message_created("m2", 1, "b")], Some(5)))
        .reply_json(updates_page(Vec::new(), None));
    let api = api_over(&transport);
    let mut stream = api.start_polling();

    next_update(&mut stream).await;
    next_update(&mut stream).await;
    wait_for_requests(&transport, 4).await;

    let markers: Vec<Option<String>> = transport
        .requests()
        .iter()
        .map(|recorded| recorded.request.query_value("marker").map(str::to_string))
        .collect();
    assert_eq!(
        markers,
        vec![
            None,
            Some("20".to_string()),
            Some("20".to_string()),
            Some("20".to_string()),
        ]
    );

    stream.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn polling_repolls_immediately_after_long_poll_timeout() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport
        .fail(long_poll_timeout())
        .reply_json(updates_page(vec![message_created("m1", 1, "late")], Some(3)));
    let api = api_over(&transport);
    let mut stream = api.start_polling();

    assert_eq!(mid_of(&next_update(&mut stream).await), "m1");
    let requests = transport.requests();
    assert_eq!(requests[1].at.duration_since(requests[0].at), Duration::ZERO);

    stream.stop().await;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn polling_pauses_after_failures_and_keeps_going() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport
        .fail(server_error())
        .fail(server_error())
        .reply_json(updates_page(vec![message_created("m1", 1, "back")], Some(4)));
    let api = api_over(&transport);
    let options = PollingOptions {
        pause: Duration::from_millis(1_500),
        ..PollingOptions::default()
    };
    let mut stream = api.start_polling_with(options);

    assert_eq!(mid_of(&next_update(&mut stream).await), "m1");
    let requests = transport.requests();
    assert!(requests.len() >= 3);
    for pair in requests[..3].windows(2) {
        assert!(pair[1].at.duration_since(pair[0].at) >= Duration::from_millis(1_500));
    }
    // Failed polls never move the marker.
    assert_eq!(requests[2].request.query_value("marker"), None);

    stream.stop().await;
    Ok(())
}

#[tokio::test]
async fn cancelling_the_stream_closes_the_channel() -> Result<()> {
    let transport = ScriptedTransport::new();
    let api = api_over(&transport);
    let mut stream = api.start_polling();

    wait_for_requests(&transport, 1).await;
    stream.cancel();
    assert!(stream.is_cancelled());

    let closed = tokio::time::timeout(Duration::from_secs(5), stream.recv()).await?;
    assert!(closed.is_none());
    assert!(!api.cancellation_token().is_cancelled());
    Ok(())
}

#[tokio::test]
async fn client_shutdown_stops_every_stream() -> Result<()> {
    let transport = ScriptedTransport::new();
    let api = api_over(&transport);
    let mut first = api.start_polling();
    let mut second = api.start_polling();

    api.shutdown();

    assert!(tokio::time::timeout(Duration::from_secs(5), first.recv()).await?.is_none());
    assert!(tokio::time::timeout(Duration::from_secs(5), second.recv()).await?.is_none());
    assert!(first.is_cancelled());
    assert!(second.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn cancellation_wins_over_a_full_channel() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport.reply_json(updates_page(
        vec![
            message_created("m1", 1, "a"),
            message_created("m2", 1, "b"),
            message_created("m3", 1, "c"),
        ],
        Some(9),
    ));
    let api = api_over(&transport);
    let mut stream = api.start_polling_with(PollingOptions {
        capacity: 1,
        ..PollingOptions::default()
    });

    wait_for_requests(&transport, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    stream.cancel();

    let mut drained = 0;
    while let Some(_update) = tokio::time::timeout(Duration::from_secs(5), stream.recv()).await? {
        drained += 1;
    }
    assert!(drained <= 1, "only the buffered update may be drained");
    Ok(())
}

#[tokio::test]
async fn dropping_the_receiver_stops_the_loop() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport.reply_json(updates_page(vec![message_created("m1", 1, "x")], Some(2)));
    let api = api_over(&transport);
    let (receiver, cancel, task) = api.start_polling().into_parts();
    drop(receiver);

    tokio::time::timeout(Duration::from_secs(5), task).await??;
    assert_eq!(transport.request_count(), 1);
    assert!(!cancel.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn undecodable_updates_are_skipped_not_fatal() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport.reply_json(updates_page(
        vec![
            serde_json::json!({"update_type": "brand_new_event", "timestamp": 1}),
            message_created("m1", 1, "kept"),
            serde_json::json!({"update_type": "message_created", "timestamp": "soon"}),
        ],
        Some(6),
    ));
    let api = api_over(&transport);

    let page = api.get_updates_page(&UpdatesQuery::default()).await?;
    assert_eq!(page.skipped, 2);
    assert_eq!(page.marker, Some(6));
    assert_eq!(page.updates.len(), 1);
    assert_eq!(mid_of(&page.updates[0]), "m1");
    Ok(())
}

#[tokio::test]
async fn malformed_page_envelope_is_a_serialization_error() -> Result<()> {
    let transport = ScriptedTransport::new();
    transport.reply("<html>gateway</html>");
    let api = api_over(&transport);

    let error = api
        .get_updates_page(&UpdatesQuery::default())
        .await
        .expect_err("envelope should not decode");
    assert!(matches!(
        error,
        max_bot_api::ClassifiedError::Serialization { .. }
    ));
    Ok(())
}

/// Answers every poll at once with the same reply.
struct InstantTransport {
    reply: fn() -> Result<String, ClassifiedError>,
    calls: AtomicUsize,
}

impl InstantTransport {
    fn api(reply: fn() -> Result<String, ClassifiedError>) -> (Arc<Self>, BotApi) {
        let transport = Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        });
        let api = BotApi::with_transport(
            ClientConfig::new("test-token"),
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        (transport, api)
    }
}

#[async_trait]
impl Transport for InstantTransport {
    async fn execute(&self, _request: ApiRequest) -> Result<String, ClassifiedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.reply)()
    }

    async fn upload(&self, _upload: MultipartUpload) -> Result<String, ClassifiedError> {
        Ok(String::new())
    }

    async fn download(&self, _url: &str) -> Result<DownloadedFile, ClassifiedError> {
        Ok(DownloadedFile::default())
    }
}

async fn assert_cancel_closes_busy_stream(
    transport: &InstantTransport,
    mut stream: max_bot_api::UpdateStream,
) {
    let idle = tokio::time::timeout(Duration::from_millis(50), stream.recv()).await;
    assert!(idle.is_err(), "no updates expected");
    assert!(transport.calls.load(Ordering::SeqCst) > 1);

    stream.cancel();
    let closed = tokio::time::timeout(Duration::from_secs(5), stream.recv())
        .await
        .expect("channel should close after cancel");
    assert!(closed.is_none());
}

#[tokio::test]
async fn instant_timeouts_do_not_starve_cancellation() {
    let (transport, api) = InstantTransport::api(|| Err(long_poll_timeout()));
    let stream = api.start_polling();
    assert_cancel_closes_busy_stream(&transport, stream).await;
}

#[tokio::test]
async fn instant_empty_pages_do_not_starve_cancellation() {
    let (transport, api) =
        InstantTransport::api(|| Ok(r#"{"updates":[],"marker":null}"#.to_string()));
    let stream = api.start_polling();
    assert_cancel_closes_busy_stream(&transport, stream).await;
}
