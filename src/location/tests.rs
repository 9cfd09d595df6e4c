//! Node-level tests driven by an in-memory transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};

use crate::config::{NodeOptions, NODE_OPTIONS_API_VERSION};
use crate::error_handling::{ErrorKind, NodeError, TransportError};
use crate::transport::{HttpResponse, ResponseFuture, Transport};

use super::*;

const ENDPOINT: &str = "http://geo.test";

const FULL_BODY: &str = r#"{"ip":"8.8.8.8","country_code":"US","country_name":"United States","region_code":"CA","region_name":"California","city":"Mountain View","zip_code":"94035","time_zone":"America/Los_Angeles","latitude":37.386,"longitude":-122.0838,"metro_code":807}"#;

type Responder = oneshot::Sender<Option<HttpResponse>>;

/// Transport whose requests complete only when the test says so.
#[derive(Default)]
struct ManualTransport {
    requests: Mutex<Vec<(String, Responder)>>,
}

impl ManualTransport {
    fn urls(&self) -> Vec<String> {
        let requests = self.requests.lock().unwrap();
        requests.iter().map(|(url, _)| url.clone()).collect()
    }

    fn take(&self) -> Vec<(String, Responder)> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

impl Transport for ManualTransport {
    fn get(&self, url: &str) -> Result<ResponseFuture, TransportError> {
        let (tx, rx) = oneshot::channel();
        self.requests.lock().unwrap().push((url.to_string(), tx));
        Ok(async move { rx.await.unwrap_or(None) }.boxed())
    }
}

struct RefusingTransport;

impl Transport for RefusingTransport {
    fn get(&self, _url: &str) -> Result<ResponseFuture, TransportError> {
        Err(TransportError::Unavailable("no client".to_string()))
    }
}

fn options(max_pending: usize) -> NodeOptions {
    NodeOptions {
        max_pending,
        ..NodeOptions::new(ENDPOINT)
    }
}

fn open_node(
    max_pending: usize,
) -> (
    LocationNode,
    Arc<ManualTransport>,
    mpsc::UnboundedReceiver<LocationEvent>,
) {
    let transport = Arc::new(ManualTransport::default());
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let node = LocationNode::open(&options(max_pending), transport.clone(), events_tx).unwrap();
    (node, transport, events_rx)
}

fn drain(events: &mut mpsc::UnboundedReceiver<LocationEvent>) -> Vec<LocationEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

async fn complete_next(node: &mut LocationNode) -> RequestId {
    let completion = tokio::time::timeout(Duration::from_secs(5), node.next_completion())
        .await
        .expect("completion should arrive")
        .expect("completion channel open");
    let id = completion.id;
    node.on_completion(completion);
    id
}

#[test]
fn test_open_rejects_other_api_version() {
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let options = NodeOptions {
        api_version: NODE_OPTIONS_API_VERSION + 1,
        ..NodeOptions::new(ENDPOINT)
    };
    let result = LocationNode::open(&options, Arc::new(ManualTransport::default()), events_tx);
    assert!(matches!(result, Err(NodeError::InvalidConfiguration(_))));
}

#[test]
fn test_open_rejects_empty_endpoint() {
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let result = LocationNode::open(
        &NodeOptions::new(""),
        Arc::new(ManualTransport::default()),
        events_tx,
    );
    assert!(matches!(result, Err(NodeError::InvalidConfiguration(_))));
}

#[test]
fn test_open_copies_endpoint() {
    let mut options = options(4);
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let node = LocationNode::open(&options, Arc::new(ManualTransport::default()), events_tx).unwrap();
    options.endpoint.clear();
    assert_eq!(node.endpoint(), ENDPOINT);
    assert_eq!(node.pending_len(), 0);
}

#[tokio::test]
async fn test_resolve_urls() {
    let (mut node, transport, _events) = open_node(8);

    node.process(&Trigger::ResolveSelf).unwrap();
    node.process(&Trigger::ResolveAddress(Packet::from("8.8.8.8")))
        .unwrap();

    assert_eq!(
        transport.urls(),
        vec![
            "http://geo.test/json/".to_string(),
            "http://geo.test/json/8.8.8.8".to_string()
        ]
    );
    assert_eq!(node.pending_len(), 2);
}

#[tokio::test]
async fn test_resolve_address_requires_string_payload() {
    let (mut node, transport, mut events) = open_node(8);

    let result = node.process(&Trigger::ResolveAddress(Packet::Boolean(true)));
    assert_eq!(
        result,
        Err(NodeError::InvalidPacket {
            expected: "string",
            actual: "boolean"
        })
    );
    assert!(transport.urls().is_empty());
    assert_eq!(node.pending_len(), 0);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_resolve_transport_unavailable() {
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let mut node = LocationNode::open(&options(8), Arc::new(RefusingTransport), events_tx).unwrap();

    let result = node.resolve(Some("1.1.1.1"));
    assert!(matches!(result, Err(NodeError::TransportUnavailable(_))));
    assert_eq!(node.pending_len(), 0);
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_resolve_url_too_long_issues_nothing() {
    let (mut node, transport, _events) = open_node(8);
    let address = "a".repeat(crate::config::MAX_QUERY_URL_LENGTH);

    let result = node.resolve(Some(&address));
    assert!(matches!(result, Err(NodeError::InvalidConfiguration(_))));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn test_resolve_beyond_capacity_is_resource_exhausted() {
    let (mut node, transport, mut events) = open_node(1);

    node.resolve(Some("1.1.1.1")).unwrap();
    let result = node.resolve(Some("2.2.2.2"));
    assert!(matches!(result, Err(NodeError::ResourceExhausted(_))));
    assert_eq!(node.pending_len(), 1);

    // The rejected request was cancelled, so answering it produces nothing
    let mut requests = transport.take();
    let (_, rejected) = requests.pop().unwrap();
    let _ = rejected.send(Some(HttpResponse::new(200, FULL_BODY)));
    tokio::task::yield_now().await;
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_successful_lookup_emits_fields_then_location() {
    let (mut node, transport, mut events) = open_node(8);
    let id = node.resolve(Some("8.8.8.8")).unwrap();

    for (_, responder) in transport.take() {
        responder
            .send(Some(HttpResponse::new(200, FULL_BODY)))
            .unwrap();
    }
    assert_eq!(complete_next(&mut node).await, id);
    assert_eq!(node.pending_len(), 0);

    let events = drain(&mut events);
    assert_eq!(events.len(), 7);
    let ports: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            LocationEvent::Field { port, .. } => Some(*port),
            _ => None,
        })
        .collect();
    assert_eq!(
        ports,
        vec![
            OutputPort::Ip,
            OutputPort::CountryCode,
            OutputPort::CountryName,
            OutputPort::CityName,
            OutputPort::ZipCode,
            OutputPort::Timezone
        ]
    );
    match events.last() {
        Some(LocationEvent::Location(location)) => {
            assert_eq!(location.latitude, 37.386);
            assert_eq!(location.longitude, -122.0838);
            assert!(location.altitude.is_nan());
        }
        other => panic!("expected a location event last, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_remote_emits_error() {
    let (mut node, transport, mut events) = open_node(8);
    node.resolve(None).unwrap();

    // Dropping the responder completes the request without a response
    drop(transport.take());
    complete_next(&mut node).await;

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    match &events[0] {
        LocationEvent::Error(error) => {
            assert_eq!(error.kind, ErrorKind::RemoteUnreachable);
            assert_eq!(error.message, "Error while reaching FreeGeoIP");
        }
        other => panic!("expected an error event, got {:?}", other),
    }
}

#[tokio::test]
async fn test_completions_out_of_order() {
    let (mut node, transport, mut events) = open_node(8);
    let first = node.resolve(Some("1.1.1.1")).unwrap();
    let second = node.resolve(Some("2.2.2.2")).unwrap();
    assert_ne!(first, second);

    let mut requests = transport.take();
    let (_, second_responder) = requests.pop().unwrap();
    let (_, first_responder) = requests.pop().unwrap();

    second_responder
        .send(Some(HttpResponse::new(404, "not found")))
        .unwrap();
    assert_eq!(complete_next(&mut node).await, second);
    assert_eq!(node.pending_len(), 1);

    first_responder
        .send(Some(HttpResponse::new(200, r#"{"ip":"1.1.1.1"}"#)))
        .unwrap();
    assert_eq!(complete_next(&mut node).await, first);
    assert_eq!(node.pending_len(), 0);

    let events = drain(&mut events);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        &events[0],
        LocationEvent::Error(e) if e.kind == ErrorKind::RemoteStatus
    ));
    assert!(matches!(
        &events[1],
        LocationEvent::Field { port: OutputPort::Ip, value } if value == "1.1.1.1"
    ));
}

#[tokio::test]
async fn test_unknown_completion_is_still_decoded() {
    let (mut node, _transport, mut events) = open_node(8);

    node.on_completion(Completion {
        id: 999,
        outcome: Some(HttpResponse::new(200, "")),
    });

    let events = drain(&mut events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        LocationEvent::Error(e) if e.kind == ErrorKind::EmptyResponse
    ));
}

#[tokio::test]
async fn test_close_cancels_all_pending_requests() {
    let (mut node, transport, mut events) = open_node(64);
    for i in 0..10 {
        node.resolve(Some(&format!("10.0.0.{}", i))).unwrap();
    }
    assert_eq!(node.pending_len(), 10);

    assert_eq!(node.close(), 10);
    assert_eq!(node.pending_len(), 0);
    assert_eq!(node.close(), 0, "close should be idempotent");

    for (_, responder) in transport.take() {
        let _ = responder.send(Some(HttpResponse::new(200, FULL_BODY)));
    }
    tokio::task::yield_now().await;
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_resolve_after_close_fails() {
    let (mut node, transport, _events) = open_node(8);
    node.close();

    assert_eq!(node.resolve(Some("8.8.8.8")), Err(NodeError::NodeClosed));
    assert_eq!(node.process(&Trigger::ResolveSelf), Err(NodeError::NodeClosed));
    assert!(transport.urls().is_empty());
}

#[tokio::test]
async fn test_spawned_node_waits_idle() {
    let (node, transport, mut events) = open_node(8);
    let (handle, task) = spawn_node(node);

    handle.resolve("8.8.8.8").await.unwrap();
    handle.resolve_self().await.unwrap();
    assert_eq!(handle.pending(), 2);

    for (_, responder) in transport.take() {
        responder
            .send(Some(HttpResponse::new(200, FULL_BODY)))
            .unwrap();
    }
    tokio::time::timeout(Duration::from_secs(5), handle.wait_idle())
        .await
        .expect("node should become idle");
    assert_eq!(handle.pending(), 0);

    handle.shutdown();
    task.await.unwrap();
    assert_eq!(drain(&mut events).len(), 14);
}

#[tokio::test]
async fn test_spawned_node_reports_trigger_errors() {
    let (node, _transport, _events) = open_node(8);
    let (handle, task) = spawn_node(node);

    let result = handle
        .process(Trigger::ResolveAddress(Packet::Float(4.0)))
        .await;
    assert!(matches!(result, Err(NodeError::InvalidPacket { .. })));
    assert_eq!(handle.pending(), 0);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_spawned_node_shutdown_cancels_requests() {
    let (node, transport, mut events) = open_node(8);
    let (handle, task) = spawn_node(node);

    for i in 0..3 {
        handle.resolve(format!("192.0.2.{}", i)).await.unwrap();
    }
    assert_eq!(handle.pending(), 3);

    handle.shutdown();
    task.await.unwrap();
    assert_eq!(handle.pending(), 0);
    assert_eq!(handle.resolve_self().await, Err(NodeError::NodeClosed));

    for (_, responder) in transport.take() {
        let _ = responder.send(Some(HttpResponse::new(200, FULL_BODY)));
    }
    assert!(drain(&mut events).is_empty());
}

#[tokio::test]
async fn test_spawned_node_stops_when_handles_dropped() {
    let (node, _transport, _events) = open_node(8);
    let (handle, task) = spawn_node(node);
    drop(handle);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("node should stop")
        .unwrap();
}
