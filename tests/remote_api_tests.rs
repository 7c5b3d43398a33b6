//! End-to-end tests against a local allocator service
//!
//! Each test starts an axum server on a loopback port and drives the
//! provider through the real `ureq` transport.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;

use neo_ccams::hal::{MockAircraftRoster, MockConnection, MockControllerData, MockLogger};
use neo_ccams::model::{Aircraft, Flightplan, ServerType};
use neo_ccams::{
    AssignmentSource, CcamsConfig, CcamsProvider, FallbackReason, HostServices, LogLevel,
};

#[derive(Clone, Default)]
struct Seen {
    queries: Arc<Mutex<Vec<String>>>,
    user_agents: Arc<Mutex<Vec<String>>>,
}

async fn record(
    State(seen): State<Seen>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> &'static str {
    seen.queries.lock().unwrap().push(query.unwrap_or_default());
    let ua = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    seen.user_agents.lock().unwrap().push(ua);
    "2345"
}

/// Serve `router` on a fresh loopback port from a background runtime.
fn spawn_server(router: Router) -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

fn config_for(addr: SocketAddr) -> CcamsConfig {
    CcamsConfig::default()
        .with_api_base(&format!("http://{addr}"))
        .with_https_only(false)
        .with_connect_timeout_ms(2_000)
        .with_read_timeout_ms(500)
        .with_write_timeout_ms(2_000)
}

fn build_provider(config: CcamsConfig, server: ServerType) -> (CcamsProvider, Arc<MockLogger>) {
    let logger = Arc::new(MockLogger::new());
    let host = HostServices::new(
        Arc::new(MockConnection::connected("LFPG_APP", server)),
        Arc::new(MockAircraftRoster::new(vec![
            Aircraft::new("BAW1", "2301"),
            Aircraft::new("BAW2", "2302"),
        ])),
        Arc::new(MockControllerData::default()),
        logger.clone(),
    );
    let provider = CcamsProvider::with_default_client(config, host).unwrap();
    (provider, logger)
}

fn ifr() -> Flightplan {
    Flightplan::ifr("AFR123", "LFPG", "KJFK")
}

#[test]
fn padded_body_is_trimmed() {
    let router = Router::new().route("/squawk", get(|| async { " 4321 \n" }));
    let addr = spawn_server(router);
    let (provider, logger) = build_provider(config_for(addr), ServerType::Live);

    let assignment = provider.assign("AFR123", &Aircraft::default(), &ifr());

    assert_eq!(assignment.code, "4321");
    assert_eq!(assignment.source, AssignmentSource::Remote);
    assert!(!logger.has_errors());
}

#[test]
fn request_query_and_user_agent_reach_the_service() {
    let seen = Seen::default();
    let router = Router::new()
        .route("/squawk", get(record))
        .with_state(seen.clone());
    let addr = spawn_server(router);
    let (provider, _logger) = build_provider(config_for(addr), ServerType::Sweatbox);

    provider.assign("AFR123", &Aircraft::default(), &ifr());
    provider.assign("AFR124", &Aircraft::default(), &ifr());

    let queries = seen.queries.lock().unwrap().clone();
    assert_eq!(
        queries[0],
        "callsign=LFPG_APP&origin=LFPG&dest=KJFK&flightrule=I&connectiontype=1&codes=2301,2302&sim"
    );
    assert!(queries[1].contains("codes=2345,2301,2302"));
    assert!(seen
        .user_agents
        .lock()
        .unwrap()
        .iter()
        .all(|ua| ua == "neoradar/0.1.0"));
}

#[test]
fn slow_service_times_out_into_fallback() {
    let router = Router::new().route(
        "/squawk",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "1234"
        }),
    );
    let addr = spawn_server(router);
    let (provider, logger) = build_provider(config_for(addr), ServerType::Live);

    let started = Instant::now();
    let assignment = provider.assign("AFR123", &Aircraft::default(), &ifr());

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(
        assignment.source,
        AssignmentSource::Fallback(FallbackReason::AllocationFailed)
    );
    assert!(assignment.code.is_assignable());
    let errors = logger.messages_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("timed out"), "{}", errors[0]);
}

#[test]
fn server_error_falls_back() {
    let router = Router::new().route(
        "/squawk",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "4321") }),
    );
    let addr = spawn_server(router);
    let (provider, logger) = build_provider(config_for(addr), ServerType::Live);

    let assignment = provider.assign("AFR123", &Aircraft::default(), &ifr());

    assert_eq!(
        assignment.source,
        AssignmentSource::Fallback(FallbackReason::AllocationFailed)
    );
    assert!(provider.issued_codes().is_empty());
    assert!(logger.messages_at(LogLevel::Error)[0].contains("500"));
}

#[test]
fn unreachable_service_falls_back() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let (provider, logger) = build_provider(config_for(addr), ServerType::Live);

    let assignment = provider.assign("AFR123", &Aircraft::default(), &ifr());

    assert_eq!(
        assignment.source,
        AssignmentSource::Fallback(FallbackReason::AllocationFailed)
    );
    assert!(logger.has_errors());
}

#[test]
fn plain_http_is_refused_by_default() {
    let config = CcamsConfig::default().with_api_base("http://127.0.0.1:9");
    assert!(config.validate().is_err());
}
