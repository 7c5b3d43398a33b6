//! Integration tests for the CCAMS provider pipeline

use std::sync::Arc;
use std::thread;

use neo_ccams::hal::{
    MockAircraftRoster, MockConnection, MockControllerData, MockHttpClient, MockLogger,
};
use neo_ccams::model::{Aircraft, ControllerData, Flightplan, ServerType};
use neo_ccams::{
    AssignmentSource, CcamsConfig, CcamsProvider, FallbackReason, HostServices, HttpResponse,
    LogLevel, SquawkProvider, TransportError,
};

struct Harness {
    provider: CcamsProvider<Arc<MockHttpClient>>,
    http: Arc<MockHttpClient>,
    aircraft: Arc<MockAircraftRoster>,
    controller_data: Arc<MockControllerData>,
    logger: Arc<MockLogger>,
}

fn harness(connection: MockConnection) -> Harness {
    let http = Arc::new(MockHttpClient::new());
    let aircraft = Arc::new(MockAircraftRoster::default());
    let controller_data = Arc::new(MockControllerData::default());
    let logger = Arc::new(MockLogger::new());
    let host = HostServices::new(
        Arc::new(connection),
        aircraft.clone(),
        controller_data.clone(),
        logger.clone(),
    );
    let provider = CcamsProvider::new(CcamsConfig::default(), host, http.clone()).unwrap();
    Harness {
        provider,
        http,
        aircraft,
        controller_data,
        logger,
    }
}

fn connected() -> Harness {
    harness(MockConnection::connected("LFPG_APP", ServerType::Live))
}

fn is_octal_code(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| (b'0'..=b'7').contains(&b))
}

// ============================================================================
// Special codes
// ============================================================================

#[test]
fn vfr_flight_gets_7000_without_network() {
    let h = connected();
    let fp = Flightplan::ifr("FABCD", "LFPG", "EGLL").vfr();

    let code = h
        .provider
        .generate_squawk("FABCD", &Aircraft::default(), &fp);

    assert_eq!(code, "7000");
    assert_eq!(h.http.call_count(), 0);
    assert_eq!(h.aircraft.reads(), 0);
}

#[test]
fn mode_s_flight_gets_1000_without_network() {
    let h = connected();
    let fp = Flightplan::ifr("DLH4", "EDDF", "LFPG").with_equipment("L");

    let assignment = h.provider.assign("DLH4", &Aircraft::default(), &fp);

    assert_eq!(assignment.code, "1000");
    assert_eq!(assignment.source, AssignmentSource::ModeS);
    assert_eq!(h.http.call_count(), 0);
}

#[test]
fn mode_s_needs_both_airports_and_equipment() {
    let h = connected();
    h.http.push_response(HttpResponse::ok("2201"));
    h.http.push_response(HttpResponse::ok("2202"));
    h.http.push_response(HttpResponse::ok("2203"));

    // Excluded Polish aerodrome
    let fp = Flightplan::ifr("LOT1", "EPKS", "LFPG").with_equipment("S");
    assert_eq!(h.provider.generate_squawk("LOT1", &Aircraft::default(), &fp), "2201");

    // LFV* is outside the French Mode-S area
    let fp = Flightplan::ifr("AFR2", "LFVP", "LFPG").with_equipment("S");
    assert_eq!(h.provider.generate_squawk("AFR2", &Aircraft::default(), &fp), "2202");

    // No Mode-S equipment letter
    let fp = Flightplan::ifr("AFR3", "LFPO", "LFPG").with_equipment("A");
    assert_eq!(h.provider.generate_squawk("AFR3", &Aircraft::default(), &fp), "2203");

    assert_eq!(h.http.call_count(), 3);
}

// ============================================================================
// Remote allocation
// ============================================================================

#[test]
fn remote_code_is_trimmed_and_returned() {
    let h = connected();
    h.http.push_response(HttpResponse::ok(" 4321 \n"));
    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

    let assignment = h.provider.assign("AFR123", &Aircraft::default(), &fp);

    assert_eq!(assignment.code, "4321");
    assert_eq!(assignment.source, AssignmentSource::Remote);
    assert!(!h.logger.has_errors());
}

#[test]
fn request_carries_in_use_codes_in_order() {
    let h = connected();
    h.aircraft.set(vec![
        Aircraft::new("BAW1", "2301"),
        Aircraft::new("BAW2", "7000"),
        Aircraft::new("BAW3", "bad!"),
        Aircraft::new("BAW4", "2302"),
    ]);
    h.controller_data.set(vec![
        ControllerData::new("BAW1", "2301"),
        ControllerData::new("EZY9", "2303"),
        ControllerData::new("EZY8", ""),
    ]);
    h.http.push_response(HttpResponse::ok("2304"));

    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");
    h.provider.generate_squawk("AFR123", &Aircraft::default(), &fp);

    let request = &h.http.requests()[0];
    assert_eq!(request.query("callsign").as_deref(), Some("LFPG_APP"));
    assert_eq!(request.query("origin").as_deref(), Some("LFPG"));
    assert_eq!(request.query("dest").as_deref(), Some("KJFK"));
    assert_eq!(request.query("flightrule").as_deref(), Some("I"));
    assert_eq!(request.query("connectiontype").as_deref(), Some("1"));
    assert_eq!(request.query("codes").as_deref(), Some("2301,2302,2303"));
    assert_eq!(request.query("sim"), None);
    assert_eq!(request.header("user-agent"), Some("neoradar/0.1.0"));
}

#[test]
fn issued_codes_are_reported_first_on_later_requests() {
    let h = connected();
    h.aircraft.set(vec![Aircraft::new("BAW1", "2301")]);
    h.http.push_response(HttpResponse::ok("4321"));
    h.http.push_response(HttpResponse::ok("4322"));
    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

    h.provider.generate_squawk("AFR123", &Aircraft::default(), &fp);
    h.provider.generate_squawk("AFR124", &Aircraft::default(), &fp);

    let requests = h.http.requests();
    assert_eq!(requests[0].query("codes").as_deref(), Some("2301"));
    assert_eq!(requests[1].query("codes").as_deref(), Some("4321,2301"));
    assert_eq!(h.provider.issued_codes().len(), 2);
}

#[test]
fn simulation_servers_flag_the_request() {
    for server in [ServerType::Test, ServerType::Sweatbox] {
        let h = harness(MockConnection::connected("LFPG_APP", server));
        h.http.push_response(HttpResponse::ok("2345"));
        let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

        h.provider.generate_squawk("AFR123", &Aircraft::default(), &fp);

        let request = &h.http.requests()[0];
        assert_eq!(request.query("sim").as_deref(), Some(""));
        assert!(request.url.as_str().ends_with("&sim"));
    }
}

// ============================================================================
// Fallback
// ============================================================================

#[test]
fn disconnected_controller_never_touches_network() {
    let h = harness(MockConnection::disconnected());
    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

    let assignment = h.provider.assign("AFR123", &Aircraft::default(), &fp);

    assert!(is_octal_code(assignment.code.as_str()));
    assert_eq!(
        assignment.source,
        AssignmentSource::Fallback(FallbackReason::NoConnection)
    );
    assert_eq!(h.http.call_count(), 0);
    assert_eq!(h.aircraft.reads(), 0);
}

#[test]
fn malformed_bodies_fall_back_to_local_code() {
    for body in ["abcd", "", "123", "12345", "8123", "0000", "<html>"] {
        let h = connected();
        h.http.push_response(HttpResponse::ok(body));
        let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

        let assignment = h.provider.assign("AFR123", &Aircraft::default(), &fp);

        assert!(is_octal_code(assignment.code.as_str()), "body {body:?}");
        assert_ne!(assignment.code, "0000");
        assert_eq!(
            assignment.source,
            AssignmentSource::Fallback(FallbackReason::AllocationFailed),
            "body {body:?}"
        );
        assert!(h.logger.has_errors());
        assert!(h.provider.issued_codes().is_empty());
    }
}

#[test]
fn timeout_logs_error_and_falls_back() {
    let h = connected();
    h.http
        .push_error(TransportError::Timeout("no response within 30s".into()));
    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

    let assignment = h.provider.assign("AFR123", &Aircraft::default(), &fp);

    assert!(is_octal_code(assignment.code.as_str()));
    let errors = h.logger.messages_at(LogLevel::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("AFR123"));
}

#[test]
fn non_success_status_falls_back() {
    let h = connected();
    h.http.push_response(HttpResponse::new(503, "1234"));
    let fp = Flightplan::ifr("AFR123", "LFPG", "KJFK");

    let assignment = h.provider.assign("AFR123", &Aircraft::default(), &fp);

    assert_eq!(
        assignment.source,
        AssignmentSource::Fallback(FallbackReason::AllocationFailed)
    );
    assert!(h.logger.messages_at(LogLevel::Error)[0].contains("503"));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_assignments_record_every_issued_code() {
    let h = connected();
    let codes = ["2101", "2102", "2103", "2104", "2105", "2106", "2107", "2110"];
    for code in codes {
        h.http.push_response(HttpResponse::ok(code));
    }
    let provider = Arc::new(h.provider);

    let handles: Vec<_> = (0..codes.len())
        .map(|i| {
            let provider = provider.clone();
            thread::spawn(move || {
                let callsign = format!("AFR{i}");
                let fp = Flightplan::ifr(&callsign, "LFPG", "KJFK");
                provider.generate_squawk(&callsign, &Aircraft::default(), &fp)
            })
        })
        .collect();

    let mut assigned: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().to_string())
        .collect();
    assigned.sort();

    assert_eq!(assigned, codes);
    assert_eq!(provider.issued_codes().len(), codes.len());
    assert_eq!(h.http.call_count(), codes.len());
}
