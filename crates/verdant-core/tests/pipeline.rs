//! End-to-end pipeline tests: a real HTTP endpoint (a one-shot canned
//! server on a loopback socket), the production sampler, and the poll
//! controller wired together.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use verdant_core::{
    Condition, FallbackReason, Metric, PollConfig, PollController, RuleTable, SampleOrigin,
    Sampler, SampleSource,
};

/// Serve one canned HTTP response, then close. Returns the endpoint URL.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request head; one read is enough for a GET.
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len(),
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}/sensor")
}

fn live_config(endpoint_url: String) -> PollConfig {
    PollConfig {
        use_mock: false,
        endpoint_url,
        poll_interval: Duration::from_secs(3600),
    }
}

#[test]
fn live_fetch_feeds_the_dashboard() {
    let url = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"temperature":32.0,"humidity":35.0,"soil":20.0,"light":100.0,"nutrient":1.9}"#,
    );
    let ctl = PollController::new(live_config(url), RuleTable::default(), 8);
    ctl.poll_once();

    let snap = ctl.snapshot();
    let sample = snap.latest.as_ref().unwrap();
    assert_eq!(sample.origin, SampleOrigin::Live);
    assert_eq!(sample.reading.soil, Some(20.0));
    assert_eq!(
        sample.reading.extra.get("nutrient"),
        Some(&serde_json::json!(1.9)),
    );
    assert_eq!(snap.soil.last().copied().flatten(), Some(20.0));

    // The stressed reading triggers all four alerts, dry soil first.
    let advisory = snap.advisory.as_ref().unwrap();
    assert_eq!(advisory.headline, "Soil too dry — consider watering soon.");
    assert_eq!(advisory.tips.len(), 4);
    assert_eq!(advisory.condition(Metric::Light), Some(Condition::Alert));
}

#[test]
fn partial_body_renders_as_gaps_not_errors() {
    let url = serve_once("HTTP/1.1 200 OK", r#"{"temperature":21.0}"#);
    let ctl = PollController::new(live_config(url), RuleTable::default(), 4);
    ctl.poll_once();

    let snap = ctl.snapshot();
    assert_eq!(snap.latest.as_ref().unwrap().origin, SampleOrigin::Live);
    assert_eq!(snap.temperature.last().copied().flatten(), Some(21.0));
    // Missing metrics become gaps in their series and stay unclassified.
    assert_eq!(snap.soil.last().copied().flatten(), None);
    let advisory = snap.advisory.as_ref().unwrap();
    assert_eq!(advisory.condition(Metric::Soil), None);
}

#[test]
fn bad_status_falls_back_to_mock() {
    let url = serve_once("HTTP/1.1 503 Service Unavailable", "overloaded");
    let sampler = Sampler::new();
    let sample = sampler.fetch_one(&live_config(url));
    assert_eq!(
        sample.origin,
        SampleOrigin::Fallback(FallbackReason::BadStatus),
    );
    assert!(sample.reading.is_complete());
}

#[test]
fn malformed_body_falls_back_to_mock() {
    let url = serve_once("HTTP/1.1 200 OK", "<html>not a sensor</html>");
    let sampler = Sampler::new();
    let sample = sampler.fetch_one(&live_config(url));
    assert_eq!(
        sample.origin,
        SampleOrigin::Fallback(FallbackReason::BadBody),
    );
    assert!(sample.reading.is_complete());
}

#[test]
fn fallback_sample_still_produces_an_advisory() {
    let config = live_config("http://127.0.0.1:9/sensor".to_string());
    let ctl = PollController::new(config, RuleTable::default(), 4);
    ctl.poll_once();

    let snap = ctl.snapshot();
    let sample = snap.latest.as_ref().unwrap();
    assert!(sample.origin.is_fallback());
    assert!(sample.reading.is_complete());
    assert!(snap.advisory.is_some());
}

#[test]
fn scheduled_polling_fills_the_window() {
    let source: Arc<dyn SampleSource> = Arc::new(Sampler::new());
    let config = PollConfig {
        poll_interval: Duration::from_millis(20),
        ..Default::default()
    };
    let mut ctl = PollController::with_source(source, config, RuleTable::default(), 4);

    ctl.start();
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while std::time::Instant::now() < deadline && ctl.snapshot().tick_count < 5 {
        thread::sleep(Duration::from_millis(10));
    }
    ctl.stop();

    let snap = ctl.snapshot();
    assert!(snap.tick_count >= 5);
    assert_eq!(snap.temperature.len(), 4);
    assert!(snap.temperature.iter().all(|v| v.is_some()));
}
