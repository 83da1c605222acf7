//! Initialization with the level endpoint enabled. Own binary: the
//! process-wide logger is initialized here.

use corrlog::{Level, LoggingConfig};
use serde_json::{json, Value};

mod common;

const ACTIVE_PREFIX: &str = "Logger HTTP Server active on ";

fn active_records(capture: &common::Captured) -> Vec<String> {
    capture
        .out
        .records()
        .into_iter()
        .filter_map(|r| r["msg"].as_str().map(str::to_string))
        .filter(|msg| msg.starts_with(ACTIVE_PREFIX))
        .collect()
}

#[tokio::test]
async fn test_init_serves_level_endpoint_once() {
    let capture = common::Captured::new();
    let mut config = LoggingConfig::new(false, true);
    config.level_endpoint.bind_address = "127.0.0.1:0".to_string();

    corrlog::init_with(capture.builder(config));

    let started = capture.records_with_msg("Logger initialized successfully");
    assert_eq!(started.len(), 1);
    assert_eq!(started[0]["logger_modes"], json!(["prod", "serveHttp"]));

    let active = active_records(&capture);
    assert_eq!(active.len(), 1);
    let target = active[0].trim_start_matches(ACTIVE_PREFIX);
    assert!(target.starts_with("127.0.0.1:"));
    assert!(target.ends_with("/loglevel"));

    let url = format!("http://{}", target);
    let client = reqwest::Client::new();
    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"level": "info"}));

    let res = client.put(&url).body("error").send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(corrlog::level().level(), Level::Error);

    // A second init neither rebinds nor logs startup again.
    corrlog::init(false, true);
    corrlog::init_with(capture.builder(LoggingConfig::new(true, true)));

    assert_eq!(capture.records_with_msg("Logger initialized successfully").len(), 1);
    assert_eq!(active_records(&capture).len(), 1);
    assert!(capture.err.contents().is_empty());

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"level": "error"}));
}
