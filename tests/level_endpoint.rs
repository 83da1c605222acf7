//! The `/loglevel` endpoint over a real socket.

use corrlog::admin::spawn_level_endpoint;
use corrlog::http::X_CORRELATION_ID;
use corrlog::{Level, LoggingConfig};
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_level_endpoint_round_trip() {
    let capture = common::Captured::new();
    let logger = capture.builder(LoggingConfig::production()).build().unwrap();
    let addr = spawn_level_endpoint("127.0.0.1:0".parse().unwrap(), logger.clone()).unwrap();
    let url = format!("http://{}/loglevel", addr);
    let client = reqwest::Client::new();

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"level": "info"}));

    let res = client
        .put(&url)
        .header(X_CORRELATION_ID, "cli-1")
        .body("debug")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()[X_CORRELATION_ID], "cli-1");
    assert_eq!(logger.level(), Level::Debug);

    let res = client
        .post(&url)
        .json(&json!({"level": "warn"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(logger.level(), Level::Warn);

    let res = client.put(&url).body("chatty").send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(logger.level(), Level::Warn);

    let res = client.delete(&url).send().await.unwrap();
    assert_eq!(res.status(), 405);

    let changes = capture.records_with_msg("log level changed");
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0]["correlation_id"], "cli-1");
    assert_eq!(changes[0]["to"], "debug");
}

#[test]
fn test_bind_failure_is_returned() {
    let capture = common::Captured::new();
    let logger = capture.builder(LoggingConfig::production()).build().unwrap();
    let (_held, addr) = common::occupied_port();

    assert!(spawn_level_endpoint(addr, logger).is_err());
}
