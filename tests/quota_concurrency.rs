//! Concurrency tests: a simultaneous burst for one identifier must
//! admit exactly the daily limit, end to end through the HTTP layer.

use std::sync::Arc;

use serde_json::json;

use chat_gateway::quota::InMemoryQuotaStore;
use chat_gateway::GatewayConfig;

mod common;
use common::{spawn_gateway, ScriptedBackend};

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_burst_admits_exactly_the_limit() {
    let limit = 10u32;
    let requests = 30usize;

    let mut config = GatewayConfig::default();
    config.admission.daily_request_limit = limit;
    let (addr, shutdown) = spawn_gateway(
        config,
        Arc::new(InMemoryQuotaStore::new()),
        Arc::new(ScriptedBackend { answer: "ok" }),
    )
    .await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("http://{addr}/api/public/chat/message"))
                .json(&json!({"message": "hello", "session_id": "burst-1"}))
                .send()
                .await
                .expect("gateway unreachable")
                .status()
                .as_u16()
        }));
    }

    let mut admitted = 0;
    let mut denied = 0;
    for handle in handles {
        match handle.await.unwrap() {
            200 => admitted += 1,
            429 => denied += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(admitted, limit as usize, "no double-count, no lost update");
    assert_eq!(denied, requests - limit as usize);

    shutdown.trigger();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_identifiers_do_not_interfere() {
    let mut config = GatewayConfig::default();
    config.admission.daily_request_limit = 5;
    let (addr, shutdown) = spawn_gateway(
        config,
        Arc::new(InMemoryQuotaStore::new()),
        Arc::new(ScriptedBackend { answer: "ok" }),
    )
    .await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut handles = Vec::new();
    for session in 0..6 {
        for _ in 0..5 {
            let client = client.clone();
            let session_id = format!("ident-{session}");
            handles.push(tokio::spawn(async move {
                client
                    .post(format!("http://{addr}/api/public/chat/message"))
                    .json(&json!({"message": "hello", "session_id": session_id}))
                    .send()
                    .await
                    .expect("gateway unreachable")
                    .status()
                    .as_u16()
            }));
        }
    }

    for handle in handles {
        assert_eq!(
            handle.await.unwrap(),
            200,
            "each identifier has its own budget"
        );
    }

    shutdown.trigger();
}
