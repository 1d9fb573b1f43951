//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::net::TcpListener;

use chat_gateway::chat::{ChatBackend, ChatBackendError, ChatReply};
use chat_gateway::net::BoundedListener;
use chat_gateway::quota::{QuotaStore, QuotaUsage, StoreError};
use chat_gateway::{GatewayConfig, HttpServer, Shutdown};

/// Chat backend double that returns a canned answer.
pub struct ScriptedBackend {
    pub answer: &'static str,
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn reply(
        &self,
        _message: &str,
        _session_id: &str,
    ) -> Result<ChatReply, ChatBackendError> {
        Ok(ChatReply {
            answer: self.answer.to_string(),
            model: "scripted".to_string(),
        })
    }
}

/// Chat backend double that always fails.
#[allow(dead_code)]
pub struct FailingBackend;

#[async_trait]
impl ChatBackend for FailingBackend {
    async fn reply(
        &self,
        _message: &str,
        _session_id: &str,
    ) -> Result<ChatReply, ChatBackendError> {
        Err(ChatBackendError::Upstream("scripted failure".to_string()))
    }
}

/// Quota store double simulating an outage.
#[allow(dead_code)]
pub struct UnreachableStore;

#[async_trait]
impl QuotaStore for UnreachableStore {
    async fn try_increment(
        &self,
        _identifier: &str,
        _date: NaiveDate,
        _limit: u32,
    ) -> Result<QuotaUsage, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn usage(&self, _identifier: &str, _date: NaiveDate) -> Result<u32, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// Start a gateway on an ephemeral port. The returned `Shutdown` keeps
/// the server alive; trigger it to stop.
pub async fn spawn_gateway(
    config: GatewayConfig,
    store: Arc<dyn QuotaStore>,
    chat: Arc<dyn ChatBackend>,
) -> (SocketAddr, Shutdown) {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let listener = BoundedListener::new(tcp, config.listener.max_connections);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config, store, chat);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
