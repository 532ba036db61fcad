//! Shared test utilities
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use npu_chat::{Backend, BackendError, ContextStore, InferenceGateway, Prompt};
use tokio::sync::{Mutex, Notify};

/// Mock backend that records prompts and can be held mid-call
pub struct MockBackend {
    reply: Result<String, BackendError>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Prompt>>,
    hold: bool,
    entered: Notify,
    release: Notify,
}

impl MockBackend {
    /// Backend that answers immediately
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self::build(Ok(reply.to_string()), false))
    }

    /// Backend that answers only after [`MockBackend::release`]
    pub fn held(reply: &str) -> Arc<Self> {
        Arc::new(Self::build(Ok(reply.to_string()), true))
    }

    /// Backend that always fails
    pub fn failing(err: BackendError) -> Arc<Self> {
        Arc::new(Self::build(Err(err), false))
    }

    fn build(reply: Result<String, BackendError>, hold: bool) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            hold,
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until a call has reached the backend
    pub async fn wait_entered(&self) {
        tokio::time::timeout(Duration::from_secs(5), self.entered.notified())
            .await
            .expect("backend was never called");
    }

    /// Let a held call finish
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Number of calls that reached the backend
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far
    pub async fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.clone());
        self.entered.notify_one();
        if self.hold {
            self.release.notified().await;
        }
        self.reply.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Gateway over a mock backend with a fresh context
pub fn gateway_with(
    backend: Arc<MockBackend>,
    enabled: bool,
    max_depth: usize,
) -> (InferenceGateway, Arc<ContextStore>) {
    let context = Arc::new(ContextStore::new(enabled, max_depth, true));
    let gateway = InferenceGateway::new(context.clone(), backend, Duration::from_secs(5));
    (gateway, context)
}

/// Wait until the gateway's gate is free again
pub async fn wait_idle(gateway: &InferenceGateway) {
    for _ in 0..500 {
        if !gateway.is_busy() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("gate was never released");
}
