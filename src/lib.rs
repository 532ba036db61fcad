//! NPU Chat - single-flight chat gateway for an NPU-hosted language model
//!
//! A browser posts a question, the gateway optionally prepends recent replies
//! as context, forwards the prompt to the inference backend, and returns the
//! answer. Only one backend call runs at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              Chat UI (axum)                   │
//! │     GET /   │   POST /search   │   /ready     │
//! └──────────────────────┬───────────────────────┘
//!                        │
//! ┌──────────────────────▼───────────────────────┐
//! │             InferenceGateway                  │
//! │  control commands │ gate │ prompt composition │
//! └──────────┬───────────────────────┬───────────┘
//!            │                       │
//! ┌──────────▼─────────┐   ┌─────────▼───────────┐
//! │    ContextStore    │   │   Backend (HTTP)     │
//! └────────────────────┘   └─────────────────────┘
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod gateway;
pub mod render;

/// Application name shown in logs
pub const APP_NAME: &str = "NPU Chat";

pub use backend::{Backend, BackendError, HttpBackend, Prompt};
pub use config::Config;
pub use context::ContextStore;
pub use error::{Error, GatewayError, Result};
pub use gateway::{ControlCommand, InferenceGateway, Input};
