#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the Ogem AI proxy
//!
//! [`Client`] is async; [`blocking::Client`] offers the same resources
//! without a runtime. Server errors are classified into [`OgemError`]
//! variants, and [`RetryPolicy`] retries the transient ones.
//!
//! ```no_run
//! use ogem_client::{ChatCompletionRequest, Client, ClientConfig, Message};
//!
//! # async fn demo() -> ogem_client::Result<()> {
//! let client = Client::new(ClientConfig::new("http://localhost:8080", "sk-...")?)?;
//!
//! let request = ChatCompletionRequest::new("gpt-4o", vec![Message::user("Hello!")]).max_tokens(50);
//! let completion = client.chat().completions().create(&request).await?;
//! println!("{}", completion.content().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "blocking")]
pub mod blocking;
mod client;
mod config;
mod endpoint;
pub mod error;
mod http;
pub mod resources;
mod retry;
mod sse;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use error::{ErrorBody, ErrorKind, OgemError, Result, classify};
pub use http::USER_AGENT;
pub use retry::{RetryPolicy, is_retryable, retry_delay};
pub use types::*;
