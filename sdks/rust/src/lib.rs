//! Rust SDK for insight-hub
//!
//! A typed client for the document query/ingest service: ask questions
//! against indexed documents and get answers with citations, upload files
//! for indexing, and check service health.
//!
//! ```rust,no_run
//! use insight_hub_sdk::{Client, FileType, IngestRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://localhost:8000")?;
//!
//!     let health = client.health().await?;
//!     println!("{} text vectors indexed", health.text_vectors);
//!
//!     let upload = IngestRequest::new("notes.pdf", std::fs::read("notes.pdf")?)
//!         .with_file_type(FileType::Pdf);
//!     let ingested = client.ingest(upload).await?;
//!     println!("{} new chunks", ingested.chunks_added);
//!
//!     let answer = client.query("What are the key findings?").await?;
//!     println!("{}", answer.answer);
//!
//!     Ok(())
//! }
//! ```
//!
//! Failures come back as [`Error`], which separates unreachable servers
//! ([`Error::Network`]), server rejections ([`Error::Server`]), undecodable
//! bodies ([`Error::Decode`]) and requests refused before sending
//! ([`Error::InvalidRequest`]).

pub mod client;
pub mod error;
pub mod file_type;
pub mod types;

// Re-exports
pub use client::{Body, Client, ClientBuilder, RequestOptions};
pub use error::{Error, Result};
pub use file_type::{FileType, ParseFileTypeError};
pub use reqwest::header;
pub use types::*;
