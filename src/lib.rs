//! insight-hub
//!
//! Command-line front end for a document question-answering service: ask
//! questions of indexed documents and see cited answers, upload files for
//! indexing, and check service health.
//!
//! All retrieval and answer generation happens in the remote service; this
//! crate only talks to it through [`insight_hub_sdk::Client`].
//!
//! # Modules
//!
//! - [`config`]: command line and layered configuration
//! - [`commands`]: subcommand execution
//! - [`render`]: terminal formatting of responses
//! - [`session`]: interactive chat with an in-memory transcript
//! - [`telemetry`]: logging setup

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod commands;
pub mod config;
pub mod render;
pub mod session;
pub mod telemetry;
