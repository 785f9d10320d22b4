//! Interactive chat sessions.
//!
//! A session keeps its transcript in memory only; `/save` is the one way
//! to write it out.

pub mod chat;
pub mod transcript;

pub use chat::{Input, InputError, parse_input};
pub use transcript::{Exchange, Transcript};
