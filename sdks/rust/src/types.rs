//! Request and response types for the query/ingest API.
//!
//! Every type here is a request- or response-scoped value; nothing is cached
//! between calls.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::file_type::FileType;

/// Number of citations requested when the caller does not say otherwise.
pub const DEFAULT_TOP_K: u32 = 5;

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

// =============================================================================
// Query API Types
// =============================================================================

/// Request body for `POST /query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language question.
    pub question: String,
    /// Upper bound on the number of citations returned.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl QueryRequest {
    /// Create a request with the default `top_k`.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Override the citation bound.
    #[must_use]
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k;
        self
    }

    /// Reject blank questions and a zero `top_k`.
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(Error::invalid_request("question must not be empty"));
        }
        if self.top_k == 0 {
            return Err(Error::invalid_request("top_k must be at least 1"));
        }
        Ok(())
    }
}

/// A source excerpt backing part of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Source identifier, usually the ingested filename.
    pub source: String,
    /// Excerpt text.
    pub text: String,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
}

/// Response body for `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Citations, most relevant first.
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Overall answer confidence in `[0, 1]`, independent of citation scores.
    pub confidence: f64,
    pub processing_time_seconds: f64,
}

impl QueryResponse {
    /// Check score ranges and citation ordering.
    ///
    /// The server is expected to uphold both; this is for callers that do
    /// not trust it.
    pub fn verify(&self) -> std::result::Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        for (i, c) in self.citations.iter().enumerate() {
            if !(0.0..=1.0).contains(&c.score) {
                return Err(format!(
                    "citation {i} ({}) has score {} outside [0, 1]",
                    c.source, c.score
                ));
            }
        }
        if let Some(i) = self
            .citations
            .windows(2)
            .position(|w| w[1].score > w[0].score)
        {
            return Err(format!(
                "citations not ordered by score: {} at position {} outranks {}",
                self.citations[i + 1].score,
                i + 1,
                self.citations[i].score
            ));
        }
        Ok(())
    }

    /// Distinct citation sources, in citation order.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for c in &self.citations {
            if !seen.contains(&c.source.as_str()) {
                seen.push(c.source.as_str());
            }
        }
        seen
    }
}

// =============================================================================
// Ingest API Types
// =============================================================================

/// A file to upload to `POST /ingest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    /// Filename sent with the multipart part.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Explicit category; the server classifies when absent.
    pub file_type: Option<FileType>,
}

impl IngestRequest {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            file_type: None,
        }
    }

    /// Set an explicit file-type override.
    #[must_use]
    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = Some(file_type);
        self
    }

    /// Tag the upload with the locally classified type.
    #[must_use]
    pub fn with_inferred_type(mut self) -> Self {
        self.file_type = Some(FileType::from_filename(&self.filename));
        self
    }

    /// Read a file from disk, using its final path component as the filename.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::File {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, bytes))
    }

    /// Reject uploads without a filename.
    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(Error::invalid_request("filename must not be empty"));
        }
        Ok(())
    }
}

/// Response body for `POST /ingest`.
///
/// Counts are server-computed. What makes two chunks duplicates is decided
/// entirely by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub filename: String,
    pub file_type: String,
    pub chunks_extracted: u64,
    pub chunks_added: u64,
    pub duplicates_skipped: u64,
    pub processing_time_seconds: f64,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Health API Types
// =============================================================================

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub text_vectors: u64,
    #[serde(default)]
    pub image_vectors: u64,
}

impl HealthStatus {
    /// Whether the reported status reads as healthy.
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}
