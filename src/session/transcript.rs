//! In-memory record of a chat session.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, Utc};
use insight_hub_sdk::QueryResponse;
use serde::Serialize;

/// One answered question.
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    /// Position in the session, starting at 1.
    pub id: u64,
    pub question: String,
    pub answer: String,
    /// Distinct citation sources, most relevant first.
    pub sources: Vec<String>,
    pub confidence: f64,
    pub asked_at: DateTime<Utc>,
}

impl Exchange {
    fn matches(&self, needle: &str) -> bool {
        self.question.to_lowercase().contains(needle) || self.answer.to_lowercase().contains(needle)
    }
}

/// Session transcript, newest exchange first.
#[derive(Debug, Default)]
pub struct Transcript {
    exchanges: Vec<Exchange>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answered question and return the stored exchange.
    pub fn record(&mut self, question: impl Into<String>, response: &QueryResponse) -> &Exchange {
        self.next_id += 1;
        let exchange = Exchange {
            id: self.next_id,
            question: question.into(),
            answer: response.answer.clone(),
            sources: response.sources().into_iter().map(ToString::to_string).collect(),
            confidence: response.confidence,
            asked_at: Utc::now(),
        };
        self.exchanges.insert(0, exchange);
        &self.exchanges[0]
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// Exchanges whose question or answer contains `term`, ignoring case.
    ///
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Exchange> {
        let needle = term.trim().to_lowercase();
        self.exchanges
            .iter()
            .filter(|e| needle.is_empty() || e.matches(&needle))
            .collect()
    }

    /// Drop all exchanges. Numbering continues where it left off.
    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Markdown export, oldest exchange first.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Chat transcript\n");
        for e in self.exchanges.iter().rev() {
            let _ = write!(
                out,
                "\n## {}\n\n_{}_\n\n{}\n",
                e.question,
                e.asked_at.to_rfc3339(),
                e.answer.trim()
            );
            if !e.sources.is_empty() {
                let _ = write!(out, "\nSources: {}\n", e.sources.join(", "));
            }
        }
        out
    }

    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_markdown())
    }
}
