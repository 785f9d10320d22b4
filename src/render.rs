//! Terminal rendering of API responses.

use std::fmt::Write as _;

use insight_hub_sdk::{FileType, HealthStatus, IngestResponse, QueryResponse};
use serde::Serialize;

use crate::session::Exchange;

/// Longest excerpt shown under a citation.
const EXCERPT_CHARS: usize = 160;

/// Longest answer preview shown in history listings.
const PREVIEW_CHARS: usize = 90;

/// Pretty-printed JSON for `--json` output.
pub fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Answer, then a numbered source list with scores and excerpts.
pub fn query(response: &QueryResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", response.answer.trim());

    if !response.citations.is_empty() {
        let _ = writeln!(out, "\nSources");
        for (i, c) in response.citations.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", i + 1, c.source, percent(c.score));
            let excerpt = truncate(c.text.trim(), EXCERPT_CHARS);
            if !excerpt.is_empty() {
                let _ = writeln!(out, "     {excerpt}");
            }
        }
    }

    let _ = write!(
        out,
        "\nConfidence {} | {:.2}s",
        percent(response.confidence),
        response.processing_time_seconds
    );
    out
}

pub fn ingest(response: &IngestResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] {}",
        response.filename, response.file_type, response.status
    );
    let _ = writeln!(
        out,
        "  chunks extracted: {}, added: {}, duplicates skipped: {}",
        response.chunks_extracted, response.chunks_added, response.duplicates_skipped
    );
    if !response.message.is_empty() {
        let _ = writeln!(out, "  {}", response.message);
    }
    let _ = write!(out, "  processed in {:.2}s", response.processing_time_seconds);
    out
}

pub fn health(status: &HealthStatus) -> String {
    format!(
        "{}\n  text vectors: {}\n  image vectors: {}",
        status.status, status.text_vectors, status.image_vectors
    )
}

pub fn classification(name: &str, file_type: FileType) -> String {
    format!("{name}\t{file_type}")
}

/// History listing, in the order given.
pub fn history(exchanges: &[&Exchange]) -> String {
    if exchanges.is_empty() {
        return "No matching conversations.".to_string();
    }

    let mut out = String::new();
    for e in exchanges {
        let sources = e.sources.len();
        let _ = writeln!(
            out,
            "#{} [{}] {}",
            e.id,
            e.asked_at.format("%Y-%m-%d %H:%M"),
            e.question
        );
        let _ = writeln!(out, "    {}", truncate(e.answer.trim(), PREVIEW_CHARS));
        let _ = writeln!(
            out,
            "    {sources} source{}",
            if sources == 1 { "" } else { "s" }
        );
    }
    out.trim_end().to_string()
}

#[allow(clippy::cast_possible_truncation)]
fn percent(score: f64) -> String {
    format!("{}%", (score * 100.0).round() as i64)
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_hub_sdk::Citation;

    fn answer() -> QueryResponse {
        QueryResponse {
            answer: "Revenue grew 23%.\n".to_string(),
            citations: vec![
                Citation {
                    source: "annual-report-2024.pdf".to_string(),
                    text: "Revenue increased by 23% in Q4.".to_string(),
                    score: 0.914,
                },
                Citation {
                    source: "data-notes.txt".to_string(),
                    text: String::new(),
                    score: 0.5,
                },
            ],
            confidence: 0.8,
            processing_time_seconds: 0.2,
        }
    }

    #[test]
    fn test_query_rendering() {
        let text = query(&answer());
        assert!(text.starts_with("Revenue grew 23%.\n"));
        assert!(text.contains("  1. annual-report-2024.pdf (91%)"));
        assert!(text.contains("     Revenue increased by 23% in Q4."));
        assert!(text.contains("  2. data-notes.txt (50%)"));
        assert!(text.ends_with("Confidence 80% | 0.20s"));
    }

    #[test]
    fn test_query_without_citations() {
        let mut resp = answer();
        resp.citations.clear();
        assert!(!query(&resp).contains("Sources"));
    }

    #[test]
    fn test_ingest_rendering() {
        let resp = IngestResponse {
            status: "success".to_string(),
            filename: "meeting-notes.docx".to_string(),
            file_type: "docx".to_string(),
            chunks_extracted: 10,
            chunks_added: 8,
            duplicates_skipped: 2,
            processing_time_seconds: 1.234,
            message: String::new(),
        };
        let text = ingest(&resp);
        assert!(text.starts_with("meeting-notes.docx [docx] success"));
        assert!(text.contains("chunks extracted: 10, added: 8, duplicates skipped: 2"));
        assert!(text.ends_with("processed in 1.23s"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
        assert_eq!(truncate("exactly", 7), "exactly");
    }

    #[test]
    fn test_classification_line() {
        assert_eq!(classification("clip.MOV", FileType::Video), "clip.MOV\tvideo");
    }
}
