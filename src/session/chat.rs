//! The interactive question loop.

use std::io::Write;
use std::path::PathBuf;

use insight_hub_sdk::Client;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::Transcript;
use crate::render;

const HELP: &str = "\
Type a question and press Enter.
  /history [term]  list earlier questions, optionally filtered
  /save <path>     export the transcript as Markdown
  /clear           forget the transcript
  /help            show this help
  /quit            leave";

/// A parsed line of chat input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Blank line; ignored.
    Empty,
    Question(String),
    History(Option<String>),
    Save(PathBuf),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command '/{0}' (try /help)")]
    Unknown(String),
    #[error("/save needs a file path")]
    MissingPath,
}

/// Parse one line. Lines starting with `/` are commands, anything else
/// non-blank is a question.
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(command) = line.strip_prefix('/') else {
        return Ok(Input::Question(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let arg = (!arg.is_empty()).then(|| arg.to_string());

    match name.to_ascii_lowercase().as_str() {
        "history" => Ok(Input::History(arg)),
        "save" => arg
            .map(|p| Input::Save(PathBuf::from(p)))
            .ok_or(InputError::MissingPath),
        "clear" => Ok(Input::Clear),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(InputError::Unknown(other.to_string())),
    }
}

/// Run the chat loop until `/quit` or end of input.
///
/// Failed queries are reported and the loop keeps going. Returns the
/// transcript so callers can inspect or save it.
pub async fn run<R, W>(
    client: &Client,
    top_k: u32,
    input: R,
    out: &mut W,
) -> anyhow::Result<Transcript>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut transcript = Transcript::new();
    let mut lines = input.lines();

    writeln!(out, "Ask a question about your documents. /help for commands.")?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_input(&line) {
            Ok(Input::Empty) => {}
            Ok(Input::Quit) => break,
            Ok(Input::Help) => writeln!(out, "{HELP}")?,
            Ok(Input::Clear) => {
                transcript.clear();
                writeln!(out, "Transcript cleared.")?;
            }
            Ok(Input::History(term)) => {
                let matches = transcript.search(term.as_deref().unwrap_or_default());
                writeln!(out, "{}", render::history(&matches))?;
            }
            Ok(Input::Save(path)) => match transcript.export(&path) {
                Ok(()) => writeln!(
                    out,
                    "Saved {} exchange(s) to {}",
                    transcript.len(),
                    path.display()
                )?,
                Err(e) => writeln!(out, "Error: could not write {}: {e}", path.display())?,
            },
            Ok(Input::Question(question)) => {
                match client.query_with_top_k(question.as_str(), top_k).await {
                    Ok(response) => {
                        writeln!(out, "{}\n", render::query(&response))?;
                        let exchange = transcript.record(question, &response);
                        tracing::debug!(id = exchange.id, "Recorded exchange");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Query failed");
                        writeln!(out, "Error: {e}")?;
                    }
                }
            }
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    tracing::info!(exchanges = transcript.len(), "Chat session ended");
    Ok(transcript)
}
