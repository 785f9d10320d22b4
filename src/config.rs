use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use config::{Config, ConfigError, Environment, File};
use insight_hub_sdk::{DEFAULT_TOP_K, FileType};
use serde::Deserialize;

/// Base address used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "insight-hub.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the query/ingest service
    #[arg(long, env = "API_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Reject answers with out-of-range scores or unsorted citations
    #[arg(long, env = "API_STRICT", global = true)]
    pub strict: Option<bool>,

    /// Log level or filter directive (RUST_LOG still wins)
    #[arg(long, env = "LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: Option<bool>,

    /// Print raw JSON responses instead of formatted text (not for `chat`)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Check service health and indexed-content counts
    Health {
        /// Fail unless the reported status is `healthy` or `ok`
        #[arg(long)]
        require_healthy: bool,
    },
    /// Show the service status object
    Status,
    /// Ask a question about the indexed documents
    Query {
        /// The question (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Maximum number of citations
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },
    /// Upload a file for extraction and indexing
    Ingest {
        /// File to upload
        path: PathBuf,
        /// Explicit file type (pdf, docx, image, audio, video, document)
        #[arg(long, conflicts_with = "infer_type")]
        file_type: Option<FileType>,
        /// Tag the upload with the type inferred from its extension
        #[arg(long)]
        infer_type: bool,
    },
    /// Classify filenames by extension without contacting the service
    Classify {
        #[arg(required = true, num_args = 1..)]
        names: Vec<String>,
    },
    /// Interactive question-and-answer session
    Chat {
        /// Maximum number of citations per answer
        #[arg(short = 'k', long)]
        top_k: Option<u32>,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Default citation bound for queries.
    pub top_k: u32,
    pub strict: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    /// Parse process arguments and load the layered configuration.
    pub fn load_from_args<I, T>(args: I) -> Result<(Cli, Self), ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Message(e.to_string()))?;
        let config = Self::load(&cli)?;
        Ok((cli, config))
    }

    /// Build the configuration for an already-parsed command line.
    ///
    /// Priority: CLI flag > CLI env var > `INSIGHT_` env > config file > defaults.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.top_k", i64::from(DEFAULT_TOP_K))?
            .set_default("api.strict", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?;

        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false));
            }
            None => {}
        }

        // E.g. INSIGHT_API__BASE_URL=http://search.internal:8000
        builder = builder.add_source(
            Environment::with_prefix("INSIGHT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.base_url {
            builder = builder.set_override("api.base_url", url.as_str())?;
        }
        if let Some(strict) = cli.strict {
            builder = builder.set_override("api.strict", strict)?;
        }
        if let Some(level) = &cli.log_level {
            builder = builder.set_override("logging.level", level.as_str())?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.json", json)?;
        }

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Message("api.base_url cannot be empty".to_string()));
        }
        if self.api.top_k == 0 {
            return Err(ConfigError::Message("api.top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_words_joined_later() {
        let cli = Cli::try_parse_from(["insight-hub", "query", "What", "is", "the", "revenue?", "-k", "3"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::Query {
                question: vec![
                    "What".to_string(),
                    "is".to_string(),
                    "the".to_string(),
                    "revenue?".to_string()
                ],
                top_k: Some(3),
            }
        );
    }

    #[test]
    fn test_ingest_file_type_parses() {
        let cli =
            Cli::try_parse_from(["insight-hub", "ingest", "scan.png", "--file-type", "Document"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Ingest {
                path: PathBuf::from("scan.png"),
                file_type: Some(FileType::Document),
                infer_type: false,
            }
        );
    }

    #[test]
    fn test_ingest_override_conflicts_with_inference() {
        let result = Cli::try_parse_from([
            "insight-hub",
            "ingest",
            "a.pdf",
            "--file-type",
            "pdf",
            "--infer-type",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_file_type_rejected() {
        let result =
            Cli::try_parse_from(["insight-hub", "ingest", "a.pdf", "--file-type", "spreadsheet"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["insight-hub", "health", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Command::Health {
                require_healthy: false
            }
        );
    }

    #[test]
    fn test_require_healthy_flag() {
        let cli = Cli::try_parse_from(["insight-hub", "health", "--require-healthy"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Health {
                require_healthy: true
            }
        );
    }
}
