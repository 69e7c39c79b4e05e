//! CLI enum types shared by the commands.

use clap::ValueEnum;
use hashtagger_core::OutputFormat as CoreOutputFormat;

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one line per item
    Text,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl OutputFormat {
    /// Format named by the `[output]` config section, falling back to text.
    pub fn from_config(name: &str) -> Self {
        match CoreOutputFormat::parse(name) {
            Some(CoreOutputFormat::Json) => Self::Json,
            Some(CoreOutputFormat::JsonLines) => Self::Jsonl,
            Some(CoreOutputFormat::Text) => Self::Text,
            None => {
                tracing::warn!("Unknown output.format {:?}, using text", name);
                Self::Text
            }
        }
    }
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
