//! Output formatting for suggestion results and augmented corpora.
//!
//! The same writer serves three formats: plain text lines for terminals,
//! a single JSON document, or JSON Lines for streaming.

use std::io::{self, Write};

use serde::Serialize;

use crate::corpus::Record;
use crate::suggest::Suggestion;

/// Message shown in place of hashtags for an unrecognized text.
pub const UNRECOGNIZED_MESSAGE: &str = "Model does not recognize these words.";

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One human-readable line per item
    #[default]
    Text,
    /// Single JSON value (an array for batches)
    Json,
    /// One JSON object per line
    JsonLines,
}

impl OutputFormat {
    /// Parse a format name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Items that have a one-line plain-text rendering.
pub trait PlainText {
    fn plain_text(&self) -> String;
}

/// Serializable view of one [`Suggestion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRecord {
    pub text: String,
    pub hashtags: Vec<String>,
    pub recognized: bool,
}

impl From<&Suggestion> for SuggestionRecord {
    fn from(s: &Suggestion) -> Self {
        Self {
            text: s.text.clone(),
            hashtags: s.hashtags().to_vec(),
            recognized: s.is_recognized(),
        }
    }
}

impl PlainText for SuggestionRecord {
    fn plain_text(&self) -> String {
        if self.recognized {
            self.hashtags.join(" ")
        } else {
            UNRECOGNIZED_MESSAGE.to_string()
        }
    }
}

impl PlainText for Record {
    fn plain_text(&self) -> String {
        format!("{}\t{}", self.cleaned_text, self.labels.join(" "))
    }
}

/// Writes items in the chosen [`OutputFormat`].
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    items_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            items_written: 0,
        }
    }

    /// Write a single item.
    pub fn write<T: Serialize + PlainText>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", item.plain_text())?,
            OutputFormat::Json => self.write_json(item)?,
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.items_written += 1;
        Ok(())
    }

    /// Write a batch. JSON wraps the batch in one array; the other formats
    /// write one line per item.
    pub fn write_all<T: Serialize + PlainText>(&mut self, items: &[T]) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            self.write_json(items)?;
            self.items_written += items.len();
            return Ok(());
        }
        items.iter().try_for_each(|item| self.write(item))
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)
        } else {
            serde_json::to_writer(&mut self.writer, value)
        };
        written.map_err(io::Error::other)?;
        writeln!(self.writer)
    }

    pub fn items_written(&self) -> usize {
        self.items_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hashtags: &[&str], recognized: bool) -> SuggestionRecord {
        SuggestionRecord {
            text: "sunny day".to_string(),
            hashtags: hashtags.iter().map(|s| s.to_string()).collect(),
            recognized,
        }
    }

    fn render<T: Serialize + PlainText>(format: OutputFormat, items: &[T]) -> String {
        let mut writer = OutputWriter::new(Vec::new(), format, false);
        writer.write_all(items).unwrap();
        assert_eq!(writer.items_written(), items.len());
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn test_text_output() {
        let out = render(
            OutputFormat::Text,
            &[record(&["#sun", "#beach"], true), record(&[], false)],
        );
        assert_eq!(out, format!("#sun #beach\n{}\n", UNRECOGNIZED_MESSAGE));
    }

    #[test]
    fn test_json_batch_is_one_array() {
        let out = render(OutputFormat::Json, &[record(&["#a"], true), record(&[], false)]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[0]["hashtags"][0], "#a");
        assert_eq!(value[1]["recognized"], false);
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let out = render(
            OutputFormat::JsonLines,
            &[record(&["#a"], true), record(&["#b"], true)],
        );
        let lines: Vec<&str> = out.trim_end().split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("\"#b\""));
    }

    #[test]
    fn test_corpus_record_plain_text() {
        let r = Record {
            raw_text: "Sunny!".to_string(),
            cleaned_text: "sunny".to_string(),
            labels: vec!["#sun".to_string(), "#sky".to_string()],
            synthetic: true,
        };
        assert_eq!(render(OutputFormat::Text, &[r]), "sunny\t#sun #sky\n");
    }
}
