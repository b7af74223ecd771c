//! Renderer module
//!
//! Renders references and resolved file sets to stdout formats: text, json, jsonl

use serde::Serialize;
use serde_json::json;

use crate::core::model::{Reference, Resolution, Skip};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

#[derive(Serialize)]
struct CopyReport<'a> {
    text: &'a str,
    references: &'a [Reference],
    #[serde(skip_serializing_if = "no_skips")]
    skipped: &'a [Skip],
}

fn no_skips(skipped: &&[Skip]) -> bool {
    skipped.is_empty()
}

/// Renderer for copy results and resolved selections
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = if self.config.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| "null".to_string())
    }

    fn lines<T: Serialize>(&self, values: impl IntoIterator<Item = T>) -> String {
        values
            .into_iter()
            .map(|value| self.to_json(&value))
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render the references produced by a copy.
    ///
    /// Text output is exactly the clipboard text.
    pub fn render_references(&self, text: &str, references: &[Reference], skipped: &[Skip]) -> String {
        match self.config.format {
            OutputFormat::Text => text.to_string(),
            OutputFormat::Json => self.to_json(&CopyReport {
                text,
                references,
                skipped,
            }),
            OutputFormat::Jsonl => self.lines(references),
        }
    }

    /// Render a resolved selection
    pub fn render_resolution(&self, resolution: &Resolution) -> String {
        match self.config.format {
            OutputFormat::Text => resolution.files.iter().collect::<Vec<_>>().join("\n"),
            OutputFormat::Json => self.to_json(resolution),
            OutputFormat::Jsonl => self.lines(
                resolution
                    .files
                    .iter()
                    .map(|file| json!({ "file": file })),
            ),
        }
    }
}
