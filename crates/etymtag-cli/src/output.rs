//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use colored::*;
use etymtag_domain::{LexiconRecord, ResolvedToken};
use serde_json::{json, Value};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format tagged tokens.
    ///
    /// JSON output is JSON Lines, one record per token. `flag_mode` adds
    /// the `flagged` field.
    pub fn format_tokens(&self, tokens: &[ResolvedToken], flag_mode: bool) -> Result<String> {
        let records: Vec<Value> = tokens.iter().map(|t| token_json(t, flag_mode)).collect();
        match self.format {
            OutputFormat::Json => {
                let lines = records
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(lines.join("\n"))
            }
            OutputFormat::Table => Ok(self.tokens_table(&records)),
        }
    }

    /// Render JSON Lines (as written by `tag`) as a table.
    pub fn render_jsonl(&self, content: &str) -> Result<String> {
        let records = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Value>(line).map_err(|e| {
                    CliError::InvalidInput(format!("line {}: {}", index + 1, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.tokens_table(&records))
    }

    /// Format lexicon cache records.
    pub fn format_records(&self, records: &[LexiconRecord]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_records: Vec<Value> = records.iter().map(record_json).collect();
                Ok(serde_json::to_string_pretty(&json_records)?)
            }
            OutputFormat::Table => Ok(self.records_table(records)),
        }
    }

    fn tokens_table(&self, records: &[Value]) -> String {
        if records.is_empty() {
            return self.colorize("No tokens.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Token", "Lemma", "POS", "Origin", "Conf", "Source"]);

        for record in records {
            let confidence = record["confidence"]
                .as_f64()
                .map(|c| format!("{:.2}", c))
                .unwrap_or_default();
            let mut origin = text_field(&record["origin"]).to_string();
            if record["flagged"].as_bool() == Some(true) {
                origin.push_str(" (low)");
            }

            builder.push_record([
                text_field(&record["token"]),
                text_field(&record["lemma"]),
                record["pos"].as_str().unwrap_or("N/A"),
                origin.as_str(),
                confidence.as_str(),
                text_field(&record["evidence"]["source"]),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn records_table(&self, records: &[LexiconRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No records found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Lemma", "Origin", "Conf", "Source", "Evidence"]);

        for record in records {
            let confidence = record.confidence.to_string();
            let evidence = record
                .evidence
                .text
                .as_deref()
                .map(|text| truncate(text, 48))
                .unwrap_or_else(|| "-".to_string());

            builder.push_record([
                record.lemma.as_str(),
                record.tag.as_str(),
                confidence.as_str(),
                record.evidence.source.as_str(),
                evidence.as_str(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// The per-token output record.
pub fn token_json(token: &ResolvedToken, flag_mode: bool) -> Value {
    let mut value = json!({
        "token": token.token,
        "lemma": token.lemma,
        "pos": token.pos,
        "origin": token.tag.as_str(),
        "confidence": token.confidence.rounded(),
        "evidence": {
            "source": token.evidence.source.as_str(),
            "text": token.evidence.text,
        },
        "components": token
            .components
            .iter()
            .map(|c| token_json(c, flag_mode))
            .collect::<Vec<_>>(),
    });

    if flag_mode {
        value["flagged"] = Value::Bool(token.flagged);
    }
    value
}

fn record_json(record: &LexiconRecord) -> Value {
    json!({
        "lemma": record.lemma,
        "origin": record.tag.as_str(),
        "confidence": record.confidence.rounded(),
        "evidence": {
            "source": record.evidence.source.as_str(),
            "text": record.evidence.text,
            "source_id": record.evidence.source_id,
        },
        "updated_at": record.last_updated,
    })
}

fn text_field(value: &Value) -> &str {
    value.as_str().unwrap_or("")
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    match single_line.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &single_line[..idx]),
        None => single_line,
    }
}
