//! Seed command implementation.

use crate::cli::SeedArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use etymtag_domain::{Confidence, LexiconRecord, OriginTag};
use etymtag_store::SqliteStore;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

const NATIVE: &str = "Soome-ugri algupära";

/// Built-in demonstration lexicon: `(lemma, origin, evidence)`.
pub const SAMPLE_LEXICON: &[(&str, &str, &str)] = &[
    ("mina", "native_finnic", NATIVE),
    ("tema", "native_finnic", NATIVE),
    ("käima", "native_finnic", NATIVE),
    ("vaatama", "native_finnic", NATIVE),
    ("oma", "native_finnic", NATIVE),
    ("ja", "native_finnic", NATIVE),
    ("järel", "native_finnic", NATIVE),
    ("peegel", "loan:german", "Laen saksa keelest: Spiegel"),
    ("lasteaed", "loan:german", "Laen saksa keelest: Kindergarten"),
    ("siluett", "loan:french", "Laen prantsuse keelest: silhouette"),
    ("toddler", "loan:english", "Laen inglise keelest"),
];

/// Execute the seed command.
pub async fn execute_seed(args: SeedArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let records = match &args.file {
        Some(path) => parse_seed_file(&fs::read_to_string(path)?)?,
        None => sample_records()?,
    };

    let mut store = SqliteStore::new(&config.database)?;
    let written = store.put_all(records)?;
    info!("Seeded {} curated records into {}", written, config.database);

    println!(
        "{}",
        formatter.success(&format!("Added {} entries to lexicon cache", written))
    );

    let records = store.list(None)?;
    println!("{}", formatter.format_records(&records)?);

    Ok(())
}

/// The demonstration lexicon as curated records.
pub fn sample_records() -> Result<Vec<LexiconRecord>> {
    let now = now_secs();
    SAMPLE_LEXICON
        .iter()
        .map(|(lemma, origin, evidence)| {
            let tag = parse_tag(origin, 0)?;
            Ok(LexiconRecord::manual(
                lemma,
                tag,
                Confidence::HIGH,
                Some(evidence.to_string()),
                now,
            ))
        })
        .collect()
}

/// Parse a curated lexicon file.
///
/// One record per line: `lemma<TAB>origin<TAB>evidence[<TAB>confidence]`.
/// Blank lines and `#` comments are skipped. Evidence `-` or empty means
/// none; confidence defaults to 0.9.
pub fn parse_seed_file(content: &str) -> Result<Vec<LexiconRecord>> {
    let now = now_secs();
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 2 || fields[0].is_empty() {
            return Err(CliError::InvalidInput(format!(
                "line {}: expected lemma and origin",
                line_no
            )));
        }

        let tag = parse_tag(fields[1], line_no)?;
        let evidence = fields
            .get(2)
            .filter(|text| !text.is_empty() && **text != "-")
            .map(|text| text.to_string());
        let confidence = match fields.get(3) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<f64>()
                .ok()
                .and_then(Confidence::new)
                .ok_or_else(|| {
                    CliError::InvalidInput(format!(
                        "line {}: invalid confidence '{}'",
                        line_no, raw
                    ))
                })?,
            _ => Confidence::HIGH,
        };

        records.push(LexiconRecord::manual(fields[0], tag, confidence, evidence, now));
    }

    Ok(records)
}

fn parse_tag(origin: &str, line_no: usize) -> Result<OriginTag> {
    OriginTag::parse(origin).ok_or_else(|| {
        CliError::InvalidInput(format!("line {}: unknown origin tag '{}'", line_no, origin))
    })
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
