//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// etymtag - Tag the words of Estonian text with their etymological origin.
#[derive(Debug, Parser)]
#[command(name = "etymtag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ETYMTAG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lexicon cache database path
    #[arg(long, global = true, env = "ETYMTAG_DB")]
    pub db: Option<String>,

    /// Log level for etymtag crates (overrides RUST_LOG)
    #[arg(long, global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format
    Table,
    /// JSON (JSON Lines for tagged tokens)
    #[value(alias = "jsonl")]
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Tag tokens with their etymological origin
    Tag(TagArgs),

    /// Import manually curated lexicon records
    Seed(SeedArgs),

    /// Remove records from the lexicon cache
    Purge(PurgeArgs),

    /// Inspect the lexicon cache
    Show(ShowArgs),

    /// Render a JSONL output file as a table
    Render(RenderArgs),
}

/// Arguments for the tag command.
#[derive(Debug, Parser)]
pub struct TagArgs {
    /// Input files (TSV: surface, lemma, pos); several run in parallel
    #[arg(long = "in", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Disable remote lookups (use the cache only)
    #[arg(long)]
    pub offline: bool,

    /// Skip compound analysis
    #[arg(long)]
    pub no_compounds: bool,

    /// Minimum confidence for emitted tokens
    #[arg(long)]
    pub min_conf: Option<f64>,

    /// Keep tokens under --min-conf and flag them instead of dropping
    #[arg(long)]
    pub flag_low: bool,

    /// Look up cached lemmas again
    #[arg(long)]
    pub refresh: bool,

    /// Allow lookups to replace manually curated records
    #[arg(long)]
    pub allow_override: bool,

    /// Inputs are plain text; lemma is the lower-cased surface form
    #[arg(long)]
    pub plain: bool,
}

/// Arguments for the seed command.
#[derive(Debug, Parser)]
pub struct SeedArgs {
    /// TSV file: lemma, origin, evidence[, confidence]
    #[arg(short = 'i', long, conflicts_with = "sample", required_unless_present = "sample")]
    pub file: Option<PathBuf>,

    /// Load the built-in demonstration lexicon
    #[arg(long)]
    pub sample: bool,
}

/// Arguments for the purge command.
#[derive(Debug, Parser)]
pub struct PurgeArgs {
    /// Lemmas to remove
    #[arg(required = true)]
    pub lemmas: Vec<String>,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Show a single lemma
    pub lemma: Option<String>,

    /// Maximum number of records
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the render command.
#[derive(Debug, Parser)]
pub struct RenderArgs {
    /// JSONL file written by `tag`
    pub file: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_command() {
        let cli = Cli::parse_from([
            "etymtag",
            "tag",
            "--in",
            "a.tsv",
            "b.tsv",
            "--offline",
            "--min-conf",
            "0.5",
        ]);
        match cli.command {
            Command::Tag(args) => {
                assert_eq!(args.inputs.len(), 2);
                assert!(args.offline);
                assert_eq!(args.min_conf, Some(0.5));
                assert!(!args.flag_low);
            }
            _ => panic!("Expected Tag command"),
        }
    }

    #[test]
    fn test_tag_requires_input() {
        assert!(Cli::try_parse_from(["etymtag", "tag"]).is_err());
    }

    #[test]
    fn test_jsonl_alias() {
        let cli = Cli::try_parse_from(["etymtag", "--format", "jsonl", "show"]).unwrap();
        assert_eq!(cli.format, Some(CliFormat::Json));
    }

    #[test]
    fn test_seed_needs_file_or_sample() {
        assert!(Cli::try_parse_from(["etymtag", "seed"]).is_err());
        assert!(Cli::try_parse_from(["etymtag", "seed", "--sample"]).is_ok());
        assert!(Cli::try_parse_from(["etymtag", "seed", "--file", "x.tsv", "--sample"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["etymtag", "purge", "peegel", "--db", "x.sqlite3"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("x.sqlite3"));
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Cli::try_parse_from(["etymtag", "--log-level", "loud", "show"]).is_err());
    }
}
