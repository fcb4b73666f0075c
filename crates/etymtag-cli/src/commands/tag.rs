//! Tag command implementation.

use crate::cli::TagArgs;
use crate::config::{Config, LookupSettings};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::tokens;
use etymtag_lookup::{OfflineSource, WiktionarySource};
use etymtag_resolver::{
    Pipeline, PipelineRun, Resolver, ResolverConfig, RunControl, RunStats, ThresholdPolicy,
};
use etymtag_store::SqliteStore;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

const ATTRIBUTION: &str = "Attribution: EKI/Wiktionary where applicable.";

/// Execute the tag command.
///
/// Each input file is resolved on its own blocking worker with its own
/// cache connection; all workers share one cancellation flag.
pub async fn execute_tag(args: TagArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let resolver_config = apply_flags(&args, config.resolver.clone());
    resolver_config.validate().map_err(CliError::Config)?;
    let flag_mode = resolver_config.threshold_policy == ThresholdPolicy::Flag;

    let mut control = RunControl::new();
    if let Some(budget) = resolver_config.run_timeout() {
        control = control.with_timeout(budget);
    }

    let interrupt = control.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; finishing with what has been resolved");
            interrupt.cancel();
        }
    });

    let mut handles = Vec::with_capacity(args.inputs.len());
    for input in args.inputs.clone() {
        let database = config.database.clone();
        let lookup = config.lookup.clone();
        let resolver_config = resolver_config.clone();
        let control = control.clone();
        let plain = args.plain;

        handles.push(tokio::task::spawn_blocking(move || {
            tag_file(&input, plain, &database, &lookup, resolver_config, control)
        }));
    }

    let mut all_tokens = Vec::new();
    let mut stats = RunStats::new();
    let mut failure = None;
    for handle in handles {
        match handle.await {
            Ok(Ok(run)) => {
                stats.merge(&run.stats);
                all_tokens.extend(run.tokens);
            }
            Ok(Err(e)) => {
                control.cancel();
                failure.get_or_insert(e);
            }
            Err(e) => {
                control.cancel();
                failure.get_or_insert(CliError::Task(e.to_string()));
            }
        }
    }
    ctrl_c.abort();

    if let Some(e) = failure {
        return Err(e);
    }

    info!("{}", stats.summary());

    let output = formatter.format_tokens(&all_tokens, flag_mode)?;
    let message = format!("Tagged {} tokens. {}", stats.emitted(), ATTRIBUTION);
    match &args.out {
        Some(path) => {
            write_output(path, &output)?;
            println!("{}", formatter.success(&message));
        }
        None => {
            if !output.is_empty() {
                println!("{}", output);
            }
            eprintln!("{}", formatter.info(&message));
        }
    }

    if stats.override_conflicts > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} curated record(s) kept; pass --allow-override to replace them",
                stats.override_conflicts
            ))
        );
    }
    if stats.cancelled > 0 {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} lemma(s) left unresolved", stats.cancelled))
        );
    }

    Ok(())
}

/// Fold command-line flags into the configured resolver settings.
pub fn apply_flags(args: &TagArgs, mut config: ResolverConfig) -> ResolverConfig {
    if args.offline {
        config.offline = true;
    }
    if args.no_compounds {
        config.allow_compound_analysis = false;
    }
    if let Some(min_conf) = args.min_conf {
        config.min_confidence = min_conf;
    }
    if args.flag_low {
        config.threshold_policy = ThresholdPolicy::Flag;
    }
    if args.refresh {
        config.refresh = true;
    }
    if args.allow_override {
        config.allow_override = true;
    }
    config
}

/// Tag one input file against the cache at `database`.
///
/// Blocking; run it off the async runtime.
pub fn tag_file(
    path: &Path,
    plain: bool,
    database: &str,
    lookup: &LookupSettings,
    config: ResolverConfig,
    control: RunControl,
) -> Result<PipelineRun> {
    let content = fs::read_to_string(path)?;
    let inputs = if plain {
        tokens::parse_plain(&content)
    } else {
        tokens::parse_tsv(&content).map_err(|e| match e {
            CliError::InvalidInput(msg) => {
                CliError::InvalidInput(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?
    };
    info!("Read {} tokens from {}", inputs.len(), path.display());

    let store = SqliteStore::new(database)?;
    let pipeline = Pipeline::new(config);

    let run = if pipeline.config().offline {
        let mut resolver = Resolver::new(store, OfflineSource::new()).with_control(control);
        pipeline.run(&mut resolver, &inputs)?
    } else {
        let source = WiktionarySource::new(
            lookup.endpoint.as_str(),
            &lookup.user_agent,
            pipeline.config().fetch_timeout(),
        )?;
        let mut resolver = Resolver::new(store, source).with_control(control);
        pipeline.run(&mut resolver, &inputs)?
    };

    Ok(run)
}

fn write_output(path: &Path, output: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut content = output.to_string();
    if !content.is_empty() {
        content.push('\n');
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn tag_args(extra: &[&str]) -> TagArgs {
        let mut argv = vec!["etymtag", "tag", "--in", "input.tsv"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Command::Tag(args) => args,
            _ => panic!("Expected Tag command"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = tag_args(&["--offline", "--no-compounds", "--min-conf", "0.4", "--flag-low"]);
        let config = apply_flags(&args, ResolverConfig::default());

        assert!(config.offline);
        assert!(!config.allow_compound_analysis);
        assert_eq!(config.min_confidence, 0.4);
        assert_eq!(config.threshold_policy, ThresholdPolicy::Flag);
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = tag_args(&[]);
        let mut base = ResolverConfig::default();
        base.min_confidence = 0.3;
        base.offline = true;

        let config = apply_flags(&args, base);
        assert!(config.offline);
        assert_eq!(config.min_confidence, 0.3);
        assert_eq!(config.threshold_policy, ThresholdPolicy::Drop);
    }

    #[test]
    fn test_offline_refresh_rejected() {
        let args = tag_args(&["--offline", "--refresh"]);
        let config = apply_flags(&args, ResolverConfig::default());
        assert!(config.validate().is_err());
    }
}
