//! Purge command implementation.

use crate::cli::PurgeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use etymtag_domain::traits::LexiconStore;
use etymtag_store::SqliteStore;

/// Execute the purge command.
pub async fn execute_purge(args: PurgeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut store = SqliteStore::new(&config.database)?;

    let mut removed = 0;
    for lemma in &args.lemmas {
        if store.purge(lemma)? {
            removed += 1;
        } else {
            println!("{}", formatter.info(&format!("'{}' is not cached", lemma)));
        }
    }

    println!(
        "{}",
        formatter.success(&format!("Removed {} of {} lemma(s)", removed, args.lemmas.len()))
    );

    Ok(())
}
