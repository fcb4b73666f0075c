//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use etymtag_domain::traits::LexiconStore;
use etymtag_store::SqliteStore;

/// Execute the show command.
pub async fn execute_show(args: ShowArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = SqliteStore::new(&config.database)?;

    match &args.lemma {
        Some(lemma) => {
            let record = store
                .get(lemma)?
                .ok_or_else(|| CliError::InvalidInput(format!("'{}' is not cached", lemma)))?;
            println!("{}", formatter.format_records(&[record])?);
        }
        None => {
            let records = store.list(args.limit)?;
            println!("{}", formatter.format_records(&records)?);
            println!(
                "{}",
                formatter.info(&format!(
                    "Showing {} of {} cached lemma(s)",
                    records.len(),
                    store.count()?
                ))
            );
        }
    }

    Ok(())
}
