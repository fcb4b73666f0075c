//! Render command implementation.

use crate::cli::RenderArgs;
use crate::error::Result;
use crate::output::Formatter;
use std::fs;

/// Execute the render command.
///
/// Always renders a table, whatever the selected output format.
pub async fn execute_render(args: RenderArgs, formatter: &Formatter) -> Result<()> {
    let content = fs::read_to_string(&args.file)?;
    println!("{}", formatter.render_jsonl(&content)?);
    Ok(())
}
