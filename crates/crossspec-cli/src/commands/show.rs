//! Show command implementation.

use crate::cli::ShowArgs;
use crate::commands::Workspace;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crossspec_domain::ClaimId;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let claim_id = ClaimId::parse(&args.claim_id)?;
    let workspace = Workspace::open(&args.claims, config)?;
    let index = workspace.index();
    let claim = index
        .get(&claim_id)
        .ok_or_else(|| CliError::InvalidInput(format!("Claim not found: {}", claim_id)))?;

    println!("{}", formatter.format_claim_detail(claim)?);
    if !index.is_authoritative(&claim_id) {
        eprintln!("{}", formatter.warning("Claim is not authoritative"));
    }
    Ok(())
}
