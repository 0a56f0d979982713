//! Trace command implementation.

use crate::cli::TraceArgs;
use crate::commands::Workspace;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crossspec_domain::ClaimId;

/// Execute the trace command.
pub fn execute_trace(args: TraceArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let claim_id = ClaimId::parse(&args.claim_id)?;
    let workspace = Workspace::open(&args.claims, config)?;
    let tracer = workspace.tracer(config)?;
    let top_n = args.top.unwrap_or(config.matcher.top_n);

    let result = tracer.trace(&claim_id, top_n)?;
    println!("{}", formatter.format_trace(&result, tracer.index())?);
    Ok(())
}
