//! Coverage command implementation.

use crate::cli::CoverageArgs;
use crate::commands::Workspace;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crossspec_trace::coverage_report;

/// Execute the coverage command.
pub fn execute_coverage(args: CoverageArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let workspace = Workspace::open(&args.claims, config)?;
    let features = (!args.feature.is_empty()).then_some(args.feature.as_slice());
    let rows = coverage_report(&workspace.index(), features);
    println!("{}", formatter.format_coverage(&rows)?);
    Ok(())
}
