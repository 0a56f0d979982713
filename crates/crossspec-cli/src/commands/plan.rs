//! Plan command implementation.

use crate::cli::PlanArgs;
use crate::commands::Workspace;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the plan command.
pub fn execute_plan(args: PlanArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut config = config.clone();
    if let Some(top) = args.top {
        config.matcher.top_n = top;
    }
    let workspace = Workspace::open(&args.claims, &config)?;
    let tracer = workspace.tracer(&config)?;

    let result = tracer.plan(&args.requirement.join(" "))?;
    println!("{}", formatter.format_plan(&result, tracer.index())?);
    Ok(())
}
