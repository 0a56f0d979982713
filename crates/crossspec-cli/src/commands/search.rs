//! Search command implementation.

use crate::cli::SearchArgs;
use crate::commands::Workspace;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crossspec_domain::facets::FEATURE;
use crossspec_domain::{Claim, ClaimQuery, Facets};
use crossspec_store::FacetIndex;

/// Build the claim query for the search arguments.
pub fn build_query(args: &SearchArgs) -> Result<ClaimQuery> {
    if args.top == 0 {
        return Err(CliError::InvalidInput("--top must be greater than 0".to_string()));
    }

    let mut facets = Facets::new();
    for feature in &args.feature {
        facets.insert(FEATURE, feature.as_str());
    }
    for (facet, value) in &args.facet {
        facets.insert(facet.as_str(), value.as_str());
    }

    Ok(ClaimQuery {
        facets,
        artifact_type: args.artifact_type.map(Into::into),
        authority: args.authority.map(Into::into),
        status: args.status.map(Into::into),
        text: args.query.clone(),
        limit: Some(args.top),
    })
}

/// Run the search against an index.
pub fn run_search<'a>(args: &SearchArgs, index: &'a FacetIndex) -> Result<Vec<&'a Claim>> {
    Ok(index.search(&build_query(args)?))
}

/// Execute the search command.
pub fn execute_search(args: SearchArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let workspace = Workspace::open(&args.claims, config)?;
    let index = workspace.index();
    let claims = run_search(&args, &index)?;
    println!("{}", formatter.format_claims(&claims, args.show_source)?);
    Ok(())
}
