//! Import command implementation.

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crossspec_domain::{ArtifactType, Claim, ClaimIdGenerator, IdPrefix, RunContext};
use crossspec_extractor::{finalize_claims, Diagnostic, ExtractedClaimFeed, ExtractorRegistry};
use crossspec_store::write_claims;
use std::path::PathBuf;
use tracing::info;

/// Result of finalizing an import
#[derive(Debug)]
pub struct ImportOutcome {
    /// Output file
    pub out: PathBuf,
    /// Claims written
    pub claims: Vec<Claim>,
    /// Records rejected during validation
    pub diagnostics: Vec<Diagnostic>,
}

/// Finalize and write the claims of an extracted-claim feed.
pub fn run_import(args: &ImportArgs, config: &Config) -> Result<ImportOutcome> {
    let artifact_type = ArtifactType::from(args.artifact_type);
    let prefix = match &args.namespace {
        Some(namespace) if namespace.trim().is_empty() => {
            return Err(CliError::InvalidInput("Namespace must not be empty".to_string()));
        }
        Some(namespace) => IdPrefix::Namespace {
            prefix: namespace.clone(),
        },
        None => config.import.id_prefix.clone(),
    };

    let mut registry = ExtractorRegistry::new();
    registry.register(Box::new(ExtractedClaimFeed::new(artifact_type)));
    let extracted = registry.extract(artifact_type, &args.input)?;

    let authority = args
        .authority
        .map(Into::into)
        .unwrap_or(config.import.authority);
    let ctx = RunContext::new(ClaimIdGenerator::new(prefix))
        .with_default_authority(authority)
        .with_default_status(config.import.status);
    let (claims, diagnostics) = finalize_claims(extracted, &ctx);

    let out = args.out.clone().unwrap_or_else(|| config.spec_claims_path());
    write_claims(&out, &claims)?;
    info!(
        "Imported {} {} claims into {} ({} rejected)",
        claims.len(),
        artifact_type,
        out.display(),
        diagnostics.len()
    );

    Ok(ImportOutcome {
        out,
        claims,
        diagnostics,
    })
}

/// Execute the import command.
pub fn execute_import(args: ImportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let outcome = run_import(&args, config)?;
    let claims: Vec<&Claim> = outcome.claims.iter().collect();
    println!("{}", formatter.format_claims(&claims, true)?);
    for diagnostic in &outcome.diagnostics {
        eprintln!(
            "{}",
            formatter.warning(&format!("{}: {}", diagnostic.path, diagnostic.message))
        );
    }
    eprintln!(
        "{}",
        formatter.success(&format!(
            "Imported {} claim(s) into {}",
            outcome.claims.len(),
            outcome.out.display()
        ))
    );
    Ok(())
}
