//! Code-extract command implementation.

use crate::cli::CodeExtractArgs;
use crate::config::{Config, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crossspec_domain::{ClaimIdGenerator, IdPrefix, RunContext};
use crossspec_extractor::{CodeExtractor, Discovery, ExtractorConfig, RunReport};
use crossspec_store::write_claims;
use std::path::PathBuf;
use tracing::info;

/// What a code-extract invocation did
#[derive(Debug)]
pub enum ExtractOutcome {
    /// `--save` and the output already existed
    Reused(PathBuf),
    /// `--dry-run`: repository-relative paths that would be scanned
    DryRun(Vec<String>),
    /// Claims were written
    Extracted {
        /// Output file
        out: PathBuf,
        /// Run report
        report: RunReport,
    },
}

/// Apply command-line overrides to the configured extractor settings.
pub fn extractor_config(args: &CodeExtractArgs, config: &Config) -> ExtractorConfig {
    let mut extract = config.extract.clone();
    if !args.include.is_empty() {
        extract.include = args.include.clone();
    }
    extract.exclude.extend(args.exclude.iter().cloned());
    if let Some(unit) = args.unit {
        extract.granularity = unit.into();
    }
    if let Some(language) = args.language {
        extract.language = language.into();
    }
    if let Some(max_bytes) = args.max_bytes {
        extract.max_file_bytes = max_bytes;
    }
    if let Some(authority) = args.authority {
        extract.authority = authority.into();
    }
    if let Some(status) = args.status {
        extract.status = status.into();
    }
    if let Some(namespace) = &args.namespace {
        extract.id_prefix = IdPrefix::Namespace {
            prefix: namespace.clone(),
        };
    }
    if args.top.is_some() {
        extract.limit = args.top;
    }
    extract
}

/// Run the extraction without printing anything.
pub fn run_code_extract(args: &CodeExtractArgs, config: &Config) -> Result<ExtractOutcome> {
    let repo = args.repo.clone().unwrap_or_else(|| config.repo_root());
    let out = args.out.clone().unwrap_or_else(|| config.code_claims_path());

    if !repo.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "Repository root is not a directory: {}",
            repo.display()
        )));
    }
    if args.save && out.exists() {
        info!("Reusing existing {}", out.display());
        return Ok(ExtractOutcome::Reused(out));
    }

    let extract = extractor_config(args, config);
    extract.validate().map_err(CliError::Config)?;

    if args.dry_run {
        let discovered = Discovery::new(&repo, &extract)?.skip_path(&out).discover();
        return Ok(ExtractOutcome::DryRun(
            discovered.files.into_iter().map(|f| f.relative_path).collect(),
        ));
    }

    let ctx = RunContext::new(ClaimIdGenerator::new(extract.id_prefix.clone()))
        .with_default_authority(extract.authority)
        .with_default_status(extract.status);
    let extractor = CodeExtractor::new(extract)?;
    let report = extractor.run_excluding(&repo, &out, &ctx)?;
    write_claims(&out, &report.claims)?;
    info!("Wrote {} claims to {}", report.claims.len(), out.display());

    Ok(ExtractOutcome::Extracted { out, report })
}

/// Execute the code-extract command.
pub fn execute_code_extract(
    args: CodeExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match run_code_extract(&args, config)? {
        ExtractOutcome::Reused(out) => {
            println!(
                "{}",
                formatter.info(&format!("Output exists, reusing {}", out.display()))
            );
        }
        ExtractOutcome::DryRun(files) => {
            if formatter.format() == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                for file in &files {
                    println!("{}", file);
                }
                if formatter.format() == OutputFormat::Table {
                    println!("{}", formatter.info(&format!("{} file(s) selected", files.len())));
                }
            }
        }
        ExtractOutcome::Extracted { out, report } => {
            println!("{}", formatter.format_run_report(&report, &out)?);
        }
    }
    Ok(())
}
