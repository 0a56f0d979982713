//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use crossspec_domain::{ArtifactType, Authority, Status};
use crossspec_extractor::{Granularity, LanguageFilter};
use std::path::PathBuf;

/// CrossSpec - Trace specification claims to the code that implements them.
#[derive(Debug, Parser)]
#[command(name = "crossspec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ./crossspec.toml when present)
    #[arg(short, long, global = true, env = "CROSSSPEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract claims from C, C++ and Python sources
    CodeExtract(CodeExtractArgs),

    /// Finalize document claims produced by an external extractor
    Import(ImportArgs),

    /// Search claims by facet, type, authority and text
    Search(SearchArgs),

    /// Show one claim
    Show(ShowArgs),

    /// Rank implementation claims for a specification claim
    Trace(TraceArgs),

    /// Break a requirement into fragments and match each one
    Plan(PlanArgs),

    /// Report specification and implementation counts per feature
    Coverage(CoverageArgs),
}

/// Arguments for the code-extract command.
#[derive(Debug, Parser)]
pub struct CodeExtractArgs {
    /// Repository root to scan
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Output NDJSON path
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Include glob, relative to the repository root (repeatable)
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude glob, relative to the repository root (repeatable)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Extraction unit
    #[arg(short, long, value_enum)]
    pub unit: Option<UnitArg>,

    /// Language filter
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Skip files larger than this many bytes
    #[arg(long)]
    pub max_bytes: Option<u64>,

    /// Authority assigned to code claims
    #[arg(long, value_enum)]
    pub authority: Option<AuthorityArg>,

    /// Status assigned to code claims
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Fixed claim id namespace (e.g. BRK)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Keep at most this many claims
    #[arg(long)]
    pub top: Option<usize>,

    /// Print the selected files without extracting
    #[arg(long)]
    pub dry_run: bool,

    /// Reuse the output file when it already exists
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// NDJSON file of extracted claims
    pub input: PathBuf,

    /// Artifact type every record must carry
    #[arg(short = 't', long = "type", value_enum)]
    pub artifact_type: DocumentTypeArg,

    /// Output NDJSON path
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Authority for records that do not carry one
    #[arg(long, value_enum)]
    pub authority: Option<AuthorityArg>,

    /// Fixed claim id namespace (e.g. SPEC)
    #[arg(long)]
    pub namespace: Option<String>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Words that must all appear in the claim text
    #[arg(short, long)]
    pub query: Option<String>,

    /// Feature facet filter (repeatable, any of)
    #[arg(long)]
    pub feature: Vec<String>,

    /// Generic facet filter (format: facet=value, repeatable)
    #[arg(long, value_parser = parse_facet)]
    pub facet: Vec<(String, String)>,

    /// Authority filter
    #[arg(short, long, value_enum)]
    pub authority: Option<AuthorityArg>,

    /// Artifact type filter
    #[arg(short = 't', long = "type", value_enum)]
    pub artifact_type: Option<ArtifactTypeArg>,

    /// Status filter
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Maximum results
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Claim files to read (repeatable; defaults to the configured files)
    #[arg(long)]
    pub claims: Vec<PathBuf>,

    /// Show source location details
    #[arg(long)]
    pub show_source: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Claim identifier (e.g. CLM-BRAKE-000001)
    pub claim_id: String,

    /// Claim files to read (repeatable; defaults to the configured files)
    #[arg(long)]
    pub claims: Vec<PathBuf>,
}

/// Arguments for the trace command.
#[derive(Debug, Parser)]
pub struct TraceArgs {
    /// Specification claim identifier
    pub claim_id: String,

    /// Maximum matches (defaults to the configured top_n)
    #[arg(long)]
    pub top: Option<usize>,

    /// Claim files to read (repeatable; defaults to the configured files)
    #[arg(long)]
    pub claims: Vec<PathBuf>,
}

/// Arguments for the plan command.
#[derive(Debug, Parser)]
pub struct PlanArgs {
    /// Requirement text
    #[arg(required = true)]
    pub requirement: Vec<String>,

    /// Maximum matches per fragment (defaults to the configured top_n)
    #[arg(long)]
    pub top: Option<usize>,

    /// Claim files to read (repeatable; defaults to the configured files)
    #[arg(long)]
    pub claims: Vec<PathBuf>,
}

/// Arguments for the coverage command.
#[derive(Debug, Parser)]
pub struct CoverageArgs {
    /// Features to report (repeatable; defaults to every observed feature)
    #[arg(long)]
    pub feature: Vec<String>,

    /// Claim files to read (repeatable; defaults to the configured files)
    #[arg(long)]
    pub claims: Vec<PathBuf>,
}

fn parse_facet(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((facet, value)) if !facet.trim().is_empty() && !value.trim().is_empty() => {
            Ok((facet.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected facet=value, got '{}'", s)),
    }
}

/// Extraction unit argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum UnitArg {
    /// Functions and methods
    Function,
    /// Outermost classes
    Class,
    /// Whole files
    File,
}

impl From<UnitArg> for Granularity {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Function => Granularity::Function,
            UnitArg::Class => Granularity::Class,
            UnitArg::File => Granularity::File,
        }
    }
}

/// Language filter argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LanguageArg {
    /// C, C++ and Python
    All,
    /// C
    C,
    /// C++
    Cpp,
    /// Python
    Python,
}

impl From<LanguageArg> for LanguageFilter {
    fn from(language: LanguageArg) -> Self {
        match language {
            LanguageArg::All => LanguageFilter::All,
            LanguageArg::C => LanguageFilter::C,
            LanguageArg::Cpp => LanguageFilter::Cpp,
            LanguageArg::Python => LanguageFilter::Python,
        }
    }
}

/// Authority argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum AuthorityArg {
    /// Binding specification text
    Normative,
    /// Approved reading of a specification
    ApprovedInterpretation,
    /// Descriptive material, including code
    Informative,
    /// Not yet reviewed
    Unverified,
}

impl From<AuthorityArg> for Authority {
    fn from(authority: AuthorityArg) -> Self {
        match authority {
            AuthorityArg::Normative => Authority::Normative,
            AuthorityArg::ApprovedInterpretation => Authority::ApprovedInterpretation,
            AuthorityArg::Informative => Authority::Informative,
            AuthorityArg::Unverified => Authority::Unverified,
        }
    }
}

/// Status argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StatusArg {
    /// In force
    Active,
    /// Replaced by a newer claim
    Superseded,
    /// Withdrawn without replacement
    Retired,
}

impl From<StatusArg> for Status {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Active => Status::Active,
            StatusArg::Superseded => Status::Superseded,
            StatusArg::Retired => Status::Retired,
        }
    }
}

/// Artifact type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ArtifactTypeArg {
    /// Paged document
    Pdf,
    /// Spreadsheet
    Xlsx,
    /// Slide deck
    Pptx,
    /// Mail message
    Eml,
    /// Source code
    Code,
}

impl From<ArtifactTypeArg> for ArtifactType {
    fn from(ty: ArtifactTypeArg) -> Self {
        match ty {
            ArtifactTypeArg::Pdf => ArtifactType::Pdf,
            ArtifactTypeArg::Xlsx => ArtifactType::Xlsx,
            ArtifactTypeArg::Pptx => ArtifactType::Pptx,
            ArtifactTypeArg::Eml => ArtifactType::Eml,
            ArtifactTypeArg::Code => ArtifactType::Code,
        }
    }
}

/// Document artifact type argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DocumentTypeArg {
    /// Paged document
    Pdf,
    /// Spreadsheet
    Xlsx,
    /// Slide deck
    Pptx,
    /// Mail message
    Eml,
}

impl From<DocumentTypeArg> for ArtifactType {
    fn from(ty: DocumentTypeArg) -> Self {
        match ty {
            DocumentTypeArg::Pdf => ArtifactType::Pdf,
            DocumentTypeArg::Xlsx => ArtifactType::Xlsx,
            DocumentTypeArg::Pptx => ArtifactType::Pptx,
            DocumentTypeArg::Eml => ArtifactType::Eml,
        }
    }
}
