//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use crossspec_domain::{Claim, Facets, Locator, SourceInfo};
use crossspec_extractor::RunReport;
use crossspec_store::FacetIndex;
use crossspec_trace::{Coverage, CoverageRow, FeatureStatus, Match, PlanResult, TraceResult};
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

const TEXT_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format in use.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a claim list.
    pub fn format_claims(&self, claims: &[&Claim], show_source: bool) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(claims)?),
            OutputFormat::Quiet => Ok(quiet_ids(claims.iter().map(|c| c.claim_id().as_str()))),
            OutputFormat::Table => {
                if claims.is_empty() {
                    return Ok(self.colorize("No claims found.", "yellow"));
                }
                let mut builder = Builder::default();
                let mut header = vec!["ID", "Type", "Authority", "Facets", "Text"];
                if show_source {
                    header.push("Source");
                }
                builder.push_record(header);
                for claim in claims {
                    let mut row = vec![
                        claim.claim_id().to_string(),
                        claim.source().artifact_type.to_string(),
                        claim.authority().to_string(),
                        facets_cell(claim.facets()),
                        truncate(claim.text_raw(), TEXT_WIDTH),
                    ];
                    if show_source {
                        row.push(source_cell(claim.source()));
                    }
                    builder.push_record(row);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format one claim with all of its fields.
    pub fn format_claim_detail(&self, claim: &Claim) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(claim)?),
            OutputFormat::Quiet => Ok(claim.claim_id().to_string()),
            OutputFormat::Table => {
                let mut fields = vec![
                    ("ID".to_string(), claim.claim_id().to_string()),
                    ("Authority".to_string(), claim.authority().to_string()),
                    ("Status".to_string(), claim.status().to_string()),
                    ("Source".to_string(), source_cell(claim.source())),
                    ("Facets".to_string(), facets_cell(claim.facets())),
                    ("Method".to_string(), claim.provenance().method.clone()),
                    ("Hash".to_string(), claim.hash().value.clone()),
                    ("Extracted by".to_string(), claim.extracted_by().to_string()),
                    ("Created".to_string(), claim.created_at().to_rfc3339()),
                ];
                for (kind, target) in claim.relations().iter() {
                    fields.push((format!("Relation ({})", kind), target.to_string()));
                }

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in fields {
                    builder.push_record([field, value]);
                }
                let mut out = styled(builder);
                out.push_str("\n\n");
                out.push_str(claim.text_raw().trim_end());
                Ok(out)
            }
        }
    }

    /// Format a trace result.
    pub fn format_trace(&self, result: &TraceResult, index: &FacetIndex) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(quiet_ids(
                result.matches.iter().map(|m| m.candidate.as_str()),
            )),
            OutputFormat::Table => {
                let mut out = format!("Trace for {}\n", result.query);
                if result.matches.is_empty() {
                    out.push_str(&self.colorize("No matching implementation claims.", "yellow"));
                } else {
                    out.push_str(&matches_table(&result.matches, index));
                }
                out.push('\n');
                out.push_str(&format!("Coverage: {}", self.coverage_label(result.coverage)));
                Ok(out)
            }
        }
    }

    /// Format a requirement plan.
    pub fn format_plan(&self, result: &PlanResult, index: &FacetIndex) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Quiet => Ok(result.breakdown().join("\n")),
            OutputFormat::Table => {
                let mut sections = vec![format!("Requirement: {}", result.requirement)];
                for plan in &result.fragments {
                    let facets = facets_cell(&plan.fragment.facets);
                    let mut section = format!(
                        "[{}] {}{}  coverage: {}\n",
                        plan.fragment.index + 1,
                        plan.fragment.text,
                        if facets.is_empty() {
                            String::new()
                        } else {
                            format!("  ({})", facets)
                        },
                        self.coverage_label(plan.coverage)
                    );
                    if plan.matches.is_empty() {
                        section.push_str(&self.colorize("  no candidates", "yellow"));
                    } else {
                        section.push_str(&matches_table(&plan.matches, index));
                    }
                    sections.push(section);
                }
                Ok(sections.join("\n\n"))
            }
        }
    }

    /// Format the feature coverage report.
    pub fn format_coverage(&self, rows: &[CoverageRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
            OutputFormat::Quiet => Ok(rows
                .iter()
                .filter(|r| r.status != FeatureStatus::Covered)
                .map(|r| r.feature.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if rows.is_empty() {
                    return Ok(self.colorize("No features found.", "yellow"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Feature", "Spec claims", "Impl claims", "Status"]);
                for row in rows {
                    let color = match row.status {
                        FeatureStatus::Covered => "green",
                        FeatureStatus::Unimplemented => "red",
                        FeatureStatus::Untraced => "yellow",
                    };
                    builder.push_record([
                        row.feature.clone(),
                        row.spec_count.to_string(),
                        row.impl_count.to_string(),
                        self.colorize(row.status.as_str(), color),
                    ]);
                }
                Ok(styled(builder))
            }
        }
    }

    /// Format the summary of an extraction run.
    pub fn format_run_report(&self, report: &RunReport, out: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "output": out.display().to_string(),
                "claims": report.claims.len(),
                "files_scanned": report.files_scanned,
                "matched": report.summary.matched,
                "excluded": report.summary.excluded,
                "too_large": report.summary.too_large,
                "processing_time_ms": report.processing_time_ms,
                "diagnostics": report.diagnostics,
            }))?),
            OutputFormat::Quiet => Ok(quiet_ids(
                report.claims.iter().map(|c| c.claim_id().as_str()),
            )),
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!(
                    "Wrote {} claim(s) to {}",
                    report.claims.len(),
                    out.display()
                ))];
                lines.push(format!(
                    "Files: {} matched, {} excluded, {} too large, {} scanned ({} ms)",
                    report.summary.matched,
                    report.summary.excluded,
                    report.summary.too_large,
                    report.files_scanned,
                    report.processing_time_ms
                ));
                for diagnostic in &report.diagnostics {
                    lines.push(self.warning(&format!(
                        "{} [{}] {}",
                        diagnostic.path,
                        diagnostic.kind.as_str(),
                        diagnostic.message
                    )));
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn coverage_label(&self, coverage: Coverage) -> String {
        let color = match coverage {
            Coverage::Full => "green",
            Coverage::Partial => "yellow",
            Coverage::None => "red",
        };
        self.colorize(coverage.as_str(), color)
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

fn matches_table(matches: &[Match], index: &FacetIndex) -> String {
    let mut builder = Builder::default();
    builder.push_record(["#", "Claim", "Score", "Facets", "Tokens", "Source"]);
    for (rank, m) in matches.iter().enumerate() {
        let source = index
            .get(&m.candidate)
            .map(|c| source_cell(c.source()))
            .unwrap_or_default();
        builder.push_record([
            (rank + 1).to_string(),
            m.candidate.to_string(),
            format!("{:.2}", m.score),
            facets_cell(&m.evidence.matched_facets),
            m.evidence
                .matched_tokens
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            source,
        ]);
    }
    styled(builder)
}

fn quiet_ids<'a>(ids: impl Iterator<Item = &'a str>) -> String {
    ids.collect::<Vec<_>>().join("\n")
}

/// `feature=brake, feature=timing`
fn facets_cell(facets: &Facets) -> String {
    facets
        .pairs()
        .map(|(facet, value)| format!("{}={}", facet, value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn source_cell(source: &SourceInfo) -> String {
    let location = match &source.locator {
        Some(Locator::Page { page }) => format!(" p.{}", page),
        Some(Locator::Slide { slide }) => format!(" slide {}", slide),
        Some(Locator::Row { sheet, row }) => format!(" {}!{}", sheet, row),
        Some(Locator::Message { index }) => format!(" msg {}", index),
        Some(Locator::Lines {
            line_start,
            line_end,
            ..
        }) => format!(":{}-{}", line_start, line_end),
        None => String::new(),
    };
    format!("{}{}", source.path, location)
}

/// First line of `text`, cut to `width` characters
fn truncate(text: &str, width: usize) -> String {
    let line = text.lines().find(|l| !l.trim().is_empty()).unwrap_or("").trim();
    if line.chars().count() <= width {
        line.to_string()
    } else {
        let cut: String = line.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
