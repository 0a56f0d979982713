//! Integration tests for crossspec-store
//!
//! These tests cover the file round trip and index loading across files.

use chrono::{TimeZone, Utc};
use crossspec_domain::{
    ArtifactType, Authority, Claim, ClaimId, ClaimIdGenerator, ClaimLookup, ExtractedClaim,
    Facets, IdPrefix, Locator, RunContext, SourceInfo, UnitKind,
};
use crossspec_store::{load_index, read_claims, write_claims, StoreError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn context(prefix: &str) -> RunContext {
    RunContext::new(ClaimIdGenerator::new(IdPrefix::Namespace {
        prefix: prefix.to_string(),
    }))
    .with_default_authority(Authority::Normative)
    .with_clock(Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap())
}

fn spec_claim(ctx: &RunContext, text: &str) -> Claim {
    let source = SourceInfo::new(ArtifactType::Pdf, "docs/brake_spec.pdf")
        .with_locator(Locator::Page { page: 4 })
        .with_doc_rev("B");
    let extracted = ExtractedClaim::new(text, source, "pdf:text_layer")
        .with_facets(Facets::new().with("feature", "brake"));
    Claim::build(extracted, ctx).unwrap()
}

fn code_claim(ctx: &RunContext, text: &str) -> Claim {
    let source = SourceInfo::new(ArtifactType::Code, "src/brake/brake.c").with_locator(
        Locator::Lines {
            unit: UnitKind::Function,
            line_start: 3,
            line_end: 6,
            byte_start: 20,
            byte_end: 80,
        },
    );
    let extracted = ExtractedClaim::new(text, source, "code_extract:c_like")
        .with_authority(Authority::Informative)
        .with_attribute("symbol", "brake_apply");
    Claim::build(extracted, ctx).unwrap()
}

#[test]
fn test_write_and_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outputs/claims.jsonl");
    let ctx = context("BRK");
    let claims = vec![
        spec_claim(&ctx, "The brake shall engage within 100 ms."),
        code_claim(&ctx, "void brake_apply(int level)\n{\n}\n"),
    ];

    write_claims(&path, &claims).unwrap();
    let read = read_claims(&path).unwrap();

    assert_eq!(read, claims);
    assert!(read.iter().all(Claim::verify_hash));

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.ends_with('\n'));
    assert!(!text.contains("\"relations\""));
}

#[test]
fn test_rewrite_replaces_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claims.jsonl");
    let ctx = context("BRK");

    write_claims(&path, &[spec_claim(&ctx, "one"), spec_claim(&ctx, "two")]).unwrap();
    write_claims(&path, &[spec_claim(&ctx, "three")]).unwrap();

    let read = read_claims(&path).unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].text_raw(), "three");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_malformed_line_reports_position() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("claims.jsonl");
    let ctx = context("BRK");
    write_claims(&path, &[spec_claim(&ctx, "one")]).unwrap();

    let mut text = fs::read_to_string(&path).unwrap();
    text.push_str("\n{\"claim_id\": \"CLM-BRK-000009\"}\n");
    fs::write(&path, text).unwrap();

    match read_claims(&path) {
        Err(StoreError::Json { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a JSON error, got {:?}", other),
    }
}

#[test]
fn test_load_index_first_file_wins() {
    let dir = TempDir::new().unwrap();
    let specs = dir.path().join("specs.jsonl");
    let code = dir.path().join("code.jsonl");

    write_claims(&specs, &[spec_claim(&context("X"), "from specs")]).unwrap();
    write_claims(
        &code,
        &[
            code_claim(&context("X"), "from code"),
            code_claim(&context("Y"), "void other(void) {}"),
        ],
    )
    .unwrap();

    let index = load_index(&[specs, code]).unwrap();
    assert_eq!(index.claim_count(), 2);
    assert_eq!(index.duplicates(), 1);
    let first = index.get(&ClaimId::from_string("CLM-X-000001")).unwrap();
    assert_eq!(first.text_raw(), "from specs");

    let ids: Vec<_> = index.claims().map(|c| c.claim_id().as_str()).collect();
    assert_eq!(ids, vec!["CLM-X-000001", "CLM-Y-000001"]);
}

#[test]
fn test_load_index_missing_file() {
    let err = load_index(&[PathBuf::from("/nonexistent/claims.jsonl")]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}
