//! Integration tests for trace, plan and the coverage report

use crossspec_domain::{
    ArtifactType, Authority, Claim, ClaimId, ClaimIdGenerator, ExtractedClaim, Facets, IdPrefix,
    RunContext, SourceInfo,
};
use crossspec_store::FacetIndex;
use crossspec_trace::{
    coverage_report, plan, Coverage, Decomposer, DecomposerConfig, FeatureStatus, Matcher,
    MatcherConfig, TraceError, Tracer,
};
use std::sync::Arc;

struct Fixture {
    spec: ClaimId,
    brake_apply: ClaimId,
    timer_tick: ClaimId,
    claims: Vec<Claim>,
}

fn build(ctx: &RunContext, ty: ArtifactType, path: &str, text: &str, features: &[&str]) -> Claim {
    let facets = features
        .iter()
        .fold(Facets::new(), |facets, f| facets.with("feature", *f));
    let authority = if ty == ArtifactType::Code {
        Authority::Informative
    } else {
        Authority::Normative
    };
    let extracted = ExtractedClaim::new(text, SourceInfo::new(ty, path), "test")
        .with_authority(authority)
        .with_facets(facets);
    Claim::build(extracted, ctx).unwrap()
}

fn fixture() -> Fixture {
    let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
    let spec = build(
        &ctx,
        ArtifactType::Pdf,
        "docs/brake_spec.pdf",
        "The brake shall engage within 100 ms.",
        &["brake", "timing"],
    );
    let brake_apply = build(
        &ctx,
        ArtifactType::Code,
        "src/brake/brake.c",
        "void brake_apply(int level)\n{\n    pwm_set(level);\n}\n",
        &["brake"],
    );
    let timer_tick = build(
        &ctx,
        ArtifactType::Code,
        "src/timing/timer.c",
        "void timer_tick_1ms(void)\n{\n    ticks++;\n}\n",
        &["timing"],
    );
    let diag_spec = build(
        &ctx,
        ArtifactType::Xlsx,
        "docs/diag.xlsx",
        "Diagnostic trouble codes are stored.",
        &["diag"],
    );
    let nvm_code = build(
        &ctx,
        ArtifactType::Code,
        "tools/nvm_codec.py",
        "def encode(record):\n    return bytes(record)\n",
        &["nvm"],
    );
    Fixture {
        spec: spec.claim_id().clone(),
        brake_apply: brake_apply.claim_id().clone(),
        timer_tick: timer_tick.claim_id().clone(),
        claims: vec![spec, brake_apply, timer_tick, diag_spec, nvm_code],
    }
}

fn tracer(fixture: &Fixture) -> Tracer {
    let index = FacetIndex::build(fixture.claims.clone());
    Tracer::new(
        Arc::new(index),
        MatcherConfig::default(),
        DecomposerConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_trace_ranks_facet_matches() {
    let fixture = fixture();
    let result = tracer(&fixture).trace(&fixture.spec, 10).unwrap();

    let candidates: Vec<_> = result.matches.iter().map(|m| m.candidate.clone()).collect();
    assert_eq!(candidates, vec![fixture.brake_apply.clone(), fixture.timer_tick.clone()]);
    assert!(result.matches[0].evidence.matched_tokens.contains("brake"));
    assert_eq!(result.coverage, Coverage::Partial);
}

#[test]
fn test_trace_top_n_and_unknown_claim() {
    let fixture = fixture();
    let tracer = tracer(&fixture);
    assert_eq!(tracer.trace(&fixture.spec, 1).unwrap().matches.len(), 1);

    let err = tracer
        .trace(&ClaimId::from_string("CLM-GEN-999999"), 5)
        .unwrap_err();
    assert!(matches!(err, TraceError::ClaimNotFound(_)));
}

#[test]
fn test_trace_uses_configured_threshold() {
    let fixture = fixture();
    let index = Arc::new(FacetIndex::build(fixture.claims.clone()));
    let config = MatcherConfig {
        threshold: 1.0,
        ..MatcherConfig::default()
    };
    let tracer = Tracer::new(index, config, DecomposerConfig::default()).unwrap();
    assert_eq!(tracer.trace(&fixture.spec, 10).unwrap().coverage, Coverage::Full);
}

#[test]
fn test_plan_brake_timing_example() {
    let fixture = fixture();
    let result = tracer(&fixture)
        .plan("The brake shall engage within 100 ms.")
        .unwrap();

    assert_eq!(result.breakdown(), vec!["The brake", "engage", "100 ms"]);

    let brake = &result.fragments[0];
    assert!(brake.fragment.facets.contains("feature", "brake"));
    assert_eq!(brake.matches[0].candidate, fixture.brake_apply);
    assert_eq!(brake.coverage, Coverage::Full);

    assert!(result.fragments[1].matches.is_empty());
    assert_eq!(result.fragments[1].coverage, Coverage::None);

    let timing = &result.fragments[2];
    assert!(timing.fragment.facets.contains("feature", "timing"));
    assert_eq!(timing.matches[0].candidate, fixture.timer_tick);
}

#[test]
fn test_plan_brake_controller_requirement() {
    let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
    let brake = build(
        &ctx,
        ArtifactType::Code,
        "src/brake/brake_controller.cpp",
        "void BrakeController::apply(int level) { pwm_set(level); }",
        &["brake"],
    );
    let timing = build(
        &ctx,
        ArtifactType::Code,
        "src/timing/timer.c",
        "void timer_tick_1ms(void) { ticks++; }",
        &["timing"],
    );
    let (brake_id, timing_id) = (brake.claim_id().clone(), timing.claim_id().clone());
    let index = Arc::new(FacetIndex::build(vec![brake, timing]));
    let tracer = Tracer::new(index, MatcherConfig::default(), DecomposerConfig::default()).unwrap();

    let result = tracer
        .plan("The brake controller shall initialize comms within 100ms and report diagnostics on timing drift.")
        .unwrap();

    assert!(!result.breakdown().is_empty());
    let matched = |id: &ClaimId| {
        result
            .fragments
            .iter()
            .any(|f| f.matches.iter().any(|m| &m.candidate == id))
    };
    assert!(matched(&brake_id));
    assert!(matched(&timing_id));
}

#[test]
fn test_plan_empty_requirement() {
    let fixture = fixture();
    let tracer = tracer(&fixture);
    assert_eq!(tracer.plan("").unwrap_err(), TraceError::EmptyRequirement);
    assert_eq!(tracer.plan("  ;.  ").unwrap_err(), TraceError::EmptyRequirement);
}

#[test]
fn test_plan_over_pool_matches_indexed_plan() {
    let fixture = fixture();
    let decomposer = Decomposer::new(DecomposerConfig::default()).unwrap();
    let matcher = Matcher::new(MatcherConfig::default()).unwrap();
    let text = "Braking torque and diagnostic reporting";

    let direct = plan(&decomposer, &matcher, text, &fixture.claims, 10).unwrap();
    let indexed = tracer(&fixture).plan(text).unwrap();
    assert_eq!(direct, indexed);
}

#[test]
fn test_coverage_report() {
    let fixture = fixture();
    let index = FacetIndex::build(fixture.claims.clone());

    let rows = coverage_report(&index, None);
    let summary: Vec<_> = rows
        .iter()
        .map(|r| (r.feature.as_str(), r.spec_count, r.impl_count, r.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("brake", 1, 1, FeatureStatus::Covered),
            ("diag", 1, 0, FeatureStatus::Unimplemented),
            ("nvm", 0, 1, FeatureStatus::Untraced),
            ("timing", 1, 1, FeatureStatus::Covered),
        ]
    );

    let only = coverage_report(&index, Some(&["CAN".to_string()]));
    assert_eq!(only.len(), 1);
    assert_eq!(only[0].feature, "can");
    assert_eq!(only[0].status, FeatureStatus::Unimplemented);
}

#[test]
fn test_trace_result_json_shape() {
    let fixture = fixture();
    let result = tracer(&fixture).trace(&fixture.spec, 10).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["coverage"], "partial");
    assert_eq!(json["query"], fixture.spec.as_str());
    let first = &json["matches"][0];
    assert_eq!(first["candidate"], fixture.brake_apply.as_str());
    assert!(first.get("authority_rank").is_none());
    assert_eq!(first["evidence"]["matched_facets"]["feature"][0], "brake");
}
