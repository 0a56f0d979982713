//! Index lookups agree with a linear scan

use crossspec_domain::{
    ArtifactType, Authority, Claim, ClaimIdGenerator, ExtractedClaim, Facets, IdPrefix,
    RunContext, SourceInfo, Status,
};
use crossspec_store::{FacetIndex, IndexFilter};
use proptest::prelude::*;

const WORDS: &[&str] = &["brake", "pedal", "timer", "frame", "nvm", "init", "crc"];
const FEATURES: &[&str] = &["brake", "timing", "can", "nvm"];
const TYPES: &[ArtifactType] = &[ArtifactType::Pdf, ArtifactType::Xlsx, ArtifactType::Code];
const AUTHORITIES: &[Authority] = &[
    Authority::Normative,
    Authority::Informative,
    Authority::Unverified,
];
const STATUSES: &[Status] = &[Status::Active, Status::Superseded];

#[derive(Debug, Clone)]
struct ClaimShape {
    words: Vec<usize>,
    features: Vec<usize>,
    ty: usize,
    authority: usize,
    status: usize,
}

fn claim_strategy() -> impl Strategy<Value = ClaimShape> {
    (
        prop::collection::vec(0..WORDS.len(), 1..4),
        prop::collection::vec(0..FEATURES.len(), 0..3),
        0..TYPES.len(),
        0..AUTHORITIES.len(),
        0..STATUSES.len(),
    )
        .prop_map(|(words, features, ty, authority, status)| ClaimShape {
            words,
            features,
            ty,
            authority,
            status,
        })
}

fn filter_strategy() -> impl Strategy<Value = IndexFilter> {
    (
        prop::collection::vec((0..FEATURES.len(), any::<bool>()), 0..3),
        prop::option::of(0..TYPES.len()),
        prop::option::of(0..AUTHORITIES.len()),
        prop::option::of(0..STATUSES.len()),
        prop::collection::vec(0..WORDS.len(), 0..2),
    )
        .prop_map(|(features, ty, authority, status, words)| {
            let mut filter = IndexFilter::new();
            for (i, upper) in features {
                let value = if upper {
                    FEATURES[i].to_uppercase()
                } else {
                    FEATURES[i].to_string()
                };
                filter = filter.with_facet("feature", &value);
            }
            if let Some(i) = ty {
                filter = filter.with_type(TYPES[i]);
            }
            if let Some(i) = authority {
                filter = filter.with_authority(AUTHORITIES[i]);
            }
            if let Some(i) = status {
                filter = filter.with_status(STATUSES[i]);
            }
            let text: Vec<&str> = words.iter().map(|&i| WORDS[i]).collect();
            filter.with_text(&text.join(" "))
        })
}

fn build(ctx: &RunContext, shape: &ClaimShape) -> Claim {
    let text: Vec<&str> = shape.words.iter().map(|&i| WORDS[i]).collect();
    let facets = shape
        .features
        .iter()
        .fold(Facets::new(), |facets, &i| facets.with("feature", FEATURES[i]));
    let extracted = ExtractedClaim::new(
        text.join(" "),
        SourceInfo::new(TYPES[shape.ty], "artifact"),
        "test",
    )
    .with_authority(AUTHORITIES[shape.authority])
    .with_status(STATUSES[shape.status])
    .with_facets(facets);
    Claim::build(extracted, ctx).unwrap()
}

fn admits(index: &FacetIndex, filter: &IndexFilter, claim: &Claim) -> bool {
    let facets = filter.facets.case_folded();
    let facet_ok = facets.pairs().map(|(name, _)| name).all(|name| {
        facets
            .get(name)
            .is_some_and(|values| values.iter().any(|v| claim.facets().contains(name, v)))
    });
    let tokens_ok = index
        .tokens_of(claim.claim_id())
        .is_some_and(|tokens| filter.tokens.is_subset(tokens));
    facet_ok
        && tokens_ok
        && filter.artifact_type.is_none_or(|t| claim.source().artifact_type == t)
        && filter.authority.is_none_or(|a| claim.authority() == a)
        && filter.status.is_none_or(|s| claim.status() == s)
}

proptest! {
    #[test]
    fn filter_matches_linear_scan(
        shapes in prop::collection::vec(claim_strategy(), 0..25),
        filter in filter_strategy(),
    ) {
        let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
        let claims: Vec<Claim> = shapes.iter().map(|s| build(&ctx, s)).collect();
        let index = FacetIndex::build(claims);

        let expected: Vec<&Claim> = index.iter().filter(|c| admits(&index, &filter, c)).collect();
        prop_assert_eq!(index.filter(&filter), expected);
    }

    #[test]
    fn every_claim_is_reachable_by_id(shapes in prop::collection::vec(claim_strategy(), 0..25)) {
        let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
        let claims: Vec<Claim> = shapes.iter().map(|s| build(&ctx, s)).collect();
        let index = FacetIndex::build(claims.clone());

        prop_assert_eq!(index.len(), claims.len());
        for claim in &claims {
            prop_assert_eq!(index.get(claim.claim_id()), Some(claim));
        }
        let ids: Vec<_> = index.iter().map(|c| c.claim_id().clone()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }
}
