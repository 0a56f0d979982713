//! Property tests for ranking and coverage

use crossspec_domain::{
    ArtifactType, Authority, Claim, ClaimIdGenerator, ExtractedClaim, Facets, IdPrefix,
    RunContext, SourceInfo,
};
use crossspec_trace::{Coverage, Matcher, MatcherConfig};
use proptest::prelude::*;

const WORDS: &[&str] = &["brake", "timer", "can", "frame", "nvm", "flash", "init", "level"];
const FEATURES: &[&str] = &["brake", "timing", "can", "nvm"];
const AUTHORITIES: &[Authority] = &[
    Authority::Normative,
    Authority::ApprovedInterpretation,
    Authority::Informative,
    Authority::Unverified,
];

#[derive(Debug, Clone)]
struct Spec {
    code: bool,
    words: Vec<usize>,
    features: Vec<usize>,
    authority: usize,
}

fn spec_strategy() -> impl Strategy<Value = Spec> {
    (
        any::<bool>(),
        prop::collection::vec(0..WORDS.len(), 1..5),
        prop::collection::vec(0..FEATURES.len(), 0..3),
        0..AUTHORITIES.len(),
    )
        .prop_map(|(code, words, features, authority)| Spec {
            code,
            words,
            features,
            authority,
        })
}

fn build(ctx: &RunContext, spec: &Spec) -> Claim {
    let text: Vec<&str> = spec.words.iter().map(|&i| WORDS[i]).collect();
    let facets = spec
        .features
        .iter()
        .fold(Facets::new(), |facets, &i| facets.with("feature", FEATURES[i]));
    let ty = if spec.code {
        ArtifactType::Code
    } else {
        ArtifactType::Pdf
    };
    let extracted = ExtractedClaim::new(text.join(" "), SourceInfo::new(ty, "p"), "test")
        .with_authority(AUTHORITIES[spec.authority])
        .with_facets(facets);
    Claim::build(extracted, ctx).unwrap()
}

proptest! {
    #[test]
    fn ranking_is_bounded_sorted_and_consistent(
        query in spec_strategy(),
        pool in prop::collection::vec(spec_strategy(), 0..20),
        top_n in 1usize..8,
    ) {
        let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
        let query = build(&ctx, &Spec { code: false, ..query });
        let pool: Vec<Claim> = pool.iter().map(|s| build(&ctx, s)).collect();
        let matcher = Matcher::new(MatcherConfig::default()).unwrap();

        let result = matcher.trace(&query, &pool, top_n).unwrap();

        prop_assert!(result.matches.len() <= top_n);
        for m in &result.matches {
            prop_assert!(m.score > 0.0);
            prop_assert!((m.score - m.evidence.facet_score - m.evidence.token_score).abs() < 1e-9);
        }
        for pair in result.matches.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                let rank = |id: &crossspec_domain::ClaimId| {
                    pool.iter()
                        .find(|c| c.claim_id() == id)
                        .map(|c| c.authority().rank())
                        .unwrap_or_default()
                };
                let (a, b) = (rank(&pair[0].candidate), rank(&pair[1].candidate));
                prop_assert!(a > b || (a == b && pair[0].candidate < pair[1].candidate));
            }
        }
        prop_assert_eq!(result.matches.is_empty(), result.coverage == Coverage::None);
    }

    #[test]
    fn tracing_is_deterministic(
        query in spec_strategy(),
        pool in prop::collection::vec(spec_strategy(), 0..12),
    ) {
        let ctx = RunContext::new(ClaimIdGenerator::new(IdPrefix::default()));
        let query = build(&ctx, &Spec { code: false, ..query });
        let pool: Vec<Claim> = pool.iter().map(|s| build(&ctx, s)).collect();
        let matcher = Matcher::new(MatcherConfig::default()).unwrap();

        let mut reversed: Vec<&Claim> = pool.iter().collect();
        reversed.reverse();
        let forward = matcher.trace(&query, &pool, 5).unwrap();
        let backward = matcher.trace(&query, reversed, 5).unwrap();
        prop_assert_eq!(forward, backward);
    }
}
