//! Converts text length + match evidence into the originality/plagiarism
//! percentage pair.
//!
//! One scoring policy: the length-bucket heuristic. Evidence mode applies a
//! per-source penalty to the bucket's base; fallback mode (provider disabled
//! or evidence gathering failed) samples uniformly from the bucket's range.
//! Randomness is a caller-supplied [`Rng`] so tests can pin output.

use plagicheck_core::{CandidateSource, LengthBucket, ScoreResult};
use rand::Rng;

/// Total penalty never exceeds this, regardless of evidence count.
const PENALTY_CAP: f64 = 28.0;
/// Evidence-mode originality is clamped into this range.
const CLAMP_MIN: f64 = 50.0;
const CLAMP_MAX: f64 = 98.0;
/// Symmetric perturbation applied in evidence mode so repeated checks of
/// the same text don't render a visibly constant number.
const JITTER: f64 = 1.0;

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn finish(originality: f64, sources: Vec<CandidateSource>) -> ScoreResult {
    // Round originality first so the pair sums to exactly 100.0.
    let originality = round1(originality);
    ScoreResult {
        originality,
        plagiarism: round1(100.0 - originality),
        sources,
    }
}

/// Evidence-mode score for a text of `text_chars` chars with the given
/// sources. Texts below the acceptance floor yield a zeroed result; callers
/// are expected to have rejected them already.
pub fn score<R: Rng>(text_chars: usize, sources: Vec<CandidateSource>, rng: &mut R) -> ScoreResult {
    let Some(bucket) = LengthBucket::from_chars(text_chars) else {
        return ScoreResult::zeroed();
    };

    let penalty = (bucket.penalty_per_source() * sources.len() as f64).min(PENALTY_CAP);
    let jitter = rng.gen_range(-JITTER..=JITTER);
    let originality = (bucket.base() - penalty + jitter).clamp(CLAMP_MIN, CLAMP_MAX);
    finish(originality, sources)
}

/// Fallback score: no provider, no evidence. Samples the bucket's range.
pub fn fallback<R: Rng>(text_chars: usize, rng: &mut R) -> ScoreResult {
    let Some(bucket) = LengthBucket::from_chars(text_chars) else {
        return ScoreResult::zeroed();
    };

    let (lo, hi) = bucket.fallback_range();
    finish(rng.gen_range(lo..=hi), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn srcs(n: usize) -> Vec<CandidateSource> {
        (0..n)
            .map(|i| CandidateSource {
                title: format!("src {i}"),
                url: format!("https://example{i}.com/"),
            })
            .collect()
    }

    #[test]
    fn undersized_text_yields_zeroed_result() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(score(300, srcs(1), &mut rng), ScoreResult::zeroed());
        assert_eq!(fallback(499, &mut rng), ScoreResult::zeroed());
    }

    #[test]
    fn medium_bucket_with_two_sources_lands_near_74() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = score(1500, srcs(2), &mut rng);
        // 86.0 - 6.0*2 ± 1.0 jitter.
        assert!((73.0..=75.0).contains(&r.originality), "{}", r.originality);
        assert_eq!(r.sources.len(), 2);
        assert!((r.originality + r.plagiarism - 100.0).abs() < 0.05);
    }

    #[test]
    fn penalty_is_capped() {
        let mut rng = StdRng::seed_from_u64(7);
        // Short bucket, absurd evidence count: 78 - 28 ± 1, clamped ≥ 50.
        let r = score(600, srcs(10), &mut rng);
        assert!((49.0..=51.1).contains(&r.originality));
        assert!(r.originality >= 50.0);
    }

    #[test]
    fn fallback_stays_inside_bucket_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let r = fallback(520, &mut rng);
            assert!((65.0..=80.0).contains(&r.originality), "{}", r.originality);
            assert!(r.sources.is_empty());
        }
        for _ in 0..50 {
            let r = fallback(2000, &mut rng);
            assert!((75.0..=90.0).contains(&r.originality));
        }
        for _ in 0..50 {
            let r = fallback(8000, &mut rng);
            assert!((85.0..=95.0).contains(&r.originality));
        }
    }

    proptest! {
        #[test]
        fn pair_always_sums_to_100(chars in 500usize..20_000, n in 0usize..=2, seed: u64) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = score(chars, srcs(n), &mut rng);
            prop_assert!((r.originality + r.plagiarism - 100.0).abs() < 0.05);
            prop_assert!((50.0..=98.0).contains(&r.originality));
        }

        #[test]
        fn fallback_pair_always_sums_to_100(chars in 500usize..20_000, seed: u64) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = fallback(chars, &mut rng);
            prop_assert!((r.originality + r.plagiarism - 100.0).abs() < 0.05);
        }
    }
}
