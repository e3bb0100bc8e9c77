use crate::model::{PostMetric, ViralityResult};
use crate::utils::clamp_score;

/// Engagement rate regarded as maximal.
const MAX_ENGAGEMENT_RATE: f64 = 0.1;
/// Engagement growth per hour regarded as maximal.
const MAX_GROWTH_PER_HOUR: f64 = 50.0;
const MAX_AMPLIFICATION: f64 = 1.0;

const ENGAGEMENT_WEIGHT: f64 = 0.5;
const GROWTH_WEIGHT: f64 = 0.3;
const AMPLIFICATION_WEIGHT: f64 = 0.2;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Computes the social-buzz composite for a set of posts.
pub fn virality(posts: &[PostMetric]) -> ViralityResult {
    let reach: f64 = posts.iter().map(|p| p.reach).sum();
    let engagement: f64 = posts.iter().map(PostMetric::engagement).sum();
    let shares: f64 = posts.iter().map(|p| p.shares).sum();

    let engagement_rate = if reach > 0.0 { engagement / reach } else { 0.0 };
    let network_amplification = if reach > 0.0 {
        (shares / reach * 10.0).min(1.0)
    } else {
        0.0
    };
    let growth_rate = growth_rate(posts);

    let composite = 100.0
        * (ENGAGEMENT_WEIGHT * normalize(engagement_rate, MAX_ENGAGEMENT_RATE)
            + GROWTH_WEIGHT * normalize(growth_rate, MAX_GROWTH_PER_HOUR)
            + AMPLIFICATION_WEIGHT * normalize(network_amplification, MAX_AMPLIFICATION));

    ViralityResult {
        reach,
        engagement,
        engagement_rate,
        growth_rate,
        network_amplification,
        composite_score: clamp_score(composite),
        post_count: posts.len(),
    }
}

/// Engagement change per hour between the earliest and the latest post.
fn growth_rate(posts: &[PostMetric]) -> f64 {
    if posts.len() < 2 {
        return 0.0;
    }
    let mut sorted: Vec<&PostMetric> = posts.iter().collect();
    sorted.sort_by_key(|p| p.timestamp_ms);
    let (first, last) = match (sorted.first(), sorted.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };
    let hours = (last.timestamp_ms - first.timestamp_ms) as f64 / MS_PER_HOUR;
    if hours <= 0.0 {
        return 0.0;
    }
    (last.engagement() - first.engagement()) / hours
}

fn normalize(value: f64, ceiling: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / ceiling).clamp(0.0, 1.0)
}

/// Blends the collaborator's extended social signal with the virality composite.
/// Without post data the extended signal stands alone.
pub fn social_presence_score(extended_score: f64, virality: Option<&ViralityResult>) -> f64 {
    match virality {
        Some(v) if v.post_count > 0 => (extended_score * 0.4 + v.composite_score * 0.6).round(),
        _ => extended_score.round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(reach: f64, likes: f64, comments: f64, shares: f64, timestamp_ms: i64) -> PostMetric {
        PostMetric {
            reach,
            likes,
            comments,
            shares,
            timestamp_ms,
        }
    }

    #[test]
    fn no_posts_scores_zero() {
        let r = virality(&[]);
        assert_eq!(r.reach, 0.0);
        assert_eq!(r.engagement, 0.0);
        assert_eq!(r.engagement_rate, 0.0);
        assert_eq!(r.growth_rate, 0.0);
        assert_eq!(r.network_amplification, 0.0);
        assert_eq!(r.composite_score, 0.0);
        assert_eq!(r.post_count, 0);
    }

    #[test]
    fn single_post_uses_rate_and_amplification_only() {
        let r = virality(&[post(1000.0, 10.0, 2.0, 1.0, 1_700_000_000_000)]);
        assert_eq!(r.engagement, 17.0);
        assert!((r.engagement_rate - 0.017).abs() < 1e-12);
        assert_eq!(r.growth_rate, 0.0);
        assert!((r.network_amplification - 0.01).abs() < 1e-12);
        // 100 * (0.5 * 0.17 + 0.2 * 0.01) = 8.7
        assert_eq!(r.composite_score, 9.0);
    }

    #[test]
    fn growth_measured_between_earliest_and_latest() {
        let hour = 3_600_000;
        let posts = [
            post(100.0, 100.0, 0.0, 0.0, 2 * hour),
            post(100.0, 0.0, 0.0, 0.0, 0),
            post(100.0, 50.0, 0.0, 0.0, hour),
        ];
        let r = virality(&posts);
        assert!((r.growth_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn simultaneous_posts_have_no_growth() {
        let posts = [post(100.0, 1.0, 0.0, 0.0, 5), post(100.0, 90.0, 0.0, 0.0, 5)];
        assert_eq!(virality(&posts).growth_rate, 0.0);
    }

    #[test]
    fn saturated_signals_cap_at_hundred() {
        let hour = 3_600_000;
        let posts = [post(10.0, 0.0, 0.0, 0.0, 0), post(10.0, 500.0, 100.0, 100.0, hour)];
        let r = virality(&posts);
        assert_eq!(r.network_amplification, 1.0);
        assert_eq!(r.composite_score, 100.0);
    }

    #[test]
    fn social_blend_needs_posts() {
        let v = virality(&[post(1000.0, 10.0, 2.0, 1.0, 0)]);
        assert_eq!(social_presence_score(80.0, Some(&v)), (80.0f64 * 0.4 + 9.0 * 0.6).round());
        assert_eq!(social_presence_score(80.0, None), 80.0);
        assert_eq!(social_presence_score(80.0, Some(&virality(&[]))), 80.0);
    }
}
