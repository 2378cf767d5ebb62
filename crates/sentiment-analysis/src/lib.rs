use analysis_core::{Category, CategoryScore, CategoryScorer, ScoreAccumulator, SentimentMetrics};

/// Funding rate beyond which one side of the perp market is considered overleveraged
const FUNDING_RATE_EXTREME: f64 = 0.01;
const LONG_SHORT_CROWDED_LONG: f64 = 2.0;
const LONG_SHORT_CROWDED_SHORT: f64 = 0.5;
/// Social feeds are noisy, so they only nudge the score
const SOCIAL_WEIGHT: f64 = 0.3;

/// Contrarian sentiment scorer.
///
/// Crowd extremes are read as reversal signals: extreme fear, overleveraged
/// shorts and crowded short positioning are bullish, and the mirror images are
/// bearish. Social feeds are the exception and push in their own direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    fn score_fear_greed(&self, index: u8, acc: &mut ScoreAccumulator) {
        match index {
            i if i <= 20 => {
                acc.vote(0.8)
                    .insight(format!("Extreme fear ({}) - contrarian bullish", i));
            }
            i if i <= 40 => {
                acc.vote(0.4)
                    .insight(format!("Fear ({}) - mild contrarian bullish", i));
            }
            i if i >= 80 => {
                acc.vote(-0.8)
                    .insight(format!("Extreme greed ({}) - contrarian bearish", i));
            }
            i if i >= 60 => {
                acc.vote(-0.4)
                    .insight(format!("Greed ({}) - mild contrarian bearish", i));
            }
            _ => {
                acc.count_only();
            }
        }
    }

    fn score_funding_rate(&self, rate: f64, acc: &mut ScoreAccumulator) {
        if rate > FUNDING_RATE_EXTREME {
            acc.vote(-0.5).insight(format!(
                "High funding rate ({:.4}) - overleveraged longs",
                rate
            ));
        } else if rate < -FUNDING_RATE_EXTREME {
            acc.vote(0.5).insight(format!(
                "Negative funding rate ({:.4}) - overleveraged shorts",
                rate
            ));
        } else {
            acc.count_only();
        }
    }

    fn score_long_short(&self, ratio: f64, acc: &mut ScoreAccumulator) {
        if ratio > LONG_SHORT_CROWDED_LONG {
            acc.vote(-0.3)
                .insight(format!("Long/short ratio {:.2} - crowded longs", ratio));
        } else if ratio < LONG_SHORT_CROWDED_SHORT {
            acc.vote(0.3)
                .insight(format!("Long/short ratio {:.2} - crowded shorts", ratio));
        } else {
            acc.count_only();
        }
    }
}

impl CategoryScorer<SentimentMetrics> for SentimentScorer {
    fn category(&self) -> Category {
        Category::Sentiment
    }

    fn score(&self, metrics: &SentimentMetrics) -> CategoryScore {
        let mut acc = ScoreAccumulator::new();

        self.score_fear_greed(metrics.fear_greed_index, &mut acc);

        if let Some(rate) = metrics.funding_rate {
            self.score_funding_rate(rate, &mut acc);
        }

        if let Some(ratio) = metrics.long_short_ratio {
            self.score_long_short(ratio, &mut acc);
        }

        if let Some(social) = metrics.social_average() {
            acc.vote(social * SOCIAL_WEIGHT)
                .insight(format!("Social sentiment average {:+.2}", social));
        }

        let components = acc.components_scored();
        let result = acc.finish();
        tracing::debug!(
            "Sentiment score {:.3} from {} components (fear/greed {}, {})",
            result.score,
            components,
            metrics.fear_greed_index,
            metrics.fear_greed_classification.label()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Utc;

    fn metrics(index: u8) -> SentimentMetrics {
        SentimentMetrics::new(Utc::now(), index)
    }

    #[test]
    fn test_mixed_inputs_score_positive() {
        let mut m = metrics(25);
        m.funding_rate = Some(0.005);
        m.long_short_ratio = Some(1.3);
        m.twitter_sentiment = Some(0.2);
        m.reddit_sentiment = Some(0.1);
        m.news_sentiment = Some(0.15);

        let result = SentimentScorer::new().score(&m);

        // (0.4 + 0 + 0 + 0.15 * 0.3) / 4
        assert!(result.score > 0.0);
        assert_relative_eq!(result.score, 0.445 / 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fear_greed_only() {
        let scorer = SentimentScorer::new();
        assert_relative_eq!(scorer.score(&metrics(10)).score, 0.8);
        assert_relative_eq!(scorer.score(&metrics(20)).score, 0.8);
        assert_relative_eq!(scorer.score(&metrics(21)).score, 0.4);
        assert_relative_eq!(scorer.score(&metrics(40)).score, 0.4);
        assert_relative_eq!(scorer.score(&metrics(41)).score, 0.0);
        assert_relative_eq!(scorer.score(&metrics(50)).score, 0.0);
        assert_relative_eq!(scorer.score(&metrics(59)).score, 0.0);
        assert_relative_eq!(scorer.score(&metrics(60)).score, -0.4);
        assert_relative_eq!(scorer.score(&metrics(79)).score, -0.4);
        assert_relative_eq!(scorer.score(&metrics(80)).score, -0.8);
        assert_relative_eq!(scorer.score(&metrics(95)).score, -0.8);
    }

    #[test]
    fn test_neutral_index_has_no_insight() {
        let result = SentimentScorer::new().score(&metrics(50));
        assert!(result.insights.is_empty());
    }

    #[test]
    fn test_overleveraged_longs_bearish() {
        let mut m = metrics(85);
        m.funding_rate = Some(0.03);
        m.long_short_ratio = Some(2.5);

        let result = SentimentScorer::new().score(&m);

        // (-0.8 - 0.5 - 0.3) / 3
        assert_relative_eq!(result.score, -1.6 / 3.0, epsilon = 1e-9);
        assert_eq!(result.insights.len(), 3);
        assert!(result.insights[1].contains("overleveraged longs"));
        assert!(result.insights[2].contains("crowded longs"));
    }

    #[test]
    fn test_overleveraged_shorts_bullish() {
        let mut m = metrics(15);
        m.funding_rate = Some(-0.02);
        m.long_short_ratio = Some(0.4);

        let result = SentimentScorer::new().score(&m);

        assert_relative_eq!(result.score, 1.6 / 3.0, epsilon = 1e-9);
        assert!(result.insights[1].contains("overleveraged shorts"));
    }

    #[test]
    fn test_funding_rate_boundary_counts_without_vote() {
        let mut m = metrics(10);
        m.funding_rate = Some(0.01);

        let result = SentimentScorer::new().score(&m);

        // 0.01 is not strictly above the threshold
        assert_relative_eq!(result.score, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_single_social_feed_counts_once() {
        let mut m = metrics(50);
        m.news_sentiment = Some(-1.0);

        let result = SentimentScorer::new().score(&m);

        assert_relative_eq!(result.score, -0.15, epsilon = 1e-9);
        assert_eq!(result.insights.len(), 1);
    }

    #[test]
    fn test_score_stays_bounded() {
        let mut m = metrics(0);
        m.funding_rate = Some(-5.0);
        m.long_short_ratio = Some(0.01);
        m.twitter_sentiment = Some(1.0);
        m.reddit_sentiment = Some(1.0);
        m.news_sentiment = Some(1.0);

        let result = SentimentScorer::new().score(&m);
        assert!(result.score <= 1.0 && result.score >= -1.0);
    }
}
