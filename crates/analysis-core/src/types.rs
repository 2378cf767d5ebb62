use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Network and valuation snapshot for a crypto asset.
///
/// Every metric is optional: `None` means the supplier did not know the value,
/// which is not the same thing as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainMetrics {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    #[serde(default)]
    pub active_addresses: Option<u64>,
    #[serde(default)]
    pub transaction_count: Option<u64>,
    #[serde(default)]
    pub hash_rate: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    #[serde(default)]
    pub inflation_rate: Option<f64>,
    /// Share of supply held by the largest wallets (0.0 to 1.0)
    #[serde(default)]
    pub whale_concentration: Option<f64>,
    #[serde(default)]
    pub exchange_reserves: Option<f64>,
    #[serde(default)]
    pub nvt_ratio: Option<f64>,
    #[serde(default)]
    pub mvrv_ratio: Option<f64>,
    #[serde(default)]
    pub exchange_inflow: Option<f64>,
    #[serde(default)]
    pub exchange_outflow: Option<f64>,
    /// Inflow minus outflow; negative means coins are leaving exchanges
    #[serde(default)]
    pub net_flow: Option<f64>,
}

impl OnChainMetrics {
    /// Empty snapshot stamped with the current time.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            symbol: symbol.into(),
            active_addresses: None,
            transaction_count: None,
            hash_rate: None,
            circulating_supply: None,
            total_supply: None,
            inflation_rate: None,
            whale_concentration: None,
            exchange_reserves: None,
            nvt_ratio: None,
            mvrv_ratio: None,
            exchange_inflow: None,
            exchange_outflow: None,
            net_flow: None,
        }
    }
}

/// Impact level of a scheduled economic release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    pub fn is_high_impact(&self) -> bool {
        matches!(self, ImpactLevel::High | ImpactLevel::Critical)
    }
}

/// Economic calendar entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomicEvent {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub country: String,
    pub impact: ImpactLevel,
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub forecast: Option<f64>,
    #[serde(default)]
    pub previous: Option<f64>,
    pub currency: String,
}

impl EconomicEvent {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        impact: ImpactLevel,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            name: name.into(),
            country: country.into(),
            impact,
            actual: None,
            forecast: None,
            previous: None,
            currency: currency.into(),
        }
    }

    /// Relative surprise `(actual - forecast) / |forecast|`.
    ///
    /// `None` when either value is missing or the forecast is zero.
    pub fn surprise(&self) -> Option<f64> {
        match (self.actual, self.forecast) {
            (Some(actual), Some(forecast)) if forecast != 0.0 => {
                Some((actual - forecast) / forecast.abs())
            }
            _ => None,
        }
    }
}

/// Bucketed reading of the Fear & Greed index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FearGreedClassification {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl FearGreedClassification {
    pub fn from_index(index: u8) -> Self {
        match index {
            i if i <= 20 => FearGreedClassification::ExtremeFear,
            i if i <= 40 => FearGreedClassification::Fear,
            i if i >= 80 => FearGreedClassification::ExtremeGreed,
            i if i >= 60 => FearGreedClassification::Greed,
            _ => FearGreedClassification::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FearGreedClassification::ExtremeFear => "Extreme Fear",
            FearGreedClassification::Fear => "Fear",
            FearGreedClassification::Neutral => "Neutral",
            FearGreedClassification::Greed => "Greed",
            FearGreedClassification::ExtremeGreed => "Extreme Greed",
        }
    }
}

/// Market mood snapshot. Only the fear/greed reading is mandatory.
///
/// The classification is always derived from the (capped) index, including
/// when a snapshot is deserialized; a supplied classification is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawSentimentMetrics")]
pub struct SentimentMetrics {
    pub timestamp: DateTime<Utc>,
    pub fear_greed_index: u8,
    pub fear_greed_classification: FearGreedClassification,
    /// -1.0 to 1.0
    pub twitter_sentiment: Option<f64>,
    /// -1.0 to 1.0
    pub reddit_sentiment: Option<f64>,
    /// -1.0 to 1.0
    pub news_sentiment: Option<f64>,
    pub google_trends: Option<f64>,
    pub funding_rate: Option<f64>,
    pub open_interest: Option<f64>,
    pub long_short_ratio: Option<f64>,
}

/// Wire form of `SentimentMetrics` as suppliers send it
#[derive(Deserialize)]
struct RawSentimentMetrics {
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
    fear_greed_index: u32,
    #[serde(default)]
    #[allow(dead_code)]
    fear_greed_classification: Option<FearGreedClassification>,
    #[serde(default)]
    twitter_sentiment: Option<f64>,
    #[serde(default)]
    reddit_sentiment: Option<f64>,
    #[serde(default)]
    news_sentiment: Option<f64>,
    #[serde(default)]
    google_trends: Option<f64>,
    #[serde(default)]
    funding_rate: Option<f64>,
    #[serde(default)]
    open_interest: Option<f64>,
    #[serde(default)]
    long_short_ratio: Option<f64>,
}

impl From<RawSentimentMetrics> for SentimentMetrics {
    fn from(raw: RawSentimentMetrics) -> Self {
        let index = raw.fear_greed_index.min(100) as u8;
        Self {
            twitter_sentiment: raw.twitter_sentiment,
            reddit_sentiment: raw.reddit_sentiment,
            news_sentiment: raw.news_sentiment,
            google_trends: raw.google_trends,
            funding_rate: raw.funding_rate,
            open_interest: raw.open_interest,
            long_short_ratio: raw.long_short_ratio,
            ..SentimentMetrics::new(raw.timestamp, index)
        }
    }
}

impl SentimentMetrics {
    /// Snapshot with the classification derived from the index (capped at 100).
    pub fn new(timestamp: DateTime<Utc>, fear_greed_index: u8) -> Self {
        let fear_greed_index = fear_greed_index.min(100);
        Self {
            timestamp,
            fear_greed_index,
            fear_greed_classification: FearGreedClassification::from_index(fear_greed_index),
            twitter_sentiment: None,
            reddit_sentiment: None,
            news_sentiment: None,
            google_trends: None,
            funding_rate: None,
            open_interest: None,
            long_short_ratio: None,
        }
    }

    /// Mean of whichever social feeds are present
    pub fn social_average(&self) -> Option<f64> {
        let values: Vec<f64> = [self.twitter_sentiment, self.reddit_sentiment, self.news_sentiment]
            .into_iter()
            .flatten()
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Aggregate market structure (all dominance figures are percentages)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDominance {
    pub timestamp: DateTime<Utc>,
    pub btc_dominance: f64,
    pub eth_dominance: f64,
    pub stablecoin_dominance: f64,
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    #[serde(default)]
    pub btc_correlation: Option<f64>,
    #[serde(default)]
    pub sp500_correlation: Option<f64>,
    #[serde(default)]
    pub gold_correlation: Option<f64>,
}

impl MarketDominance {
    pub fn new(
        btc_dominance: f64,
        eth_dominance: f64,
        stablecoin_dominance: f64,
        total_market_cap: f64,
        total_volume_24h: f64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            btc_dominance,
            eth_dominance,
            stablecoin_dominance,
            total_market_cap,
            total_volume_24h,
            btc_correlation: None,
            sp500_correlation: None,
            gold_correlation: None,
        }
    }
}

/// Input category feeding the composite signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "onchain")]
    OnChain,
    #[serde(rename = "sentiment")]
    Sentiment,
    #[serde(rename = "macro")]
    Macro,
}

impl Category {
    /// Key used in `FundamentalSignal::components`
    pub fn key(&self) -> &'static str {
        match self {
            Category::OnChain => "onchain",
            Category::Sentiment => "sentiment",
            Category::Macro => "macro",
        }
    }

    /// Prefix for reasoning lines
    pub fn tag(&self) -> &'static str {
        match self {
            Category::OnChain => "[OnChain] ",
            Category::Sentiment => "[Sentiment] ",
            Category::Macro => "[Macro] ",
        }
    }
}

/// Output of a single category scorer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// -1.0 to 1.0
    pub score: f64,
    pub insights: Vec<String>,
}

impl CategoryScore {
    /// Insights prefixed with the category tag
    pub fn tagged_insights(&self, category: Category) -> impl Iterator<Item = String> + '_ {
        self.insights
            .iter()
            .map(move |line| format!("{}{}", category.tag(), line))
    }
}

/// Direction of the composite signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalDirection {
    /// Strict inequalities: a composite exactly on the threshold is neutral.
    pub fn from_composite(composite: f64, threshold: f64) -> Self {
        if composite > threshold {
            SignalDirection::Bullish
        } else if composite < -threshold {
            SignalDirection::Bearish
        } else {
            SignalDirection::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Bullish => "bullish",
            SignalDirection::Bearish => "bearish",
            SignalDirection::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combined signal produced by the fundamental analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalSignal {
    pub timestamp: DateTime<Utc>,
    pub signal: SignalDirection,
    /// 0.0 to 1.0
    pub strength: f64,
    /// Per-category scores keyed by `Category::key()`; categories that were
    /// not evaluated are left out.
    pub components: BTreeMap<String, f64>,
    pub reasoning: Vec<String>,
}

impl FundamentalSignal {
    pub fn component(&self, category: Category) -> Option<f64> {
        self.components.get(category.key()).copied()
    }

    pub fn is_actionable(&self) -> bool {
        self.signal != SignalDirection::Neutral
    }
}

/// Everything the analyzer can consume in one call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub onchain: Option<OnChainMetrics>,
    #[serde(default)]
    pub sentiment: Option<SentimentMetrics>,
    #[serde(default)]
    pub dominance: Option<MarketDominance>,
    #[serde(default)]
    pub events: Option<Vec<EconomicEvent>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fear_greed_buckets() {
        assert_eq!(FearGreedClassification::from_index(0), FearGreedClassification::ExtremeFear);
        assert_eq!(FearGreedClassification::from_index(20), FearGreedClassification::ExtremeFear);
        assert_eq!(FearGreedClassification::from_index(21), FearGreedClassification::Fear);
        assert_eq!(FearGreedClassification::from_index(40), FearGreedClassification::Fear);
        assert_eq!(FearGreedClassification::from_index(50), FearGreedClassification::Neutral);
        assert_eq!(FearGreedClassification::from_index(60), FearGreedClassification::Greed);
        assert_eq!(FearGreedClassification::from_index(80), FearGreedClassification::ExtremeGreed);
        assert_eq!(FearGreedClassification::from_index(100), FearGreedClassification::ExtremeGreed);
    }

    #[test]
    fn test_sentiment_metrics_caps_index() {
        let metrics = SentimentMetrics::new(Utc::now(), 250);
        assert_eq!(metrics.fear_greed_index, 100);
        assert_eq!(metrics.fear_greed_classification, FearGreedClassification::ExtremeGreed);
    }

    #[test]
    fn test_deserialize_derives_missing_classification() {
        let metrics: SentimentMetrics =
            serde_json::from_str(r#"{"fear_greed_index": 10}"#).unwrap();
        assert_eq!(metrics.fear_greed_index, 10);
        assert_eq!(metrics.fear_greed_classification, FearGreedClassification::ExtremeFear);
        assert!(metrics.funding_rate.is_none());
    }

    #[test]
    fn test_deserialize_overrides_contradictory_classification() {
        let json = r#"{
            "timestamp": "2024-01-01T00:00:00Z",
            "fear_greed_index": 10,
            "fear_greed_classification": "extreme_greed"
        }"#;
        let metrics: SentimentMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.fear_greed_classification, FearGreedClassification::ExtremeFear);
        assert_eq!(metrics.fear_greed_classification.label(), "Extreme Fear");
    }

    #[test]
    fn test_deserialize_caps_index() {
        let metrics: SentimentMetrics =
            serde_json::from_str(r#"{"fear_greed_index": 200, "funding_rate": 0.02}"#).unwrap();
        assert_eq!(metrics.fear_greed_index, 100);
        assert_eq!(metrics.fear_greed_classification, FearGreedClassification::ExtremeGreed);
        assert_eq!(metrics.funding_rate, Some(0.02));
    }

    #[test]
    fn test_social_average_uses_present_feeds_only() {
        let mut metrics = SentimentMetrics::new(Utc::now(), 50);
        assert!(metrics.social_average().is_none());

        metrics.twitter_sentiment = Some(0.4);
        metrics.news_sentiment = Some(-0.2);
        let avg = metrics.social_average().unwrap();
        assert!((avg - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_surprise_skips_zero_forecast() {
        let mut event = EconomicEvent::new("CPI", "US", ImpactLevel::High, "USD");
        event.actual = Some(3.2);
        event.forecast = Some(0.0);
        assert!(event.surprise().is_none());

        event.forecast = Some(-2.0);
        event.actual = Some(-1.0);
        assert!((event.surprise().unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_direction_boundaries_are_strict() {
        assert_eq!(SignalDirection::from_composite(0.3, 0.3), SignalDirection::Neutral);
        assert_eq!(SignalDirection::from_composite(-0.3, 0.3), SignalDirection::Neutral);
        assert_eq!(SignalDirection::from_composite(0.3001, 0.3), SignalDirection::Bullish);
        assert_eq!(SignalDirection::from_composite(-0.3001, 0.3), SignalDirection::Bearish);
    }

    #[test]
    fn test_enum_labels_serialize() {
        assert_eq!(serde_json::to_string(&ImpactLevel::Critical).unwrap(), "\"CRITICAL\"");
        let parsed: ImpactLevel = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, ImpactLevel::High);
        assert_eq!(serde_json::to_string(&SignalDirection::Bearish).unwrap(), "\"bearish\"");
        assert_eq!(serde_json::to_string(&Category::OnChain).unwrap(), "\"onchain\"");
    }

    #[test]
    fn test_snapshot_partial_json() {
        let json = r#"{
            "sentiment": {
                "timestamp": "2024-01-01T00:00:00Z",
                "fear_greed_index": 25,
                "fear_greed_classification": "fear",
                "funding_rate": 0.005
            }
        }"#;
        let snapshot: MarketSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.onchain.is_none());
        assert!(snapshot.events.is_none());
        let sentiment = snapshot.sentiment.unwrap();
        assert_eq!(sentiment.funding_rate, Some(0.005));
        assert!(sentiment.long_short_ratio.is_none());
    }
}
