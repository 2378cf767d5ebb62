//! Fundamental signal engine.
//!
//! Reduces on-chain, sentiment and macro snapshots to one directional signal.
//! Each category is scored independently into [-1, 1], then blended with the
//! configured weights. The analyzer holds no mutable state, so a single
//! instance can be shared across threads.

use analysis_core::{
    clamp_unit, AnalysisError, Category, CategoryScorer, EconomicEvent,
    FundamentalSignal, MarketDominance, MarketSnapshot, OnChainMetrics, SentimentMetrics,
    SignalDirection,
};
use chrono::Utc;
use sentiment_analysis::SentimentScorer;
use std::collections::BTreeMap;

pub mod config;
pub mod macroeconomic;
pub mod onchain;

pub use config::{AnalyzerConfig, AssetClass, NormalizedWeights, SignalWeights};
pub use macroeconomic::{MacroInputs, MacroScorer};
pub use onchain::OnChainScorer;

pub struct FundamentalAnalyzer {
    asset_class: AssetClass,
    weights: NormalizedWeights,
    signal_threshold: f64,
    onchain_scorer: OnChainScorer,
    sentiment_scorer: SentimentScorer,
    macro_scorer: MacroScorer,
}

impl FundamentalAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let weights = config.weights.normalized()?;

        tracing::info!(
            "Fundamental analyzer ready ({:?}): sentiment {:.2}, onchain {:.2}, macro {:.2}",
            config.asset_class,
            weights.sentiment,
            weights.onchain,
            weights.macro_
        );

        Ok(Self::with_normalized(&config, weights))
    }

    fn with_normalized(config: &AnalyzerConfig, weights: NormalizedWeights) -> Self {
        Self {
            asset_class: config.asset_class,
            weights,
            signal_threshold: config.signal_threshold,
            onchain_scorer: OnChainScorer::new(),
            sentiment_scorer: SentimentScorer::new(),
            macro_scorer: MacroScorer::new(),
        }
    }

    pub fn weights(&self) -> NormalizedWeights {
        self.weights
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset_class
    }

    /// Score every supplied category and combine them into one signal.
    ///
    /// On-chain data is only evaluated for crypto. Macro is always evaluated
    /// and always appears in `components`, even with no inputs.
    pub fn generate_signal(
        &self,
        onchain: Option<&OnChainMetrics>,
        sentiment: Option<&SentimentMetrics>,
        dominance: Option<&MarketDominance>,
        events: Option<&[EconomicEvent]>,
    ) -> FundamentalSignal {
        let mut components = BTreeMap::new();
        let mut reasoning = Vec::new();
        let mut composite = 0.0;

        match onchain {
            Some(metrics) if self.asset_class == AssetClass::Crypto => {
                composite += self.evaluate(
                    &self.onchain_scorer,
                    metrics,
                    &mut components,
                    &mut reasoning,
                );
            }
            Some(metrics) => {
                tracing::debug!(
                    "Ignoring on-chain data for {} ({:?} analyzer)",
                    metrics.symbol,
                    self.asset_class
                );
            }
            None => {}
        }

        if let Some(metrics) = sentiment {
            composite += self.evaluate(
                &self.sentiment_scorer,
                metrics,
                &mut components,
                &mut reasoning,
            );
        }

        composite += self.evaluate(
            &self.macro_scorer,
            &MacroInputs::new(dominance, events),
            &mut components,
            &mut reasoning,
        );

        let composite = clamp_unit(composite);
        let signal = SignalDirection::from_composite(composite, self.signal_threshold);
        let strength = composite.abs();

        tracing::info!(
            "Fundamental signal: {} (strength {:.3}, {} categories, {} reasons)",
            signal,
            strength,
            components.len(),
            reasoning.len()
        );

        FundamentalSignal {
            timestamp: Utc::now(),
            signal,
            strength,
            components,
            reasoning,
        }
    }

    /// `generate_signal` over a bundled snapshot
    pub fn analyze_snapshot(&self, snapshot: &MarketSnapshot) -> FundamentalSignal {
        self.generate_signal(
            snapshot.onchain.as_ref(),
            snapshot.sentiment.as_ref(),
            snapshot.dominance.as_ref(),
            snapshot.events.as_deref(),
        )
    }

    fn weight_for(&self, category: Category) -> f64 {
        match category {
            Category::OnChain => self.weights.onchain,
            Category::Sentiment => self.weights.sentiment,
            Category::Macro => self.weights.macro_,
        }
    }

    /// Run one scorer, record its component and tagged reasoning, and return
    /// its weighted contribution to the composite.
    fn evaluate<I, S>(
        &self,
        scorer: &S,
        input: &I,
        components: &mut BTreeMap<String, f64>,
        reasoning: &mut Vec<String>,
    ) -> f64
    where
        I: ?Sized,
        S: CategoryScorer<I>,
    {
        let category = scorer.category();
        let result = scorer.score(input);
        tracing::debug!("{} score {:.3}", category.key(), result.score);

        reasoning.extend(result.tagged_insights(category));
        components.insert(category.key().to_string(), result.score);
        result.score * self.weight_for(category)
    }
}

impl Default for FundamentalAnalyzer {
    fn default() -> Self {
        // Default weights already sum to 1.0
        let weights = NormalizedWeights {
            sentiment: 0.3,
            onchain: 0.4,
            macro_: 0.3,
        };
        Self::with_normalized(&AnalyzerConfig::default(), weights)
    }
}
