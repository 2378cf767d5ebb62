use analysis_core::AnalysisError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Asset class the analyzer is configured for. On-chain data is only
/// meaningful for crypto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    #[default]
    Crypto,
    Equity,
    Forex,
    Commodity,
}

impl FromStr for AssetClass {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "crypto" => Ok(AssetClass::Crypto),
            "equity" | "stock" | "stocks" => Ok(AssetClass::Equity),
            "forex" | "fx" => Ok(AssetClass::Forex),
            "commodity" | "commodities" => Ok(AssetClass::Commodity),
            other => Err(AnalysisError::InvalidConfig(format!(
                "unknown asset class '{}'",
                other
            ))),
        }
    }
}

/// Raw category weights as configured. They need not sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    pub sentiment: f64,
    pub onchain: f64,
    #[serde(rename = "macro")]
    pub macro_: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            sentiment: 0.3,
            onchain: 0.4,
            macro_: 0.3,
        }
    }
}

/// Weights scaled to sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeights {
    pub sentiment: f64,
    pub onchain: f64,
    #[serde(rename = "macro")]
    pub macro_: f64,
}

impl SignalWeights {
    pub fn new(sentiment: f64, onchain: f64, macro_: f64) -> Self {
        Self {
            sentiment,
            onchain,
            macro_,
        }
    }

    /// Scale the weights by their total.
    ///
    /// Rejects negative or non-finite weights and a non-positive total.
    pub fn normalized(&self) -> Result<NormalizedWeights, AnalysisError> {
        for (name, w) in [
            ("sentiment", self.sentiment),
            ("onchain", self.onchain),
            ("macro", self.macro_),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(AnalysisError::InvalidConfig(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, w
                )));
            }
        }

        let total = self.sentiment + self.onchain + self.macro_;
        if total <= 0.0 {
            return Err(AnalysisError::InvalidConfig(
                "signal weights must have a positive total".to_string(),
            ));
        }

        Ok(NormalizedWeights {
            sentiment: self.sentiment / total,
            onchain: self.onchain / total,
            macro_: self.macro_ / total,
        })
    }
}

/// Analyzer configuration, fixed for the lifetime of an analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub asset_class: AssetClass,
    pub weights: SignalWeights,
    /// Composite magnitude a signal must exceed to be directional
    pub signal_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            asset_class: AssetClass::Crypto,
            weights: SignalWeights::default(),
            signal_threshold: 0.3,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_asset_class(mut self, asset_class: AssetClass) -> Self {
        self.asset_class = asset_class;
        self
    }

    pub fn with_weights(mut self, weights: SignalWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Load from `ANALYZER_*` environment variables. Unset variables keep
    /// their defaults; values that fail to parse are rejected.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let defaults = Self::default();
        let config = Self {
            asset_class: match env::var("ANALYZER_ASSET_CLASS") {
                Ok(v) => v.parse()?,
                Err(_) => defaults.asset_class,
            },
            weights: SignalWeights {
                sentiment: env_f64("ANALYZER_WEIGHT_SENTIMENT", defaults.weights.sentiment)?,
                onchain: env_f64("ANALYZER_WEIGHT_ONCHAIN", defaults.weights.onchain)?,
                macro_: env_f64("ANALYZER_WEIGHT_MACRO", defaults.weights.macro_)?,
            },
            signal_threshold: env_f64("ANALYZER_SIGNAL_THRESHOLD", defaults.signal_threshold)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.signal_threshold.is_finite() || self.signal_threshold < 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "signal threshold must be a non-negative number, got {}",
                self.signal_threshold
            )));
        }
        self.weights.normalized().map(|_| ())
    }
}

fn env_f64(key: &str, default: f64) -> Result<f64, AnalysisError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<f64>().map_err(|e| {
            AnalysisError::InvalidConfig(format!("{} = '{}': {}", key, raw, e))
        }),
        Err(_) => Ok(default),
    }
}
