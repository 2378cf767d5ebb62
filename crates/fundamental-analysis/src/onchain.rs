use analysis_core::{Category, CategoryScore, CategoryScorer, OnChainMetrics, ScoreAccumulator};

// NVT: network value / daily transaction value. Low = cheap relative to usage.
const NVT_UNDERVALUED: f64 = 40.0;
const NVT_OVERVALUED: f64 = 80.0;
// MVRV: market cap / realized cap. Below 1 holders are underwater on average.
const MVRV_BOTTOM: f64 = 1.0;
const MVRV_TOP: f64 = 3.5;
const WHALE_CONCENTRATION_RISK: f64 = 0.6;

/// Scores network valuation and flow metrics for crypto assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct OnChainScorer;

impl OnChainScorer {
    pub fn new() -> Self {
        Self
    }
}

impl CategoryScorer<OnChainMetrics> for OnChainScorer {
    fn category(&self) -> Category {
        Category::OnChain
    }

    fn score(&self, metrics: &OnChainMetrics) -> CategoryScore {
        let mut acc = ScoreAccumulator::new();

        if let Some(nvt) = metrics.nvt_ratio {
            if nvt < NVT_UNDERVALUED {
                acc.vote(1.0)
                    .insight(format!("NVT ratio {:.1} - network undervalued", nvt));
            } else if nvt > NVT_OVERVALUED {
                acc.vote(-1.0)
                    .insight(format!("NVT ratio {:.1} - network overvalued", nvt));
            } else {
                acc.count_only();
            }
        }

        if let Some(mvrv) = metrics.mvrv_ratio {
            if mvrv < MVRV_BOTTOM {
                acc.vote(1.0)
                    .insight(format!("MVRV ratio {:.2} - historical bottom signal", mvrv));
            } else if mvrv > MVRV_TOP {
                acc.vote(-1.0)
                    .insight(format!("MVRV ratio {:.2} - historical top signal", mvrv));
            } else {
                acc.count_only();
            }
        }

        if let Some(net_flow) = metrics.net_flow {
            if net_flow < 0.0 {
                acc.vote(0.5).insight(format!(
                    "Net exchange outflow {:.0} - bullish accumulation",
                    net_flow.abs()
                ));
            } else if net_flow > 0.0 {
                acc.vote(-0.5).insight(format!(
                    "Net exchange inflow {:.0} - bearish distribution",
                    net_flow
                ));
            } else {
                acc.count_only();
            }
        }

        // Counted whenever present; only penalized above the threshold.
        if let Some(whale) = metrics.whale_concentration {
            if whale > WHALE_CONCENTRATION_RISK {
                acc.vote(-0.3).insight(format!(
                    "Whale concentration {:.0}% - manipulation risk",
                    whale * 100.0
                ));
            } else {
                acc.count_only();
            }
        }

        if let Some(active) = metrics.active_addresses {
            acc.insight(format!("Active addresses: {}", active));
        }

        let components = acc.components_scored();
        let result = acc.finish();
        tracing::debug!(
            "On-chain score for {}: {:.3} from {} components",
            metrics.symbol,
            result.score,
            components
        );
        result
    }
}
