use analysis_core::{
    Category, CategoryScore, CategoryScorer, EconomicEvent, MarketDominance, ScoreAccumulator,
};

const BTC_DOMINANCE_HIGH: f64 = 60.0;
const BTC_DOMINANCE_LOW: f64 = 40.0;
const STABLECOIN_DOMINANCE_RISK_OFF: f64 = 15.0;
/// Relative miss/beat vs forecast worth calling out
const SURPRISE_THRESHOLD: f64 = 0.10;
const MAX_EVENTS_INSPECTED: usize = 3;

/// Macro inputs. Both halves are independently optional; an empty event
/// list behaves the same as no list at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroInputs<'a> {
    pub dominance: Option<&'a MarketDominance>,
    pub events: &'a [EconomicEvent],
}

impl<'a> MacroInputs<'a> {
    pub fn new(
        dominance: Option<&'a MarketDominance>,
        events: Option<&'a [EconomicEvent]>,
    ) -> Self {
        Self {
            dominance,
            events: events.unwrap_or(&[]),
        }
    }
}

/// Scores market structure and the economic calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacroScorer;

impl MacroScorer {
    pub fn new() -> Self {
        Self
    }

    fn score_dominance(&self, dominance: &MarketDominance, acc: &mut ScoreAccumulator) {
        if dominance.btc_dominance > BTC_DOMINANCE_HIGH {
            acc.add(-0.2).insight(format!(
                "BTC dominance {:.1}% - altcoin weakness",
                dominance.btc_dominance
            ));
        } else if dominance.btc_dominance < BTC_DOMINANCE_LOW {
            acc.add(0.2).insight(format!(
                "BTC dominance {:.1}% - alt season conditions",
                dominance.btc_dominance
            ));
        }

        if dominance.stablecoin_dominance > STABLECOIN_DOMINANCE_RISK_OFF {
            acc.add(-0.3).insight(format!(
                "Stablecoin dominance {:.1}% - risk-off positioning",
                dominance.stablecoin_dominance
            ));
        }

        // One component for the whole dominance block
        acc.count_only();
    }

    fn scan_events(&self, events: &[EconomicEvent], acc: &mut ScoreAccumulator) {
        let high_impact: Vec<&EconomicEvent> = events
            .iter()
            .filter(|e| e.impact.is_high_impact())
            .collect();

        if high_impact.is_empty() {
            return;
        }

        acc.count_only().insight(format!(
            "{} high-impact economic event(s) on the calendar",
            high_impact.len()
        ));

        for event in high_impact.iter().take(MAX_EVENTS_INSPECTED) {
            if let Some(surprise) = event.surprise() {
                if surprise.abs() > SURPRISE_THRESHOLD {
                    acc.insight(format!(
                        "{} ({}) surprised {:+.1}% vs forecast",
                        event.name,
                        event.country,
                        surprise * 100.0
                    ));
                }
            }
        }
    }
}

impl<'a> CategoryScorer<MacroInputs<'a>> for MacroScorer {
    fn category(&self) -> Category {
        Category::Macro
    }

    fn score(&self, inputs: &MacroInputs<'a>) -> CategoryScore {
        let mut acc = ScoreAccumulator::new();

        if let Some(dominance) = inputs.dominance {
            self.score_dominance(dominance, &mut acc);
        }

        self.scan_events(inputs.events, &mut acc);

        let components = acc.components_scored();
        let result = acc.finish();
        tracing::debug!(
            "Macro score {:.3} from {} components ({} events)",
            result.score,
            components,
            inputs.events.len()
        );
        result
    }
}
