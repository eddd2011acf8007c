//! Wide/tall orientation classification.
//!
//! Rules are evaluated in order; the first that returns a decision wins. A
//! table no rule claims is tall.

use tabnorm_model::{
    AnalysisConfig, Orientation, OrientationDecision, OrientationReason, TableShape,
};

/// What an orientation rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct OrientationInput<'a> {
    pub file_name: &'a str,
    pub shape: TableShape,
    pub config: &'a AnalysisConfig,
}

/// A single orientation heuristic.
pub trait OrientationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn decide(&self, input: &OrientationInput<'_>) -> Option<OrientationDecision>;
}

/// Files listed in `wide_overrides` are wide whatever their shape.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitOverrideRule;

impl OrientationRule for ExplicitOverrideRule {
    fn name(&self) -> &'static str {
        "explicit_override"
    }

    fn decide(&self, input: &OrientationInput<'_>) -> Option<OrientationDecision> {
        input
            .config
            .is_wide_override(input.file_name)
            .then_some(OrientationDecision {
                orientation: Orientation::Wide,
                reason: OrientationReason::ExplicitOverride,
            })
    }
}

/// More columns than (non-zero) rows means wide.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShapeRule;

impl OrientationRule for ShapeRule {
    fn name(&self) -> &'static str {
        "shape"
    }

    fn decide(&self, input: &OrientationInput<'_>) -> Option<OrientationDecision> {
        let TableShape { rows, columns } = input.shape;
        (columns > rows && rows > 0).then_some(OrientationDecision {
            orientation: Orientation::Wide,
            reason: OrientationReason::ColumnsExceedRows { rows, columns },
        })
    }
}

/// Ordered chain of orientation rules.
pub struct OrientationClassifier {
    rules: Vec<Box<dyn OrientationRule>>,
}

impl OrientationClassifier {
    pub fn with_rules(rules: Vec<Box<dyn OrientationRule>>) -> Self {
        Self { rules }
    }

    /// Explicit override, then shape.
    pub fn standard() -> Self {
        Self::with_rules(vec![Box::new(ExplicitOverrideRule), Box::new(ShapeRule)])
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn classify(&self, input: &OrientationInput<'_>) -> OrientationDecision {
        for rule in &self.rules {
            if let Some(decision) = rule.decide(input) {
                tracing::debug!(rule = rule.name(), %decision, "orientation decided");
                return decision;
            }
        }
        let TableShape { rows, columns } = input.shape;
        OrientationDecision {
            orientation: Orientation::Tall,
            reason: OrientationReason::Default { rows, columns },
        }
    }
}

impl Default for OrientationClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for OrientationClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrientationClassifier")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Runs the standard rule chain.
pub fn classify_orientation(
    file_name: &str,
    shape: TableShape,
    config: &AnalysisConfig,
) -> OrientationDecision {
    OrientationClassifier::standard().classify(&OrientationInput {
        file_name,
        shape,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default().with_wide_overrides(["gdp.csv"])
    }

    #[test]
    fn test_override_wins_over_shape() {
        let decision = classify_orientation("gdp.csv", TableShape::new(100, 3), &config());
        assert!(decision.is_wide());
        assert_eq!(decision.reason, OrientationReason::ExplicitOverride);
    }

    #[test]
    fn test_override_applies_to_empty_table() {
        let decision = classify_orientation("gdp.csv", TableShape::new(0, 0), &config());
        assert!(decision.is_wide());
    }

    #[test]
    fn test_columns_exceed_rows() {
        let decision = classify_orientation("trade.csv", TableShape::new(3, 12), &config());
        assert_eq!(
            decision.reason,
            OrientationReason::ColumnsExceedRows {
                rows: 3,
                columns: 12
            }
        );
    }

    #[test]
    fn test_rows_equal_columns_is_tall() {
        let decision = classify_orientation("trade.csv", TableShape::new(4, 4), &config());
        assert_eq!(decision.orientation, Orientation::Tall);
        assert_eq!(
            decision.reason,
            OrientationReason::Default {
                rows: 4,
                columns: 4
            }
        );
    }

    #[test]
    fn test_zero_rows_is_tall() {
        let decision = classify_orientation("trade.csv", TableShape::new(0, 5), &config());
        assert_eq!(decision.orientation, Orientation::Tall);
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            OrientationClassifier::standard().rule_names(),
            vec!["explicit_override", "shape"]
        );
    }
}
