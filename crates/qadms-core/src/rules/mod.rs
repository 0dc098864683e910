//! The fixed rule battery.
//!
//! Each evaluator is a pure function over [`CanonicalTokenModel`]; the
//! unit structs wrap them behind the [`Rule`] trait for callers that want to
//! select rules by id.

pub mod contrast;
pub mod naming;
pub mod scale;
pub mod semantic_coverage;

use crate::error::CoreError;
use crate::rule::{Rule, RuleEvaluation};
use crate::token::CanonicalTokenModel;

pub use contrast::evaluate_contrast;
pub use naming::evaluate_naming;
pub use scale::evaluate_scale;
pub use semantic_coverage::evaluate_semantic_coverage;

macro_rules! rule_impl {
    ($name:ident, $id:expr, $eval:path) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Rule for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn evaluate(&self, model: &CanonicalTokenModel) -> RuleEvaluation {
                $eval(model)
            }
        }
    };
}

rule_impl!(NamingRule, naming::RULE_ID, evaluate_naming);
rule_impl!(ScaleRule, scale::RULE_ID, evaluate_scale);
rule_impl!(
    SemanticCoverageRule,
    semantic_coverage::RULE_ID,
    evaluate_semantic_coverage
);
rule_impl!(ContrastRule, contrast::RULE_ID, evaluate_contrast);

/// All rules in audit order: naming, scale, semantic coverage, contrast.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NamingRule),
        Box::new(ScaleRule),
        Box::new(SemanticCoverageRule),
        Box::new(ContrastRule),
    ]
}

/// Look up one rule by its id (case-sensitive).
pub fn rule_by_id(id: &str) -> Result<Box<dyn Rule>, CoreError> {
    all_rules()
        .into_iter()
        .find(|rule| rule.id() == id)
        .ok_or_else(|| CoreError::UnknownRule(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = all_rules().iter().map(|rule| rule.id()).collect();
        assert_eq!(
            ids,
            vec![
                "TOKENS_NAMING",
                "TOKENS_SCALE",
                "TOKENS_SEMANTIC_COVERAGE",
                "A11Y_CONTRAST"
            ]
        );
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(rule_by_id("A11Y_CONTRAST").map(|r| r.id()), Ok("A11Y_CONTRAST"));
        assert_eq!(
            rule_by_id("tokens_naming").map(|r| r.id()),
            Err(CoreError::UnknownRule("tokens_naming".to_string()))
        );
    }

    #[test]
    fn empty_model_passes_every_rule() {
        let model = CanonicalTokenModel::empty("test");
        for rule in all_rules() {
            let evaluation = rule.evaluate(&model);
            assert!(evaluation.passed(), "{} should pass", rule.id());
            assert_eq!(evaluation.rule_id, rule.id());
        }
    }
}
