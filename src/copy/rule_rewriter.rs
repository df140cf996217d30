//! Rule Tree Rewriter
//!
//! Rewrites a rule engine body for the target zone:
//!
//! - host conditions, at the top level and inside sub-rules, get their
//!   values renamed to the target zone
//! - origin actions inside sub-rules get their origin group id translated
//!
//! Top-level actions are copied as they are; the rule engine never puts zone
//! local ids there. The rewrite works on a copy, so a failure leaves nothing
//! half-translated.

use crate::error::{Result, ZoneCopyError};
use crate::types::{Action, Rule, RuleAndConditions};

use super::origin_index::OriginIndex;
use super::rename::ZoneRenamer;

/// Rewrites rule bodies from the template zone to the target zone
pub struct RuleRewriter<'a> {
    renamer: &'a ZoneRenamer,
    origins: &'a OriginIndex,
}

impl<'a> RuleRewriter<'a> {
    pub fn new(renamer: &'a ZoneRenamer, origins: &'a OriginIndex) -> Self {
        Self { renamer, origins }
    }

    /// Rewrite the bodies of one rule.
    ///
    /// The rule engine stores a single top-level body per rule; any other
    /// count is rejected before anything is touched.
    pub fn rewrite(&self, rules: &[Rule]) -> Result<Vec<Rule>> {
        let body = single_body(rules)?;
        let mut rewritten = body.clone();

        self.rewrite_conditions(&mut rewritten.conditions);

        for group in &mut rewritten.sub_rules {
            for sub_rule in &mut group.rules {
                self.rewrite_conditions(&mut sub_rule.conditions);
                self.rewrite_actions(&mut sub_rule.actions)?;
            }
        }

        Ok(vec![rewritten])
    }

    fn rewrite_conditions(&self, groups: &mut [RuleAndConditions]) {
        for condition in groups.iter_mut().flat_map(|g| g.conditions.iter_mut()) {
            if !condition.is_host() {
                continue;
            }
            for value in &mut condition.values {
                *value = self.renamer.rename(value);
            }
        }
    }

    fn rewrite_actions(&self, actions: &mut [Action]) -> Result<()> {
        for origin in actions.iter_mut().filter_map(Action::origin_action_mut) {
            for param in origin.parameters.iter_mut().filter(|p| p.is_origin_group_id()) {
                let old_id = param.values.first_mut().ok_or_else(|| {
                    ZoneCopyError::MalformedInput(
                        "origin action has an empty OriginGroupId parameter".to_string(),
                    )
                })?;
                *old_id = self.origins.resolve(old_id)?.to_string();
            }
        }
        Ok(())
    }
}

/// Whether rewriting these bodies needs the origin group index
pub fn needs_origin_index(rules: &[Rule]) -> bool {
    rules
        .iter()
        .flat_map(|rule| rule.sub_rules.iter())
        .flat_map(|group| group.rules.iter())
        .flat_map(|sub_rule| sub_rule.actions.iter())
        .filter_map(Action::origin_action)
        .any(|origin| origin.parameters.iter().any(|p| p.is_origin_group_id()))
}

/// The only top-level body of a rule; any other count is malformed
pub fn single_body(rules: &[Rule]) -> Result<&Rule> {
    match rules {
        [body] => Ok(body),
        _ => Err(ZoneCopyError::MalformedInput(format!(
            "rule must have exactly one top-level body, found {}",
            rules.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ActionParameter, NormalAction, OriginGroup, RuleCondition, SubRule, SubRuleItem,
    };

    fn renamer() -> ZoneRenamer {
        ZoneRenamer::new("old.example.com", "new.example.com")
    }

    fn index() -> OriginIndex {
        let group = |id: &str, name: &str| OriginGroup {
            origin_group_id: id.to_string(),
            origin_group_name: name.to_string(),
            origin_type: None,
            configuration_type: None,
            origin_records: Vec::new(),
            host_header: None,
        };
        OriginIndex::build(&[group("g1", "pool-1")], &[group("g9", "pool-1")])
    }

    fn condition(target: &str, value: &str) -> RuleAndConditions {
        RuleAndConditions {
            conditions: vec![RuleCondition {
                operator: "equal".to_string(),
                target: target.to_string(),
                values: vec![value.to_string()],
                ..Default::default()
            }],
        }
    }

    fn origin_action(group_id: &str) -> Action {
        Action {
            normal_action: Some(NormalAction {
                action: "Origin".to_string(),
                parameters: vec![
                    ActionParameter {
                        name: "OriginType".to_string(),
                        values: vec!["ORIGIN_GROUP".to_string()],
                    },
                    ActionParameter {
                        name: "OriginGroupId".to_string(),
                        values: vec![group_id.to_string()],
                    },
                ],
            }),
            ..Default::default()
        }
    }

    fn nested(conditions: Vec<RuleAndConditions>, actions: Vec<Action>) -> Rule {
        Rule {
            conditions: vec![condition("host", "shop.old.example.com")],
            actions: Vec::new(),
            sub_rules: vec![SubRuleItem {
                rules: vec![SubRule {
                    conditions,
                    actions,
                }],
                tags: vec!["nested".to_string()],
            }],
        }
    }

    #[test]
    fn test_host_conditions_are_renamed() {
        let renamer = renamer();
        let index = index();
        let rewriter = RuleRewriter::new(&renamer, &index);

        let body = Rule {
            conditions: vec![
                condition("host", "old.example.com"),
                condition("path", "old.example.com"),
            ],
            ..Default::default()
        };

        let out = rewriter.rewrite(&[body]).unwrap();
        assert_eq!(out[0].conditions[0].conditions[0].values, vec!["new.example.com"]);
        assert_eq!(out[0].conditions[1].conditions[0].values, vec!["old.example.com"]);
    }

    #[test]
    fn test_nested_origin_action_is_translated() {
        let renamer = renamer();
        let index = index();
        let rewriter = RuleRewriter::new(&renamer, &index);

        let body = nested(
            vec![condition("host", "img.old.example.com")],
            vec![origin_action("g1")],
        );
        let out = rewriter.rewrite(std::slice::from_ref(&body)).unwrap();

        let sub_rule = &out[0].sub_rules[0].rules[0];
        assert_eq!(sub_rule.conditions[0].conditions[0].values, vec!["img.new.example.com"]);

        let params = &sub_rule.actions[0].normal_action.as_ref().unwrap().parameters;
        assert_eq!(params[0].values, vec!["ORIGIN_GROUP"]);
        assert_eq!(params[1].values, vec!["g9"]);
        assert_eq!(out[0].sub_rules[0].tags, vec!["nested"]);
        assert_eq!(
            out[0].conditions[0].conditions[0].values,
            vec!["shop.new.example.com"]
        );
    }

    #[test]
    fn test_unresolvable_origin_leaves_input_untouched() {
        let renamer = renamer();
        let index = index();
        let rewriter = RuleRewriter::new(&renamer, &index);

        let body = nested(
            vec![condition("host", "img.old.example.com")],
            vec![origin_action("g404")],
        );
        let before = body.clone();

        let err = rewriter.rewrite(std::slice::from_ref(&body)).unwrap_err();
        assert!(matches!(err, ZoneCopyError::ReferenceNotFound { .. }));
        assert_eq!(body, before);
    }

    #[test]
    fn test_body_count_must_be_one() {
        let renamer = renamer();
        let index = index();
        let rewriter = RuleRewriter::new(&renamer, &index);

        let err = rewriter.rewrite(&[]).unwrap_err();
        assert!(matches!(err, ZoneCopyError::MalformedInput(_)));

        let err = rewriter
            .rewrite(&[Rule::default(), Rule::default()])
            .unwrap_err();
        assert!(matches!(err, ZoneCopyError::MalformedInput(_)));
    }

    #[test]
    fn test_top_level_actions_are_copied_unchanged() {
        let renamer = renamer();
        let index = index();
        let rewriter = RuleRewriter::new(&renamer, &index);

        // g1 resolves and g-missing does not; neither is touched at the top level
        let body = Rule {
            conditions: vec![condition("host", "shop.old.example.com")],
            actions: vec![origin_action("g1"), origin_action("g-missing")],
            sub_rules: Vec::new(),
        };

        let out = rewriter.rewrite(std::slice::from_ref(&body)).unwrap();
        assert_eq!(out[0].actions, body.actions);
        assert_eq!(
            out[0].conditions[0].conditions[0].values,
            vec!["shop.new.example.com"]
        );
    }

    #[test]
    fn test_single_body() {
        let body = Rule::default();
        assert!(single_body(std::slice::from_ref(&body)).is_ok());
        assert!(matches!(
            single_body(&[body.clone(), body]),
            Err(ZoneCopyError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_needs_origin_index_only_for_nested_origin_actions() {
        let top_level_only = Rule {
            actions: vec![origin_action("g1")],
            ..Default::default()
        };
        assert!(!needs_origin_index(&[top_level_only]));

        let with_nested = nested(Vec::new(), vec![origin_action("g1")]);
        assert!(needs_origin_index(&[with_nested]));

        let without = nested(vec![condition("host", "a.old.example.com")], Vec::new());
        assert!(!needs_origin_index(&[without]));
    }
}
