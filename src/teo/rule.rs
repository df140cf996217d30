//! Rule engine actions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::repository::RuleRepository;
use crate::types::{NewRule, RuleItem};

use super::client::TeoClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ZoneRequest<'a> {
    zone_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeRulesResponse {
    #[serde(default)]
    rule_items: Option<Vec<RuleItem>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateRuleRequest<'a> {
    zone_id: &'a str,
    #[serde(flatten)]
    rule: &'a NewRule,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateRuleResponse {
    #[serde(default)]
    rule_id: Option<String>,
}

#[async_trait]
impl RuleRepository for TeoClient {
    /// `DescribeRules` is not paginated and returns rules in display order
    async fn list_rules(&self, zone_id: &str) -> Result<Vec<RuleItem>> {
        let response: DescribeRulesResponse =
            self.call("DescribeRules", &ZoneRequest { zone_id }).await?;
        let rules = response.rule_items.unwrap_or_default();
        debug!(zone_id = %zone_id, count = rules.len(), "Listed rules");
        Ok(rules)
    }

    async fn rule_exists(&self, zone_id: &str, rule_name: &str) -> Result<bool> {
        let rules = self.list_rules(zone_id).await?;
        Ok(rules.iter().any(|r| r.rule_name == rule_name))
    }

    async fn create_rule(&self, zone_id: &str, rule: &NewRule) -> Result<()> {
        let request = CreateRuleRequest { zone_id, rule };
        let response: CreateRuleResponse = self.call("CreateRule", &request).await?;
        debug!(
            rule_name = %rule.rule_name,
            rule_id = response.rule_id.as_deref().unwrap_or_default(),
            "Rule created"
        );
        Ok(())
    }
}
