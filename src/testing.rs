//! In-memory zones for tests
//!
//! Implements every repository trait over plain maps and records each call,
//! so tests can assert on ordering and on what reached the target zone.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{Result, ZoneCopyError};
use crate::repository::{
    DomainRepository, OriginGroupRepository, RuleRepository, ZoneSettingRepository,
};
use crate::types::{
    AccelerationDomain, Action, ActionParameter, NewAccelerationDomain, NewOriginGroup, NewRule,
    NormalAction, OriginDetail, OriginGroup, OriginRecord, Rule, RuleAndConditions,
    RuleCondition, RuleItem, SubRule, SubRuleItem, ZoneSetting, ZoneSettingUpdate,
};

#[derive(Debug, Clone)]
struct Call {
    op: &'static str,
    zone: String,
    key: String,
}

#[derive(Default)]
struct State {
    origin_groups: HashMap<String, Vec<OriginGroup>>,
    domains: HashMap<String, Vec<AccelerationDomain>>,
    rules: HashMap<String, Vec<RuleItem>>,
    settings: HashMap<String, ZoneSetting>,
    applied_settings: HashMap<String, ZoneSettingUpdate>,
    calls: Vec<Call>,
    failures: Vec<(&'static str, String)>,
    next_id: u32,
}

#[derive(Default)]
pub(crate) struct MemoryZones {
    state: Mutex<State>,
}

impl MemoryZones {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Record a call and fail it if a failure was registered for it
    fn enter(&self, op: &'static str, zone: &str, key: &str) -> Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(Call {
            op,
            zone: zone.to_string(),
            key: key.to_string(),
        });

        let fails = state
            .failures
            .iter()
            .any(|(f_op, f_key)| *f_op == op && (f_key == key || f_key == zone));
        if fails {
            return Err(ZoneCopyError::RemoteRejected {
                action: op.to_string(),
                code: "InternalError".to_string(),
                message: format!("injected failure for {}", key),
                request_id: "test".to_string(),
            });
        }
        Ok(state)
    }

    pub(crate) fn fail_on(&self, op: &'static str, key: &str) {
        self.state().failures.push((op, key.to_string()));
    }

    pub(crate) fn add_origin_group(&self, zone: &str, group: OriginGroup) {
        self.state()
            .origin_groups
            .entry(zone.to_string())
            .or_default()
            .push(group);
    }

    pub(crate) fn add_domain(&self, zone: &str, domain: AccelerationDomain) {
        self.state()
            .domains
            .entry(zone.to_string())
            .or_default()
            .push(domain);
    }

    pub(crate) fn add_rule(&self, zone: &str, rule: RuleItem) {
        self.state()
            .rules
            .entry(zone.to_string())
            .or_default()
            .push(rule);
    }

    pub(crate) fn set_zone_setting(&self, zone: &str, setting: ZoneSetting) {
        self.state().settings.insert(zone.to_string(), setting);
    }

    pub(crate) fn origin_groups(&self, zone: &str) -> Vec<OriginGroup> {
        self.state().origin_groups.get(zone).cloned().unwrap_or_default()
    }

    pub(crate) fn origin_group_id(&self, zone: &str, name: &str) -> Option<String> {
        self.origin_groups(zone)
            .into_iter()
            .find(|g| g.origin_group_name == name)
            .map(|g| g.origin_group_id)
    }

    pub(crate) fn domains(&self, zone: &str) -> Vec<AccelerationDomain> {
        self.state().domains.get(zone).cloned().unwrap_or_default()
    }

    /// Rules in display order
    pub(crate) fn rules(&self, zone: &str) -> Vec<RuleItem> {
        self.state().rules.get(zone).cloned().unwrap_or_default()
    }

    pub(crate) fn applied_setting(&self, zone: &str) -> Option<ZoneSettingUpdate> {
        self.state().applied_settings.get(zone).cloned()
    }

    /// `(zone, key)` of every call to `op`, in call order
    pub(crate) fn calls_of(&self, op: &str) -> Vec<(String, String)> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .map(|c| (c.zone.clone(), c.key.clone()))
            .collect()
    }
}

#[async_trait]
impl OriginGroupRepository for MemoryZones {
    async fn list_origin_groups(&self, zone_id: &str) -> Result<Vec<OriginGroup>> {
        let state = self.enter("list_origin_groups", zone_id, "")?;
        Ok(state.origin_groups.get(zone_id).cloned().unwrap_or_default())
    }

    async fn origin_group_exists(&self, zone_id: &str, name: &str) -> Result<bool> {
        let state = self.enter("origin_group_exists", zone_id, name)?;
        Ok(state
            .origin_groups
            .get(zone_id)
            .is_some_and(|groups| groups.iter().any(|g| g.origin_group_name == name)))
    }

    async fn create_origin_group(&self, zone_id: &str, group: &NewOriginGroup) -> Result<String> {
        let mut state = self.enter("create_origin_group", zone_id, &group.origin_group_name)?;
        state.next_id += 1;
        let id = format!("origin-{}", state.next_id);

        state
            .origin_groups
            .entry(zone_id.to_string())
            .or_default()
            .push(OriginGroup {
                origin_group_id: id.clone(),
                origin_group_name: group.origin_group_name.clone(),
                origin_type: group.origin_type.clone(),
                configuration_type: group.configuration_type.clone(),
                origin_records: group.origin_records.clone(),
                host_header: group.host_header.clone(),
            });
        Ok(id)
    }
}

#[async_trait]
impl DomainRepository for MemoryZones {
    async fn list_domains(&self, zone_id: &str) -> Result<Vec<AccelerationDomain>> {
        let state = self.enter("list_domains", zone_id, "")?;
        Ok(state.domains.get(zone_id).cloned().unwrap_or_default())
    }

    async fn domain_exists(&self, zone_id: &str, domain_name: &str) -> Result<bool> {
        let state = self.enter("domain_exists", zone_id, domain_name)?;
        Ok(state
            .domains
            .get(zone_id)
            .is_some_and(|domains| domains.iter().any(|d| d.domain_name == domain_name)))
    }

    async fn create_domain(&self, zone_id: &str, domain: &NewAccelerationDomain) -> Result<()> {
        let mut state = self.enter("create_domain", zone_id, &domain.domain_name)?;
        let info = &domain.origin_info;

        state
            .domains
            .entry(zone_id.to_string())
            .or_default()
            .push(AccelerationDomain {
                domain_name: domain.domain_name.clone(),
                domain_status: Some("online".to_string()),
                origin_detail: Some(OriginDetail {
                    origin_type: info.origin_type.clone(),
                    origin: info.origin.clone(),
                    backup_origin: info.backup_origin.clone(),
                    origin_group_name: None,
                    back_origin_group_name: None,
                    private_access: info.private_access.clone(),
                    private_parameters: info.private_parameters.clone(),
                }),
            });
        Ok(())
    }
}

#[async_trait]
impl RuleRepository for MemoryZones {
    async fn list_rules(&self, zone_id: &str) -> Result<Vec<RuleItem>> {
        let state = self.enter("list_rules", zone_id, "")?;
        Ok(state.rules.get(zone_id).cloned().unwrap_or_default())
    }

    async fn rule_exists(&self, zone_id: &str, rule_name: &str) -> Result<bool> {
        let state = self.enter("rule_exists", zone_id, rule_name)?;
        Ok(state
            .rules
            .get(zone_id)
            .is_some_and(|rules| rules.iter().any(|r| r.rule_name == rule_name)))
    }

    async fn create_rule(&self, zone_id: &str, rule: &NewRule) -> Result<()> {
        let mut state = self.enter("create_rule", zone_id, &rule.rule_name)?;
        state.next_id += 1;
        let id = format!("rule-{}", state.next_id);

        // new rules are displayed first
        state.rules.entry(zone_id.to_string()).or_default().insert(
            0,
            RuleItem {
                rule_id: Some(id),
                rule_name: rule.rule_name.clone(),
                status: Some(rule.status.clone()),
                rules: rule.rules.clone(),
                rule_priority: None,
                tags: rule.tags.clone(),
            },
        );
        Ok(())
    }
}

#[async_trait]
impl ZoneSettingRepository for MemoryZones {
    async fn zone_setting(&self, zone_id: &str) -> Result<ZoneSetting> {
        let state = self.enter("zone_setting", zone_id, "")?;
        Ok(state.settings.get(zone_id).cloned().unwrap_or_default())
    }

    async fn modify_zone_setting(&self, zone_id: &str, update: &ZoneSettingUpdate) -> Result<()> {
        let mut state = self.enter("modify_zone_setting", zone_id, "")?;
        state
            .applied_settings
            .insert(zone_id.to_string(), update.clone());
        Ok(())
    }
}

// ============================================================
// Fixtures
// ============================================================

pub(crate) fn origin_group(id: &str, name: &str) -> OriginGroup {
    OriginGroup {
        origin_group_id: id.to_string(),
        origin_group_name: name.to_string(),
        origin_type: None,
        configuration_type: Some("weight".to_string()),
        origin_records: vec![OriginRecord {
            record: "10.0.0.1".to_string(),
            record_id: Some(format!("{}-record", id)),
            port: Some(80),
            weight: Some(100),
            proto: None,
            area: Vec::new(),
            private: Some(false),
            private_parameter: Vec::new(),
        }],
        host_header: None,
    }
}

pub(crate) fn domain(name: &str, origin_type: &str, origin: &str, backup: &str) -> AccelerationDomain {
    AccelerationDomain {
        domain_name: name.to_string(),
        domain_status: Some("online".to_string()),
        origin_detail: Some(OriginDetail {
            origin_type: origin_type.to_string(),
            origin: Some(origin.to_string()),
            backup_origin: Some(backup.to_string()),
            origin_group_name: None,
            back_origin_group_name: None,
            private_access: Some("off".to_string()),
            private_parameters: Vec::new(),
        }),
    }
}

fn host_condition(host: &str) -> RuleAndConditions {
    RuleAndConditions {
        conditions: vec![RuleCondition {
            operator: "equal".to_string(),
            target: "host".to_string(),
            values: vec![host.to_string()],
            ..Default::default()
        }],
    }
}

/// Rule matching on one host with a cache action
pub(crate) fn plain_rule(name: &str, host: &str) -> RuleItem {
    RuleItem {
        rule_id: None,
        rule_name: name.to_string(),
        status: Some("enable".to_string()),
        rules: vec![Rule {
            conditions: vec![host_condition(host)],
            actions: vec![Action {
                normal_action: Some(NormalAction {
                    action: "CacheKey".to_string(),
                    parameters: vec![ActionParameter {
                        name: "Switch".to_string(),
                        values: vec!["on".to_string()],
                    }],
                }),
                ..Default::default()
            }],
            sub_rules: Vec::new(),
        }],
        rule_priority: None,
        tags: Vec::new(),
    }
}

/// Rule named after its host, with a nested origin group action
pub(crate) fn origin_action_rule(name: &str, group_id: &str) -> RuleItem {
    RuleItem {
        rule_id: None,
        rule_name: name.to_string(),
        status: Some("disable".to_string()),
        rules: vec![Rule {
            conditions: vec![host_condition(name)],
            actions: Vec::new(),
            sub_rules: vec![SubRuleItem {
                rules: vec![SubRule {
                    conditions: Vec::new(),
                    actions: vec![Action {
                        normal_action: Some(NormalAction {
                            action: "Origin".to_string(),
                            parameters: vec![ActionParameter {
                                name: "OriginGroupId".to_string(),
                                values: vec![group_id.to_string()],
                            }],
                        }),
                        ..Default::default()
                    }],
                }],
                tags: Vec::new(),
            }],
        }],
        rule_priority: None,
        tags: vec!["copied".to_string()],
    }
}
