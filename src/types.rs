//! EdgeOne Zone Entities
//!
//! In-memory shapes of the entities copied between zones. Field names follow
//! the EdgeOne (TEO 2022-09-01) API so the same types are used on the wire.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Origin type marking `Origin`/`BackupOrigin` as origin group identifiers
pub const ORIGIN_TYPE_GROUP: &str = "ORIGIN_GROUP";

/// Condition target carrying host names
pub const HOST_TARGET: &str = "host";

/// Normal action that points a request at an origin
pub const ORIGIN_ACTION: &str = "Origin";

/// Parameter of the origin action holding the origin group identifier
pub const ORIGIN_GROUP_PARAM: &str = "OriginGroupId";

/// Status given to every rule created in the target zone
pub const RULE_STATUS_ENABLE: &str = "enable";

/// The API returns `null` for empty lists; treat it as the default.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ============================================================
// Origin Groups
// ============================================================

/// An origin group as listed in a zone
///
/// `origin_group_id` is local to the zone; `origin_group_name` is the stable
/// key shared between zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginGroup {
    pub origin_group_id: String,
    pub origin_group_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_type: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub origin_records: Vec<OriginRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
}

/// One origin inside an origin group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginRecord {
    pub record: String,
    /// Zone-local, assigned by the API
    #[serde(default, skip_serializing)]
    pub record_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto: Option<String>,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub area: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub private_parameter: Vec<NameValue>,
}

/// Generic `Name`/`Value` pair used for private origin credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

/// Payload for creating an origin group in the target zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewOriginGroup {
    pub origin_group_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration_type: Option<String>,
    pub origin_records: Vec<OriginRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_header: Option<String>,
}

impl From<&OriginGroup> for NewOriginGroup {
    fn from(group: &OriginGroup) -> Self {
        Self {
            origin_group_name: group.origin_group_name.clone(),
            origin_type: group.origin_type.clone(),
            configuration_type: group.configuration_type.clone(),
            origin_records: group.origin_records.clone(),
            host_header: group.host_header.clone(),
        }
    }
}

// ============================================================
// Acceleration Domains
// ============================================================

/// An accelerated domain as listed in a zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccelerationDomain {
    pub domain_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_detail: Option<OriginDetail>,
}

/// Origin configuration of a listed domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginDetail {
    pub origin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_origin_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_access: Option<String>,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub private_parameters: Vec<NameValue>,
}

impl OriginDetail {
    /// Whether origin references are origin group identifiers
    pub fn is_origin_group(&self) -> bool {
        self.origin_type == ORIGIN_TYPE_GROUP
    }
}

/// Origin configuration sent when creating a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginInfo {
    pub origin_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_access: Option<String>,
    #[serde(default, deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub private_parameters: Vec<NameValue>,
}

impl From<&OriginDetail> for OriginInfo {
    fn from(detail: &OriginDetail) -> Self {
        Self {
            origin_type: detail.origin_type.clone(),
            origin: detail.origin.clone(),
            backup_origin: detail.backup_origin.clone(),
            private_access: detail.private_access.clone(),
            private_parameters: detail.private_parameters.clone(),
        }
    }
}

/// Payload for creating a domain in the target zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewAccelerationDomain {
    pub domain_name: String,
    pub origin_info: OriginInfo,
}

// ============================================================
// Rule Engine
// ============================================================

/// A rule engine entry as listed in a zone
///
/// `rules` must hold exactly one top-level body; the API never produces
/// more, and the rewriter rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub rule_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub rules: Vec<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_priority: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
}

/// Top-level rule body: IF conditions THEN actions, plus nested sub-rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rule {
    #[serde(default, deserialize_with = "null_default")]
    pub conditions: Vec<RuleAndConditions>,
    #[serde(default, deserialize_with = "null_default")]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "null_default")]
    pub sub_rules: Vec<SubRuleItem>,
}

/// Group of nested rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubRuleItem {
    #[serde(default, deserialize_with = "null_default")]
    pub rules: Vec<SubRule>,
    #[serde(default, deserialize_with = "null_default")]
    pub tags: Vec<String>,
}

/// Nested rule entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubRule {
    #[serde(default, deserialize_with = "null_default")]
    pub conditions: Vec<RuleAndConditions>,
    #[serde(default, deserialize_with = "null_default")]
    pub actions: Vec<Action>,
}

/// Conditions joined by AND; sibling groups are joined by OR
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleAndConditions {
    #[serde(default, deserialize_with = "null_default")]
    pub conditions: Vec<RuleCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleCondition {
    pub operator: String,
    pub target: String,
    #[serde(default, deserialize_with = "null_default")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_name_case: Option<bool>,
}

impl RuleCondition {
    /// Whether the condition matches on host names
    pub fn is_host(&self) -> bool {
        self.target == HOST_TARGET
    }
}

/// Discriminant of an [`Action`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Normal,
    Rewrite,
    Code,
    Empty,
}

/// A rule action; the API sets exactly one of the three variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Action {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_action: Option<NormalAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite_action: Option<RewriteAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_action: Option<CodeAction>,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match (&self.normal_action, &self.rewrite_action, &self.code_action) {
            (Some(_), _, _) => ActionKind::Normal,
            (None, Some(_), _) => ActionKind::Rewrite,
            (None, None, Some(_)) => ActionKind::Code,
            (None, None, None) => ActionKind::Empty,
        }
    }

    /// The normal action if it points requests at an origin
    pub fn origin_action(&self) -> Option<&NormalAction> {
        self.normal_action
            .as_ref()
            .filter(|normal| normal.action == ORIGIN_ACTION)
    }

    pub(crate) fn origin_action_mut(&mut self) -> Option<&mut NormalAction> {
        self.normal_action
            .as_mut()
            .filter(|normal| normal.action == ORIGIN_ACTION)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalAction {
    pub action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub parameters: Vec<ActionParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActionParameter {
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub values: Vec<String>,
}

impl ActionParameter {
    pub fn is_origin_group_id(&self) -> bool {
        self.name == ORIGIN_GROUP_PARAM
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RewriteAction {
    pub action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub parameters: Vec<RewriteActionParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RewriteActionParameter {
    pub action: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeAction {
    pub action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub parameters: Vec<CodeActionParameter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CodeActionParameter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<i64>,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub values: Vec<String>,
}

/// Payload for creating a rule in the target zone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewRule {
    pub rule_name: String,
    pub status: String,
    pub rules: Vec<Rule>,
    pub tags: Vec<String>,
}

// ============================================================
// Zone Settings
// ============================================================

/// Zone-wide settings of a zone
///
/// Only the named fields are copied. Anything else the API returns lands in
/// `other` and stays behind (image optimization is not accepted by
/// `ModifyZoneSetting`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneSetting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_cache: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quic: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_max_size: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_http2: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_redirect: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub https: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_routing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_socket: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip_header: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_prefresh: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_ip_country: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc: Option<Value>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ZoneSetting {
    /// Names of returned settings that are not copied
    pub fn uncopied_fields(&self) -> impl Iterator<Item = &str> {
        self.other
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, _)| name.as_str())
    }
}

/// Settings written to the target zone by `ModifyZoneSetting`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZoneSettingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offline_cache: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quic: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_max_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_http2: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_redirect: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smart_routing: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_socket: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip_header: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_prefresh: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_ip_country: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grpc: Option<Value>,
}

impl From<&ZoneSetting> for ZoneSettingUpdate {
    fn from(setting: &ZoneSetting) -> Self {
        Self {
            cache_config: setting.cache_config.clone(),
            cache_key: setting.cache_key.clone(),
            max_age: setting.max_age.clone(),
            offline_cache: setting.offline_cache.clone(),
            quic: setting.quic.clone(),
            post_max_size: setting.post_max_size.clone(),
            compression: setting.compression.clone(),
            upstream_http2: setting.upstream_http2.clone(),
            force_redirect: setting.force_redirect.clone(),
            https: setting.https.clone(),
            origin: setting.origin.clone(),
            smart_routing: setting.smart_routing.clone(),
            web_socket: setting.web_socket.clone(),
            client_ip_header: setting.client_ip_header.clone(),
            cache_prefresh: setting.cache_prefresh.clone(),
            ipv6: setting.ipv6.clone(),
            client_ip_country: setting.client_ip_country.clone(),
            grpc: setting.grpc.clone(),
        }
    }
}
