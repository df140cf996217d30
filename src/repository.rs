//! Zone Repositories
//!
//! The capabilities the copier needs from a zone, one trait per entity type.
//! Every call takes the zone id explicitly, so a single implementation serves
//! both the template and the target zone.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    AccelerationDomain, NewAccelerationDomain, NewOriginGroup, NewRule, OriginGroup, RuleItem,
    ZoneSetting, ZoneSettingUpdate,
};

#[async_trait]
pub trait OriginGroupRepository: Send + Sync {
    /// List every origin group of a zone
    async fn list_origin_groups(&self, zone_id: &str) -> Result<Vec<OriginGroup>>;

    /// Whether an origin group with this exact name exists
    async fn origin_group_exists(&self, zone_id: &str, name: &str) -> Result<bool>;

    /// Create an origin group, returning its new id
    async fn create_origin_group(&self, zone_id: &str, group: &NewOriginGroup) -> Result<String>;
}

#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn list_domains(&self, zone_id: &str) -> Result<Vec<AccelerationDomain>>;

    async fn domain_exists(&self, zone_id: &str, domain_name: &str) -> Result<bool>;

    async fn create_domain(&self, zone_id: &str, domain: &NewAccelerationDomain) -> Result<()>;
}

#[async_trait]
pub trait RuleRepository: Send + Sync {
    /// List rules in display order
    async fn list_rules(&self, zone_id: &str) -> Result<Vec<RuleItem>>;

    async fn rule_exists(&self, zone_id: &str, rule_name: &str) -> Result<bool>;

    /// Create a rule; the API places it ahead of the existing ones
    async fn create_rule(&self, zone_id: &str, rule: &NewRule) -> Result<()>;
}

#[async_trait]
pub trait ZoneSettingRepository: Send + Sync {
    async fn zone_setting(&self, zone_id: &str) -> Result<ZoneSetting>;

    async fn modify_zone_setting(&self, zone_id: &str, update: &ZoneSettingUpdate) -> Result<()>;
}
