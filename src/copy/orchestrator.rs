//! Zone Copy Orchestrator
//!
//! Drives each import through list → translate → existence check → create.
//! Imports are sequential and fail fast: the first error stops the entity
//! type, and whatever was created before it stays in the target zone.
//! Re-running an import resumes thanks to the existence check.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::config::CopyScope;
use crate::error::{Result, ZoneCopyError};
use crate::repository::{
    DomainRepository, OriginGroupRepository, RuleRepository, ZoneSettingRepository,
};
use crate::types::{
    AccelerationDomain, NewAccelerationDomain, NewOriginGroup, NewRule, OriginInfo,
    ZoneSettingUpdate, RULE_STATUS_ENABLE,
};

use super::origin_index::OriginIndex;
use super::rename::ZoneRenamer;
use super::report::{EntityKind, ImportAction, ImportReport, Module};
use super::rule_rewriter::{needs_origin_index, single_body, RuleRewriter};

/// Copies the configuration of a template zone onto a target zone
///
/// The origin group index is built on first use and then frozen for the
/// lifetime of the copier. Origin groups must therefore be imported before
/// domains or rules that reference them are translated.
pub struct ZoneCopier {
    scope: CopyScope,
    renamer: ZoneRenamer,
    origins: Arc<dyn OriginGroupRepository>,
    domains: Arc<dyn DomainRepository>,
    rules: Arc<dyn RuleRepository>,
    settings: Arc<dyn ZoneSettingRepository>,
    origin_index: OnceCell<OriginIndex>,
}

impl ZoneCopier {
    pub fn new(
        scope: CopyScope,
        origins: Arc<dyn OriginGroupRepository>,
        domains: Arc<dyn DomainRepository>,
        rules: Arc<dyn RuleRepository>,
        settings: Arc<dyn ZoneSettingRepository>,
    ) -> Self {
        let renamer = ZoneRenamer::new(&scope.source_token, &scope.target_token);

        info!(
            source_zone = %scope.source_zone_id,
            target_zone = %scope.target_zone_id,
            from = %scope.source_token,
            to = %scope.target_token,
            "ZoneCopier initialized"
        );

        Self {
            scope,
            renamer,
            origins,
            domains,
            rules,
            settings,
            origin_index: OnceCell::new(),
        }
    }

    /// Create a copier backed by one client for every entity type
    pub fn with_client<C>(scope: CopyScope, client: Arc<C>) -> Self
    where
        C: OriginGroupRepository
            + DomainRepository
            + RuleRepository
            + ZoneSettingRepository
            + 'static,
    {
        Self::new(
            scope,
            client.clone(),
            client.clone(),
            client.clone(),
            client,
        )
    }

    /// Run the entity types of a module in order.
    ///
    /// A failed entity type is logged and the next one still runs. Results
    /// are returned in run order.
    pub async fn run(&self, module: Module) -> Vec<(EntityKind, Result<ImportReport>)> {
        let mut results = Vec::new();

        for &kind in module.kinds() {
            let result = self.import(kind).await;
            if let Err(e) = &result {
                error!(kind = %kind, error = %e, "Import failed");
            }
            results.push((kind, result));
        }

        results
    }

    /// Run the import of one entity type
    pub async fn import(&self, kind: EntityKind) -> Result<ImportReport> {
        let report = match kind {
            EntityKind::OriginGroup => self.import_origin_groups().await,
            EntityKind::Domain => self.import_domains().await,
            EntityKind::Rule => self.import_rules().await,
            EntityKind::ZoneSetting => self.import_zone_setting().await,
        }?;

        info!(
            kind = %report.kind,
            created = report.created(),
            skipped = report.skipped(),
            applied = report.applied(),
            "Import complete"
        );
        Ok(report)
    }

    /// Copy origin groups, in template listing order
    pub async fn import_origin_groups(&self) -> Result<ImportReport> {
        let source = &self.scope.source_zone_id;
        let target = &self.scope.target_zone_id;
        let mut report = ImportReport::new(EntityKind::OriginGroup);

        let groups = self.origins.list_origin_groups(source).await.map_err(|e| {
            error!(zone_id = %source, error = %e, "Failed to list origin groups");
            e
        })?;
        info!(zone_id = %source, count = groups.len(), "Listed template origin groups");

        for group in &groups {
            let name = &group.origin_group_name;

            if self.origins.origin_group_exists(target, name).await? {
                debug!(name = %name, "Origin group already exists, skipping");
                report.record(name, ImportAction::Skipped);
                continue;
            }

            let id = self
                .origins
                .create_origin_group(target, &NewOriginGroup::from(group))
                .await
                .map_err(|e| {
                    error!(name = %name, error = %e, "Origin group import failed");
                    e
                })?;

            info!(name = %name, id = %id, "Created origin group");
            report.record(name, ImportAction::Created);
        }

        Ok(report)
    }

    /// Copy domains, in template listing order
    pub async fn import_domains(&self) -> Result<ImportReport> {
        let source = &self.scope.source_zone_id;
        let target = &self.scope.target_zone_id;
        let mut report = ImportReport::new(EntityKind::Domain);

        let domains = self.domains.list_domains(source).await.map_err(|e| {
            error!(zone_id = %source, error = %e, "Failed to list domains");
            e
        })?;
        info!(zone_id = %source, count = domains.len(), "Listed template domains");

        for domain in &domains {
            let new_name = self.renamer.rename(&domain.domain_name);

            let origin_info = self.translate_origin(domain).await.map_err(|e| {
                error!(
                    domain = %domain.domain_name,
                    new_domain = %new_name,
                    error = %e,
                    "Domain origin translation failed"
                );
                e
            })?;

            if self.domains.domain_exists(target, &new_name).await? {
                debug!(domain = %new_name, "Domain already exists, skipping");
                report.record(new_name, ImportAction::Skipped);
                continue;
            }

            let request = NewAccelerationDomain {
                domain_name: new_name.clone(),
                origin_info,
            };
            self.domains
                .create_domain(target, &request)
                .await
                .map_err(|e| {
                    error!(
                        domain = %domain.domain_name,
                        new_domain = %new_name,
                        error = %e,
                        "Domain import failed"
                    );
                    e
                })?;

            info!(domain = %domain.domain_name, new_domain = %new_name, "Created domain");
            report.record(new_name, ImportAction::Created);
        }

        Ok(report)
    }

    /// Copy rule engine rules.
    ///
    /// Each created rule lands ahead of the existing ones, so rules are created
    /// in reverse template order to end up in the template's display order.
    pub async fn import_rules(&self) -> Result<ImportReport> {
        let source = &self.scope.source_zone_id;
        let target = &self.scope.target_zone_id;
        let mut report = ImportReport::new(EntityKind::Rule);
        let no_origins = OriginIndex::default();

        let rules = self.rules.list_rules(source).await.map_err(|e| {
            error!(zone_id = %source, error = %e, "Failed to list rules");
            e
        })?;
        info!(zone_id = %source, count = rules.len(), "Listed template rules");

        for item in rules.iter().rev() {
            // rule names often embed a host name
            let new_name = self.renamer.rename(&item.rule_name);
            let reject = |e: ZoneCopyError| {
                error!(rule = %new_name, error = %e, "Rule translation failed");
                e
            };

            // malformed rules are rejected before any zone is queried
            single_body(&item.rules).map_err(reject)?;
            let index = if needs_origin_index(&item.rules) {
                self.origin_index().await?
            } else {
                &no_origins
            };
            let bodies = RuleRewriter::new(&self.renamer, index)
                .rewrite(&item.rules)
                .map_err(reject)?;

            if self.rules.rule_exists(target, &new_name).await? {
                debug!(rule = %new_name, "Rule already exists, skipping");
                report.record(new_name, ImportAction::Skipped);
                continue;
            }

            let request = NewRule {
                rule_name: new_name.clone(),
                status: RULE_STATUS_ENABLE.to_string(),
                rules: bodies,
                tags: item.tags.clone(),
            };
            self.rules.create_rule(target, &request).await.map_err(|e| {
                error!(rule = %new_name, error = %e, "Rule import failed");
                e
            })?;

            info!(rule = %new_name, "Created rule");
            report.record(new_name, ImportAction::Created);
        }

        Ok(report)
    }

    /// Copy the fixed set of zone-wide settings
    pub async fn import_zone_setting(&self) -> Result<ImportReport> {
        let source = &self.scope.source_zone_id;
        let target = &self.scope.target_zone_id;
        let mut report = ImportReport::new(EntityKind::ZoneSetting);

        let setting = self.settings.zone_setting(source).await.map_err(|e| {
            error!(zone_id = %source, error = %e, "Failed to describe zone setting");
            e
        })?;

        for field in setting.uncopied_fields() {
            debug!(field = %field, "Zone setting field not copied");
        }
        if setting.other.contains_key("ImageOptimize") {
            warn!("Image optimization settings cannot be copied and were left behind");
        }

        let update = ZoneSettingUpdate::from(&setting);
        self.settings
            .modify_zone_setting(target, &update)
            .await
            .map_err(|e| {
                error!(zone_id = %target, error = %e, "Zone setting import failed");
                e
            })?;

        info!(zone_id = %target, "Applied zone setting");
        report.record(target, ImportAction::Applied);
        Ok(report)
    }

    /// Origin group index, built from both zones on first use
    async fn origin_index(&self) -> Result<&OriginIndex> {
        self.origin_index
            .get_or_try_init(|| async {
                let source = self
                    .origins
                    .list_origin_groups(&self.scope.source_zone_id)
                    .await?;
                let target = self
                    .origins
                    .list_origin_groups(&self.scope.target_zone_id)
                    .await?;
                Ok::<_, ZoneCopyError>(OriginIndex::build(&source, &target))
            })
            .await
    }

    /// Origin settings for the target zone; group references are translated
    async fn translate_origin(&self, domain: &AccelerationDomain) -> Result<OriginInfo> {
        let detail = domain.origin_detail.as_ref().ok_or_else(|| {
            ZoneCopyError::MalformedInput(format!(
                "domain {} has no origin detail",
                domain.domain_name
            ))
        })?;

        let mut info = OriginInfo::from(detail);
        if !detail.is_origin_group() {
            return Ok(info);
        }

        let has_reference = [&info.origin, &info.backup_origin]
            .iter()
            .any(|r| r.as_deref().is_some_and(|id| !id.is_empty()));
        if !has_reference {
            return Ok(info);
        }

        let index = self.origin_index().await?;
        for reference in [&mut info.origin, &mut info.backup_origin] {
            if let Some(id) = reference.as_mut().filter(|id| !id.is_empty()) {
                *id = index.resolve(id)?.to_string();
            }
        }
        Ok(info)
    }
}
