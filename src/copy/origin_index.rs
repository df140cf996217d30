//! Origin Group Index
//!
//! Translates template-zone origin group ids into target-zone ids by way of
//! the group name, the only key the two zones share. The index is a snapshot:
//! groups created after it was built are not visible through it.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, ZoneCopyError};
use crate::types::OriginGroup;

/// Frozen id → name → id lookup between two zones
#[derive(Debug, Clone, Default)]
pub struct OriginIndex {
    /// template group id -> group name
    source_names: HashMap<String, String>,
    /// group name -> target group id
    target_ids: HashMap<String, String>,
}

impl OriginIndex {
    /// Build the index from full listings of both zones
    pub fn build(source: &[OriginGroup], target: &[OriginGroup]) -> Self {
        let source_names = source
            .iter()
            .map(|g| (g.origin_group_id.clone(), g.origin_group_name.clone()))
            .collect();
        let target_ids = target
            .iter()
            .map(|g| (g.origin_group_name.clone(), g.origin_group_id.clone()))
            .collect();

        let index = Self {
            source_names,
            target_ids,
        };
        debug!(
            source_groups = index.source_names.len(),
            target_groups = index.target_ids.len(),
            "Built origin group index"
        );
        index
    }

    /// Resolve a template-zone group id to the target-zone group id
    pub fn resolve(&self, source_id: &str) -> Result<&str> {
        let name = self
            .source_names
            .get(source_id)
            .ok_or_else(|| ZoneCopyError::old_origin_name(source_id))?;

        self.target_ids
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ZoneCopyError::new_origin_id(source_id))
    }
}
