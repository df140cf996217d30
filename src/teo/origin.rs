//! Origin group actions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::repository::OriginGroupRepository;
use crate::types::{NewOriginGroup, OriginGroup};

use super::client::{AdvancedFilter, TeoClient};

const PAGE_SIZE: u64 = 100;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeOriginGroupRequest<'a> {
    offset: u64,
    limit: u64,
    filters: &'a [AdvancedFilter<'a>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeOriginGroupResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    origin_groups: Option<Vec<OriginGroup>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateOriginGroupRequest<'a> {
    zone_id: &'a str,
    #[serde(flatten)]
    group: &'a NewOriginGroup,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateOriginGroupResponse {
    origin_group_id: String,
}

impl TeoClient {
    /// Read every page of `DescribeOriginGroup`
    async fn describe_origin_groups(&self, filters: &[AdvancedFilter<'_>]) -> Result<Vec<OriginGroup>> {
        let mut groups = Vec::new();

        loop {
            let request = DescribeOriginGroupRequest {
                offset: groups.len() as u64,
                limit: PAGE_SIZE,
                filters,
            };
            let page: DescribeOriginGroupResponse =
                self.call("DescribeOriginGroup", &request).await?;

            let items = page.origin_groups.unwrap_or_default();
            let received = items.len();
            groups.extend(items);

            if received == 0 || groups.len() as u64 >= page.total_count {
                break;
            }
        }

        Ok(groups)
    }
}

#[async_trait]
impl OriginGroupRepository for TeoClient {
    async fn list_origin_groups(&self, zone_id: &str) -> Result<Vec<OriginGroup>> {
        let groups = self
            .describe_origin_groups(&[AdvancedFilter::new("zone-id", zone_id)])
            .await?;
        debug!(zone_id = %zone_id, count = groups.len(), "Listed origin groups");
        Ok(groups)
    }

    async fn origin_group_exists(&self, zone_id: &str, name: &str) -> Result<bool> {
        let groups = self
            .describe_origin_groups(&[
                AdvancedFilter::new("zone-id", zone_id),
                AdvancedFilter::new("origin-group-name", name),
            ])
            .await?;
        Ok(groups.iter().any(|g| g.origin_group_name == name))
    }

    async fn create_origin_group(&self, zone_id: &str, group: &NewOriginGroup) -> Result<String> {
        let request = CreateOriginGroupRequest { zone_id, group };
        let response: CreateOriginGroupResponse =
            self.call("CreateOriginGroup", &request).await?;
        Ok(response.origin_group_id)
    }
}
