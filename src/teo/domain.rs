//! Acceleration domain actions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::repository::DomainRepository;
use crate::types::{AccelerationDomain, NewAccelerationDomain};

use super::client::{AdvancedFilter, TeoClient};

const PAGE_SIZE: u64 = 200;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeAccelerationDomainsRequest<'a> {
    zone_id: &'a str,
    offset: u64,
    limit: u64,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    filters: &'a [AdvancedFilter<'a>],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeAccelerationDomainsResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    acceleration_domains: Option<Vec<AccelerationDomain>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct CreateAccelerationDomainRequest<'a> {
    zone_id: &'a str,
    #[serde(flatten)]
    domain: &'a NewAccelerationDomain,
}

impl TeoClient {
    async fn describe_domains(
        &self,
        zone_id: &str,
        filters: &[AdvancedFilter<'_>],
    ) -> Result<Vec<AccelerationDomain>> {
        let mut domains = Vec::new();

        loop {
            let request = DescribeAccelerationDomainsRequest {
                zone_id,
                offset: domains.len() as u64,
                limit: PAGE_SIZE,
                filters,
            };
            let page: DescribeAccelerationDomainsResponse =
                self.call("DescribeAccelerationDomains", &request).await?;

            let items = page.acceleration_domains.unwrap_or_default();
            let received = items.len();
            domains.extend(items);

            if received == 0 || domains.len() as u64 >= page.total_count {
                break;
            }
        }

        Ok(domains)
    }
}

#[async_trait]
impl DomainRepository for TeoClient {
    async fn list_domains(&self, zone_id: &str) -> Result<Vec<AccelerationDomain>> {
        let domains = self.describe_domains(zone_id, &[]).await?;
        debug!(zone_id = %zone_id, count = domains.len(), "Listed domains");
        Ok(domains)
    }

    async fn domain_exists(&self, zone_id: &str, domain_name: &str) -> Result<bool> {
        let domains = self
            .describe_domains(zone_id, &[AdvancedFilter::new("domain-name", domain_name)])
            .await?;
        Ok(domains.iter().any(|d| d.domain_name == domain_name))
    }

    async fn create_domain(&self, zone_id: &str, domain: &NewAccelerationDomain) -> Result<()> {
        let request = CreateAccelerationDomainRequest { zone_id, domain };
        let _: serde_json::Value = self.call("CreateAccelerationDomain", &request).await?;
        Ok(())
    }
}
