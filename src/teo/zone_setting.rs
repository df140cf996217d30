//! Zone setting actions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZoneCopyError};
use crate::repository::ZoneSettingRepository;
use crate::types::{ZoneSetting, ZoneSettingUpdate};

use super::client::TeoClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeZoneSettingRequest<'a> {
    zone_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeZoneSettingResponse {
    #[serde(default)]
    zone_setting: Option<ZoneSetting>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ModifyZoneSettingRequest<'a> {
    zone_id: &'a str,
    #[serde(flatten)]
    update: &'a ZoneSettingUpdate,
}

#[async_trait]
impl ZoneSettingRepository for TeoClient {
    async fn zone_setting(&self, zone_id: &str) -> Result<ZoneSetting> {
        let response: DescribeZoneSettingResponse = self
            .call("DescribeZoneSetting", &DescribeZoneSettingRequest { zone_id })
            .await?;

        response
            .zone_setting
            .ok_or_else(|| ZoneCopyError::InvalidResponse {
                action: "DescribeZoneSetting".to_string(),
                message: format!("no ZoneSetting returned for {}", zone_id),
            })
    }

    async fn modify_zone_setting(&self, zone_id: &str, update: &ZoneSettingUpdate) -> Result<()> {
        let request = ModifyZoneSettingRequest { zone_id, update };
        let _: serde_json::Value = self.call("ModifyZoneSetting", &request).await?;
        Ok(())
    }
}
