//! EdgeOne API Client
//!
//! Every API action is a signed JSON POST to the endpoint root. Responses
//! arrive wrapped in `{"Response": {...}}`; a structured failure carries an
//! `Error` object inside that envelope.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::AccountConfig;
use crate::error::{Result, ZoneCopyError};

use super::signer::{self, Credential, CONTENT_TYPE};

pub const API_VERSION: &str = "2022-09-01";
const DEFAULT_SERVICE: &str = "teo";

/// Signed client for the EdgeOne API
pub struct TeoClient {
    http_client: Client,
    credential: Credential,
    endpoint: String,
    service: String,
    region: String,
}

/// `Name`/`Values` filter accepted by the Describe* actions
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AdvancedFilter<'a> {
    pub name: &'a str,
    pub values: Vec<&'a str>,
}

impl<'a> AdvancedFilter<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            values: vec![value],
        }
    }
}

// ============================================================
// Response Envelope
// ============================================================

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: ResponseBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseBody {
    #[serde(default)]
    error: Option<ApiError>,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(flatten)]
    result: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiError {
    code: String,
    message: String,
}

// ============================================================
// Client Implementation
// ============================================================

impl TeoClient {
    pub fn new(account: &AccountConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("zone-copy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ZoneCopyError::Transport {
                action: "build HTTP client".to_string(),
                source: e,
            })?;

        let endpoint = account.end_point.trim_end_matches('/').to_string();
        let service = endpoint
            .split('.')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SERVICE)
            .to_string();

        debug!(endpoint = %endpoint, region = %account.region, "EdgeOne client initialized");

        Ok(Self {
            http_client,
            credential: Credential {
                secret_id: account.secret_id.clone(),
                secret_key: account.secret_key.clone(),
            },
            endpoint,
            service,
            region: account.region.clone(),
        })
    }

    /// Invoke one API action and decode its result
    pub(crate) async fn call<Req, Resp>(&self, action: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_string(request).map_err(|e| {
            ZoneCopyError::MalformedInput(format!("cannot encode {} request: {}", action, e))
        })?;
        let timestamp = Utc::now().timestamp();
        let authorization = signer::authorization(
            &self.credential,
            &self.service,
            &self.endpoint,
            timestamp,
            &payload,
        )?;

        debug!(action = %action, request = %payload, "API request");

        let transport = |e: reqwest::Error| ZoneCopyError::Transport {
            action: action.to_string(),
            source: e,
        };

        let response = self
            .http_client
            .post(format!("https://{}/", self.endpoint))
            .header("Authorization", authorization)
            .header("Content-Type", CONTENT_TYPE)
            .header("X-TC-Action", action)
            .header("X-TC-Timestamp", timestamp.to_string())
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.region)
            .body(payload)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        debug!(action = %action, status = %status, response = %text, "API response");

        decode_response(action, &text).map_err(|e| match e {
            ZoneCopyError::InvalidResponse { action, message } if !status.is_success() => {
                ZoneCopyError::InvalidResponse {
                    action,
                    message: format!("HTTP {}: {}", status, message),
                }
            }
            other => other,
        })
    }
}

fn decode_response<T: DeserializeOwned>(action: &str, text: &str) -> Result<T> {
    let invalid = |message: String| ZoneCopyError::InvalidResponse {
        action: action.to_string(),
        message,
    };

    let envelope: Envelope = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
    let body = envelope.response;

    if let Some(error) = body.error {
        return Err(ZoneCopyError::RemoteRejected {
            action: action.to_string(),
            code: error.code,
            message: error.message,
            request_id: body.request_id.unwrap_or_default(),
        });
    }

    serde_json::from_value(Value::Object(body.result)).map_err(|e| invalid(e.to_string()))
}
