//! Request and response bodies of the JSON API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectRequest {
    #[serde(default)]
    pub uri: Option<String>,
}

/// Field types are checked by `validation::dashboard_patch` so that the
/// first bad field, in form order, is the one reported.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateDashboardRequest {
    #[serde(rename = "guildID", default)]
    pub guild_id: Option<Value>,
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub port: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardList {
    pub success: bool,
    pub count: usize,
    pub dashboards: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "modifiedCount")]
    pub modified_count: u64,
}
