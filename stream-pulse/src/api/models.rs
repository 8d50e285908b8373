//! Request and response bodies.
//!
//! Field names are camelCase to match what the extension expects.

use serde::{Deserialize, Serialize};

use crate::scheduler::ChannelActorState;

/// `GET /`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: &'static str,
    /// Channels with a session in progress
    pub active_channels: usize,
    /// Channels with stored credentials
    pub total_users: usize,
    /// Channels with a running monitor
    pub monitored_channels: usize,
}

/// `GET /health`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// `GET /api/check-auth/{channelId}`
#[derive(Debug, Clone, Serialize)]
pub struct CheckAuthResponse {
    pub authorized: bool,
}

/// Query string of `GET /auth/callback`.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Set by the platform when the user denies access.
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// `GET /api/monitor/{channelId}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStatusResponse {
    pub channel_id: String,
    pub monitoring: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ChannelActorState>,
}

/// `DELETE /api/monitor/{channelId}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopMonitorResponse {
    pub stopped: bool,
    pub credential_removed: bool,
}

/// `POST /api/monitor/{channelId}/check`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNowResponse {
    pub outcome: &'static str,
    /// Absent when the check made the monitor exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<ChannelActorState>,
}

/// Logging configuration response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfigResponse {
    pub filter: String,
    pub available_modules: Vec<ModuleInfo>,
}

/// Information about an available logging module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
}

/// `PUT /api/logging`
#[derive(Debug, Deserialize)]
pub struct UpdateLogFilterRequest {
    pub filter: String,
}
