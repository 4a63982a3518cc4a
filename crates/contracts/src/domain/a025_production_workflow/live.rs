//! Сообщения live-канала (websocket) о запуске производств

use super::aggregate::ProductionWorkflow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchFinishedData {
    pub production: ProductionWorkflow,
    /// Сколько производств ещё запускается
    #[serde(default)]
    pub launching_productions_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchFailedData {
    pub production: ProductionWorkflow,
    #[serde(default)]
    pub error: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum LiveEvent {
    #[serde(rename = "pw_launch_finished")]
    LaunchFinished(LaunchFinishedData),
    #[serde(rename = "pw_launch_failed")]
    LaunchFailed(LaunchFailedData),
}

impl LiveEvent {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn production(&self) -> &ProductionWorkflow {
        match self {
            LiveEvent::LaunchFinished(data) => &data.production,
            LiveEvent::LaunchFailed(data) => &data.production,
        }
    }
}
