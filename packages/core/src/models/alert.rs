use serde::{Deserialize, Serialize};

use crate::client::alerts as api;
use crate::provider::ResourceError;

use super::{require_non_empty, ResourceModel};

const KIND: &str = "alert";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertChannel {
    #[serde(rename = "type")]
    pub channel_type: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub operator: String,
    pub value: f64,
}

/// An alert rule evaluated against a saved query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertResourceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub service: String,
    pub enabled: bool,
    pub channels: Vec<AlertChannel>,
    /// Id of the query the alert evaluates.
    pub query: String,
    pub threshold: AlertThreshold,
    pub frequency: String,
    pub window: String,
}

impl ResourceModel for AlertResourceModel {
    type Api = api::Alert;

    fn name(&self) -> &str {
        &self.name
    }

    fn service(&self) -> Option<&str> {
        Some(&self.service)
    }

    fn to_api_model(&self) -> Result<api::Alert, ResourceError> {
        require_non_empty(KIND, "name", &self.name)?;
        require_non_empty(KIND, "service", &self.service)?;
        require_non_empty(KIND, "query", &self.query)?;
        require_non_empty(KIND, "frequency", &self.frequency)?;
        require_non_empty(KIND, "window", &self.window)?;

        if !self.threshold.value.is_finite() {
            return Err(ResourceError::invalid_plan(
                KIND,
                "threshold value must be a finite number",
            ));
        }

        Ok(api::Alert {
            parameters: api::AlertParameters {
                query_id: self.query.clone(),
                threshold: api::AlertThreshold {
                    operation: self.threshold.operator.clone(),
                    value: self.threshold.value,
                },
                frequency: self.frequency.clone(),
                window: self.window.clone(),
            },
            id: self.name.clone(),
            description: self.description.clone(),
            service: self.service.clone(),
            enabled: self.enabled,
            channels: self
                .channels
                .iter()
                .map(|channel| api::AlertChannel {
                    channel_type: channel.channel_type.clone(),
                    targets: channel.targets.clone(),
                })
                .collect(),
            snoozed: None,
        })
    }

    fn from_api_model(alert: &api::Alert) -> Self {
        Self {
            id: Some(alert.id.clone()),
            name: alert.id.clone(),
            description: alert.description.clone(),
            service: alert.service.clone(),
            enabled: alert.enabled,
            channels: alert
                .channels
                .iter()
                .map(|channel| AlertChannel {
                    channel_type: channel.channel_type.clone(),
                    targets: channel.targets.clone(),
                })
                .collect(),
            query: alert.parameters.query_id.clone(),
            threshold: AlertThreshold {
                operator: alert.parameters.threshold.operation.clone(),
                value: alert.parameters.threshold.value,
            },
            frequency: alert.parameters.frequency.clone(),
            window: alert.parameters.window.clone(),
        }
    }
}
