use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::{require, Client, ClientError};

#[derive(Debug, Deserialize)]
struct AlertResponse {
    alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub parameters: AlertParameters,
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<AlertChannel>,
    /// Set by the service when the alert is snoozed. Never sent on writes.
    #[serde(default, skip_serializing)]
    pub snoozed: Option<AlertSnooze>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSnooze {
    pub value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertChannel {
    #[serde(rename = "type")]
    pub channel_type: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertParameters {
    pub query_id: String,
    pub threshold: AlertThreshold,
    pub frequency: String,
    pub window: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    pub operation: String,
    pub value: f64,
}

impl Client {
    fn alert_url(&self, service: &str, alert_id: &str) -> Result<Url, ClientError> {
        let service = require("service", service)?;
        let alert_id = require("alertId", alert_id)?;
        self.endpoint(&["v1", "alerts", service, alert_id])
    }

    pub async fn create_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        require("id", &alert.id)?;
        let url = self.endpoint(&["v1", "alerts"])?;
        self.write(Method::POST, url, alert, "create alert").await
    }

    /// Fetch an alert. Returns `Ok(None)` when the alert does not exist.
    pub async fn get_alert(
        &self,
        service: &str,
        alert_id: &str,
    ) -> Result<Option<Alert>, ClientError> {
        let url = self.alert_url(service, alert_id)?;
        tracing::trace!(service, alert_id, "getting an alert");

        match self.get_envelope::<AlertResponse>(url, "get alert").await? {
            None => Ok(None),
            Some(AlertResponse { alert: Some(alert) }) => Ok(Some(alert)),
            Some(AlertResponse { alert: None }) => {
                tracing::error!(service, alert_id, "failed to decode alert body");
                Err(ClientError::decode("response did not contain an alert"))
            }
        }
    }

    pub async fn update_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        let url = self.alert_url(&alert.service, &alert.id)?;
        self.write(Method::PUT, url, alert, "update alert").await
    }

    pub async fn delete_alert(&self, service: &str, alert_id: &str) -> Result<(), ClientError> {
        let url = self.alert_url(service, alert_id)?;
        tracing::trace!(service, alert_id, "deleting an alert");
        self.remove(url, "delete alert").await
    }
}
