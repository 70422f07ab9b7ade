use std::fmt;
use std::str::FromStr;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize};

use super::{require, Client, ClientError};

#[derive(Debug, Deserialize)]
struct GetDashboardResponse {
    dashboard: Option<Dashboard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub parameters: DashboardParameters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardParameters {
    #[serde(default)]
    pub widgets: Vec<DashboardWidget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidget {
    pub query_id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetType {
    #[serde(rename = "timeseries")]
    TimeSeries,
    #[serde(rename = "statistic")]
    Statistic,
    #[serde(rename = "table")]
    Table,
    #[serde(rename = "timeseries-bar")]
    Bar,
}

impl WidgetType {
    pub const ALL: [WidgetType; 4] = [
        WidgetType::TimeSeries,
        WidgetType::Statistic,
        WidgetType::Table,
        WidgetType::Bar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::TimeSeries => "timeseries",
            WidgetType::Statistic => "statistic",
            WidgetType::Table => "table",
            WidgetType::Bar => "timeseries-bar",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = WidgetType::ALL.iter().map(|t| t.as_str()).collect();
                format!(
                    "unknown widget type '{}', must be one of: {}",
                    s,
                    known.join(", ")
                )
            })
    }
}

impl Client {
    fn dashboard_url(&self, service: &str, dashboard_id: &str) -> Result<Url, ClientError> {
        let service = require("service", service)?;
        let dashboard_id = require("dashboardId", dashboard_id)?;
        self.endpoint(&["v1", "dashboards", service, dashboard_id])
    }

    pub async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        require("id", &dashboard.id)?;
        let url = self.endpoint(&["v1", "dashboards", ""])?;
        self.write(Method::POST, url, dashboard, "create dashboard")
            .await
    }

    /// Fetch a dashboard. Returns `Ok(None)` when the dashboard does not exist.
    pub async fn get_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<Option<Dashboard>, ClientError> {
        let url = self.dashboard_url(service, dashboard_id)?;

        match self
            .get_envelope::<GetDashboardResponse>(url, "get dashboard")
            .await?
        {
            None => {
                tracing::trace!(service, dashboard_id, "dashboard not found");
                Ok(None)
            }
            Some(GetDashboardResponse {
                dashboard: Some(dashboard),
            }) => Ok(Some(dashboard)),
            Some(GetDashboardResponse { dashboard: None }) => {
                Err(ClientError::decode("response did not contain a dashboard"))
            }
        }
    }

    pub async fn update_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        let url = self.dashboard_url(&dashboard.service, &dashboard.id)?;
        self.write(Method::PUT, url, dashboard, "update dashboard")
            .await
    }

    pub async fn delete_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<(), ClientError> {
        let url = self.dashboard_url(service, dashboard_id)?;
        self.remove(url, "delete dashboard").await
    }
}
