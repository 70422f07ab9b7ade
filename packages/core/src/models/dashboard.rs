use serde::{Deserialize, Serialize};

use crate::client::dashboards as api;
use crate::provider::ResourceError;

use super::{empty_as_none, non_empty, require_non_empty, ResourceModel};

const KIND: &str = "dashboard";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardWidget {
    pub query_id: String,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResourceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    pub service: String,
    pub widgets: Vec<DashboardWidget>,
}

impl DashboardWidget {
    fn to_api_model(&self, index: usize) -> Result<api::DashboardWidget, ResourceError> {
        require_non_empty(KIND, &format!("widgets[{}].query_id", index), &self.query_id)?;
        let widget_type = self
            .widget_type
            .parse::<api::WidgetType>()
            .map_err(|message| {
                ResourceError::invalid_plan(KIND, format!("widgets[{}]: {}", index, message))
            })?;

        Ok(api::DashboardWidget {
            query_id: self.query_id.clone(),
            widget_type,
            name: self.name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        })
    }
}

impl ResourceModel for DashboardResourceModel {
    type Api = api::Dashboard;

    fn name(&self) -> &str {
        &self.name
    }

    fn service(&self) -> Option<&str> {
        Some(&self.service)
    }

    fn to_api_model(&self) -> Result<api::Dashboard, ResourceError> {
        require_non_empty(KIND, "name", &self.name)?;
        require_non_empty(KIND, "service", &self.service)?;

        let widgets = self
            .widgets
            .iter()
            .enumerate()
            .map(|(index, widget)| widget.to_api_model(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(api::Dashboard {
            id: self.name.clone(),
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            service: self.service.clone(),
            parameters: api::DashboardParameters { widgets },
        })
    }

    fn from_api_model(dashboard: &api::Dashboard) -> Self {
        Self {
            id: Some(dashboard.id.clone()),
            name: dashboard.id.clone(),
            description: non_empty(&dashboard.description),
            service: dashboard.service.clone(),
            widgets: dashboard
                .parameters
                .widgets
                .iter()
                .map(|widget| DashboardWidget {
                    query_id: widget.query_id.clone(),
                    widget_type: widget.widget_type.as_str().to_string(),
                    name: non_empty(&widget.name),
                    description: non_empty(&widget.description),
                })
                .collect(),
        }
    }
}
