use async_trait::async_trait;

use super::{split_import_id, Resource, ResourceError, ResourceKind, SharedApi};
use crate::models::{DashboardResourceModel, ResourceModel};

const KIND: &str = "dashboard";

pub struct DashboardResource {
    api: SharedApi,
}

impl DashboardResource {
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for DashboardResource {
    type Model = DashboardResourceModel;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Dashboard
    }

    async fn create(
        &self,
        mut plan: DashboardResourceModel,
    ) -> Result<DashboardResourceModel, ResourceError> {
        let dashboard = plan.to_api_model()?;
        self.api
            .create_dashboard(&dashboard)
            .await
            .map_err(ResourceError::client("create", KIND))?;

        plan.id = Some(dashboard.id);
        tracing::trace!(name = %plan.name, widgets = plan.widgets.len(), "dashboard created");
        Ok(plan)
    }

    async fn read(
        &self,
        state: &DashboardResourceModel,
    ) -> Result<Option<DashboardResourceModel>, ResourceError> {
        let dashboard = self
            .api
            .get_dashboard(&state.service, state.name())
            .await
            .map_err(ResourceError::client("read", KIND))?;

        Ok(dashboard.map(|dashboard| {
            let mut refreshed = DashboardResourceModel::from_api_model(&dashboard);
            // The response body may omit the service.
            if refreshed.service.is_empty() {
                refreshed.service = state.service.clone();
            }
            refreshed
        }))
    }

    async fn update(
        &self,
        mut plan: DashboardResourceModel,
    ) -> Result<DashboardResourceModel, ResourceError> {
        let dashboard = plan.to_api_model()?;
        self.api
            .update_dashboard(&dashboard)
            .await
            .map_err(ResourceError::client("update", KIND))?;

        plan.id = Some(dashboard.id);
        Ok(plan)
    }

    async fn delete(&self, state: &DashboardResourceModel) -> Result<(), ResourceError> {
        self.api
            .delete_dashboard(&state.service, state.name())
            .await
            .map_err(ResourceError::client("delete", KIND))
    }

    async fn import_state(&self, id: &str) -> Result<DashboardResourceModel, ResourceError> {
        let (service, name) = split_import_id(id)?;
        let dashboard = self
            .api
            .get_dashboard(service, name)
            .await
            .map_err(ResourceError::client("read", KIND))?
            .ok_or_else(|| ResourceError::ImportNotFound {
                kind: KIND,
                id: id.to_string(),
            })?;

        let mut state = DashboardResourceModel::from_api_model(&dashboard);
        if state.service.is_empty() {
            state.service = service.to_string();
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::provider::testing::MemoryApi;

    fn plan() -> DashboardResourceModel {
        serde_json::from_value(json!({
            "name": "lambda-health",
            "description": "Lambda overview",
            "service": "default",
            "widgets": [ { "query_id": "lambda-errors", "type": "statistic" } ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let api = Arc::new(MemoryApi::default());
        let resource = DashboardResource::new(api);

        let state = resource.create(plan()).await.unwrap();
        let read = resource.read(&state).await.unwrap().unwrap();
        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn delete_removes_remote_dashboard() {
        let api = Arc::new(MemoryApi::default());
        let resource = DashboardResource::new(api.clone());

        let state = resource.create(plan()).await.unwrap();
        resource.delete(&state).await.unwrap();

        assert!(api.dashboards.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_missing_dashboard_fails() {
        let api = Arc::new(MemoryApi::default());
        let resource = DashboardResource::new(api);

        let err = resource
            .import_state("default/lambda-health")
            .await
            .unwrap_err();
        assert_eq!(err.summary(), "Import Error");
    }
}
