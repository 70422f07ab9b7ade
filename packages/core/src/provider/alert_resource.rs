use async_trait::async_trait;

use super::{split_import_id, Resource, ResourceError, ResourceKind, SharedApi};
use crate::models::{AlertResourceModel, ResourceModel};

const KIND: &str = "alert";

pub struct AlertResource {
    api: SharedApi,
}

impl AlertResource {
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for AlertResource {
    type Model = AlertResourceModel;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Alert
    }

    async fn create(&self, mut plan: AlertResourceModel) -> Result<AlertResourceModel, ResourceError> {
        let alert = plan.to_api_model()?;
        self.api
            .create_alert(&alert)
            .await
            .map_err(ResourceError::client("create", KIND))?;

        plan.id = Some(alert.id);
        tracing::trace!(name = %plan.name, service = %plan.service, "alert created");
        Ok(plan)
    }

    async fn read(
        &self,
        state: &AlertResourceModel,
    ) -> Result<Option<AlertResourceModel>, ResourceError> {
        let alert = self
            .api
            .get_alert(&state.service, state.name())
            .await
            .map_err(ResourceError::client("read", KIND))?;

        Ok(alert.map(|alert| {
            let mut refreshed = AlertResourceModel::from_api_model(&alert);
            // The response body may omit the service.
            if refreshed.service.is_empty() {
                refreshed.service = state.service.clone();
            }
            refreshed
        }))
    }

    async fn update(&self, mut plan: AlertResourceModel) -> Result<AlertResourceModel, ResourceError> {
        let alert = plan.to_api_model()?;
        self.api
            .update_alert(&alert)
            .await
            .map_err(ResourceError::client("update", KIND))?;

        plan.id = Some(alert.id);
        Ok(plan)
    }

    async fn delete(&self, state: &AlertResourceModel) -> Result<(), ResourceError> {
        self.api
            .delete_alert(&state.service, state.name())
            .await
            .map_err(ResourceError::client("delete", KIND))
    }

    async fn import_state(&self, id: &str) -> Result<AlertResourceModel, ResourceError> {
        let (service, name) = split_import_id(id)?;
        let alert = self
            .api
            .get_alert(service, name)
            .await
            .map_err(ResourceError::client("read", KIND))?
            .ok_or_else(|| ResourceError::ImportNotFound {
                kind: KIND,
                id: id.to_string(),
            })?;

        let mut state = AlertResourceModel::from_api_model(&alert);
        // The response body may omit the service.
        if state.service.is_empty() {
            state.service = service.to_string();
        }
        Ok(state)
    }
}
