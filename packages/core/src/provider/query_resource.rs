use async_trait::async_trait;

use super::{Resource, ResourceError, ResourceKind, SharedApi};
use crate::models::{QueryResourceModel, ResourceModel};

const KIND: &str = "query";

pub struct QueryResource {
    api: SharedApi,
}

impl QueryResource {
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for QueryResource {
    type Model = QueryResourceModel;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Query
    }

    async fn create(&self, mut plan: QueryResourceModel) -> Result<QueryResourceModel, ResourceError> {
        let query = plan.to_api_model()?;
        self.api
            .create_query(&query)
            .await
            .map_err(ResourceError::client("create", KIND))?;

        plan.id = Some(query.id);
        tracing::trace!(name = %plan.name, "query created");
        Ok(plan)
    }

    async fn read(
        &self,
        state: &QueryResourceModel,
    ) -> Result<Option<QueryResourceModel>, ResourceError> {
        let query = self
            .api
            .get_query(state.name())
            .await
            .map_err(ResourceError::client("read", KIND))?;

        Ok(query.map(|query| {
            let mut refreshed = QueryResourceModel::from_api_model(&query);
            // The response body may omit the service.
            if refreshed.service.is_empty() {
                refreshed.service = state.service.clone();
            }
            refreshed
        }))
    }

    async fn update(&self, mut plan: QueryResourceModel) -> Result<QueryResourceModel, ResourceError> {
        let query = plan.to_api_model()?;
        self.api
            .update_query(&query)
            .await
            .map_err(ResourceError::client("update", KIND))?;

        plan.id = Some(query.id);
        Ok(plan)
    }

    async fn delete(&self, state: &QueryResourceModel) -> Result<(), ResourceError> {
        self.api
            .delete_query(state.name())
            .await
            .map_err(ResourceError::client("delete", KIND))
    }

    async fn import_state(&self, id: &str) -> Result<QueryResourceModel, ResourceError> {
        let query = self
            .api
            .get_query(id)
            .await
            .map_err(ResourceError::client("read", KIND))?
            .ok_or_else(|| ResourceError::ImportNotFound {
                kind: KIND,
                id: id.to_string(),
            })?;

        Ok(QueryResourceModel::from_api_model(&query))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::provider::testing::MemoryApi;

    fn plan() -> QueryResourceModel {
        serde_json::from_value(json!({
            "name": "lambda-errors",
            "description": "Errors across all lambdas",
            "service": "default",
            "datasets": ["lambda-logs"],
            "filters": [ { "key": "message", "operation": "INCLUDES", "value": "error" } ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_sets_computed_id() {
        let api = Arc::new(MemoryApi::default());
        let resource = QueryResource::new(api.clone());

        let state = resource.create(plan()).await.unwrap();

        assert_eq!(state.id.as_deref(), Some("lambda-errors"));
        assert!(api.queries.lock().unwrap().contains_key("lambda-errors"));
    }

    #[tokio::test]
    async fn read_returns_none_when_remote_is_gone() {
        let api = Arc::new(MemoryApi::default());
        let resource = QueryResource::new(api.clone());

        let state = resource.create(plan()).await.unwrap();
        api.queries.lock().unwrap().clear();

        assert!(resource.read(&state).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn read_picks_up_remote_changes() {
        let api = Arc::new(MemoryApi::default());
        let resource = QueryResource::new(api.clone());

        let state = resource.create(plan()).await.unwrap();
        api.queries
            .lock()
            .unwrap()
            .get_mut("lambda-errors")
            .unwrap()
            .description = "changed in the console".into();

        let refreshed = resource.read(&state).await.unwrap().unwrap();
        assert_eq!(refreshed.description, "changed in the console");
    }

    #[tokio::test]
    async fn failed_create_surfaces_status() {
        let api = Arc::new(MemoryApi::failing(StatusCode::INTERNAL_SERVER_ERROR));
        let resource = QueryResource::new(api);

        let err = resource.create(plan()).await.unwrap_err();
        assert_eq!(err.summary(), "Client Error");
        assert!(err.to_string().starts_with("Unable to create query"));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn invalid_plan_never_reaches_the_api() {
        let api = Arc::new(MemoryApi::default());
        let resource = QueryResource::new(api.clone());

        let mut plan = plan();
        plan.filter_combination = "NAND".into();

        assert!(resource.create(plan).await.is_err());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn import_requires_existing_query() {
        let api = Arc::new(MemoryApi::default());
        let resource = QueryResource::new(api.clone());

        let err = resource.import_state("lambda-errors").await.unwrap_err();
        assert!(matches!(err, ResourceError::ImportNotFound { .. }));

        resource.create(plan()).await.unwrap();
        let imported = resource.import_state("lambda-errors").await.unwrap();
        assert_eq!(imported.name, "lambda-errors");
        assert_eq!(imported.datasets, vec!["lambda-logs".to_string()]);
    }
}
