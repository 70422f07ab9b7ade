//! In-memory [`BaselimeApi`] used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::BaselimeApi;
use crate::client::{Alert, ClientError, Dashboard, Query};

/// Stores objects by `(service, id)`. When `fail_with` is set every
/// call fails with that status and nothing is stored.
#[derive(Default)]
pub(crate) struct MemoryApi {
    pub queries: Mutex<HashMap<String, Query>>,
    pub alerts: Mutex<HashMap<(String, String), Alert>>,
    pub dashboards: Mutex<HashMap<(String, String), Dashboard>>,
    pub fail_with: Option<StatusCode>,
    pub calls: Mutex<Vec<String>>,
}

impl MemoryApi {
    pub fn failing(status: StatusCode) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::default()
        }
    }

    fn record(&self, operation: &'static str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(operation.to_string());
        match self.fail_with {
            Some(status) => Err(ClientError::Status { operation, status }),
            None => Ok(()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaselimeApi for MemoryApi {
    async fn create_query(&self, query: &Query) -> Result<(), ClientError> {
        self.record("create query")?;
        self.queries
            .lock()
            .unwrap()
            .insert(query.id.clone(), query.clone());
        Ok(())
    }

    async fn get_query(&self, query_id: &str) -> Result<Option<Query>, ClientError> {
        self.record("get query")?;
        Ok(self.queries.lock().unwrap().get(query_id).cloned())
    }

    async fn update_query(&self, query: &Query) -> Result<(), ClientError> {
        self.record("update query")?;
        self.queries
            .lock()
            .unwrap()
            .insert(query.id.clone(), query.clone());
        Ok(())
    }

    async fn delete_query(&self, query_id: &str) -> Result<(), ClientError> {
        self.record("delete query")?;
        self.queries.lock().unwrap().remove(query_id);
        Ok(())
    }

    async fn create_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        self.record("create alert")?;
        self.alerts
            .lock()
            .unwrap()
            .insert((alert.service.clone(), alert.id.clone()), alert.clone());
        Ok(())
    }

    async fn get_alert(
        &self,
        service: &str,
        alert_id: &str,
    ) -> Result<Option<Alert>, ClientError> {
        self.record("get alert")?;
        Ok(self
            .alerts
            .lock()
            .unwrap()
            .get(&(service.to_string(), alert_id.to_string()))
            .cloned())
    }

    async fn update_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        self.record("update alert")?;
        self.alerts
            .lock()
            .unwrap()
            .insert((alert.service.clone(), alert.id.clone()), alert.clone());
        Ok(())
    }

    async fn delete_alert(&self, service: &str, alert_id: &str) -> Result<(), ClientError> {
        self.record("delete alert")?;
        self.alerts
            .lock()
            .unwrap()
            .remove(&(service.to_string(), alert_id.to_string()));
        Ok(())
    }

    async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        self.record("create dashboard")?;
        self.dashboards.lock().unwrap().insert(
            (dashboard.service.clone(), dashboard.id.clone()),
            dashboard.clone(),
        );
        Ok(())
    }

    async fn get_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<Option<Dashboard>, ClientError> {
        self.record("get dashboard")?;
        Ok(self
            .dashboards
            .lock()
            .unwrap()
            .get(&(service.to_string(), dashboard_id.to_string()))
            .cloned())
    }

    async fn update_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        self.record("update dashboard")?;
        self.dashboards.lock().unwrap().insert(
            (dashboard.service.clone(), dashboard.id.clone()),
            dashboard.clone(),
        );
        Ok(())
    }

    async fn delete_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<(), ClientError> {
        self.record("delete dashboard")?;
        self.dashboards
            .lock()
            .unwrap()
            .remove(&(service.to_string(), dashboard_id.to_string()));
        Ok(())
    }
}
