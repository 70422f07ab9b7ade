//! The seam between resources and the HTTP client.
//!
//! Resources talk to `dyn BaselimeApi` so they can be exercised without a
//! network; [`Client`] is the production implementation.

use async_trait::async_trait;

use crate::client::{Alert, Client, ClientError, Dashboard, Query};

#[async_trait]
pub trait BaselimeApi {
    async fn create_query(&self, query: &Query) -> Result<(), ClientError>;
    async fn get_query(&self, query_id: &str) -> Result<Option<Query>, ClientError>;
    async fn update_query(&self, query: &Query) -> Result<(), ClientError>;
    async fn delete_query(&self, query_id: &str) -> Result<(), ClientError>;

    async fn create_alert(&self, alert: &Alert) -> Result<(), ClientError>;
    async fn get_alert(&self, service: &str, alert_id: &str)
        -> Result<Option<Alert>, ClientError>;
    async fn update_alert(&self, alert: &Alert) -> Result<(), ClientError>;
    async fn delete_alert(&self, service: &str, alert_id: &str) -> Result<(), ClientError>;

    async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError>;
    async fn get_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<Option<Dashboard>, ClientError>;
    async fn update_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError>;
    async fn delete_dashboard(&self, service: &str, dashboard_id: &str)
        -> Result<(), ClientError>;
}

#[async_trait]
impl BaselimeApi for Client {
    async fn create_query(&self, query: &Query) -> Result<(), ClientError> {
        Client::create_query(self, query).await
    }

    async fn get_query(&self, query_id: &str) -> Result<Option<Query>, ClientError> {
        Client::get_query(self, query_id).await
    }

    async fn update_query(&self, query: &Query) -> Result<(), ClientError> {
        Client::update_query(self, query).await
    }

    async fn delete_query(&self, query_id: &str) -> Result<(), ClientError> {
        Client::delete_query(self, query_id).await
    }

    async fn create_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        Client::create_alert(self, alert).await
    }

    async fn get_alert(
        &self,
        service: &str,
        alert_id: &str,
    ) -> Result<Option<Alert>, ClientError> {
        Client::get_alert(self, service, alert_id).await
    }

    async fn update_alert(&self, alert: &Alert) -> Result<(), ClientError> {
        Client::update_alert(self, alert).await
    }

    async fn delete_alert(&self, service: &str, alert_id: &str) -> Result<(), ClientError> {
        Client::delete_alert(self, service, alert_id).await
    }

    async fn create_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        Client::create_dashboard(self, dashboard).await
    }

    async fn get_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<Option<Dashboard>, ClientError> {
        Client::get_dashboard(self, service, dashboard_id).await
    }

    async fn update_dashboard(&self, dashboard: &Dashboard) -> Result<(), ClientError> {
        Client::update_dashboard(self, dashboard).await
    }

    async fn delete_dashboard(
        &self,
        service: &str,
        dashboard_id: &str,
    ) -> Result<(), ClientError> {
        Client::delete_dashboard(self, service, dashboard_id).await
    }
}
