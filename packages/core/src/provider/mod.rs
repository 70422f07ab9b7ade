//! Provider and resource lifecycle.
//!
//! The provider turns a [`ProviderConfig`] into a shared API handle and
//! hands it to one [`Resource`] implementation per kind. A resource never
//! keeps state of its own: each lifecycle call takes a plan or a prior
//! state and returns the new state only after the remote call succeeded.

pub mod alert_resource;
pub mod api;
pub mod dashboard_resource;
pub mod error;
pub mod query_resource;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::client::{Client, ClientConfig};
use crate::models::ResourceModel;

pub use alert_resource::AlertResource;
pub use api::BaselimeApi;
pub use dashboard_resource::DashboardResource;
pub use error::ResourceError;
pub use query_resource::QueryResource;

pub const PROVIDER_TYPE_NAME: &str = "baselime";

/// Shared handle passed to every resource.
pub type SharedApi = Arc<dyn BaselimeApi + Send + Sync>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum ResourceKind {
    #[serde(rename = "baselime_query")]
    Query,
    #[serde(rename = "baselime_alert")]
    Alert,
    #[serde(rename = "baselime_dashboard")]
    Dashboard,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Query,
        ResourceKind::Alert,
        ResourceKind::Dashboard,
    ];

    /// Short name used in diagnostics, e.g. `query`.
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Query => "query",
            ResourceKind::Alert => "alert",
            ResourceKind::Dashboard => "dashboard",
        }
    }

    /// Fully qualified resource type name, e.g. `baselime_query`.
    pub fn type_name(&self) -> String {
        format!("{}_{}", PROVIDER_TYPE_NAME, self.noun())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// Provider-level settings. Only `api_key` is required.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_host: Option<String>,
    pub api_key: String,
    #[serde(default)]
    pub api_scheme: Option<String>,
    /// Log the body of rejected API responses.
    #[serde(default)]
    pub debug: bool,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_host", &self.api_host)
            .field("api_key", &"<redacted>")
            .field("api_scheme", &self.api_scheme)
            .field("debug", &self.debug)
            .finish()
    }
}

pub struct Provider {
    version: String,
}

impl Provider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// Resource types this provider manages.
    pub fn resources(&self) -> Vec<String> {
        ResourceKind::ALL.iter().map(ResourceKind::type_name).collect()
    }

    /// Build the shared client from provider settings.
    pub fn configure(&self, config: &ProviderConfig) -> Result<ProviderData, ResourceError> {
        if config.api_key.trim().is_empty() {
            return Err(ResourceError::invalid_plan("provider", "api_key is required"));
        }

        let client_config = ClientConfig::default().merge(ClientConfig {
            version: self.version.clone(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone().unwrap_or_default(),
            api_scheme: config.api_scheme.clone().unwrap_or_default(),
            debug: config.debug,
        });

        tracing::debug!(
            host = %client_config.api_host,
            scheme = %client_config.api_scheme,
            "configuring Baselime client"
        );

        let client = Client::new(client_config).map_err(ResourceError::Configure)?;
        Ok(ProviderData::new(Arc::new(client)))
    }
}

/// What `configure` hands to resources.
#[derive(Clone)]
pub struct ProviderData {
    api: SharedApi,
}

impl ProviderData {
    pub fn new(api: SharedApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> SharedApi {
        self.api.clone()
    }

    pub fn query_resource(&self) -> QueryResource {
        QueryResource::new(self.api())
    }

    pub fn alert_resource(&self) -> AlertResource {
        AlertResource::new(self.api())
    }

    pub fn dashboard_resource(&self) -> DashboardResource {
        DashboardResource::new(self.api())
    }
}

/// CRUD lifecycle for one resource kind.
#[async_trait]
pub trait Resource: Send + Sync {
    type Model: ResourceModel;

    fn kind(&self) -> ResourceKind;

    /// Create the remote object and return the resulting state.
    async fn create(&self, plan: Self::Model) -> Result<Self::Model, ResourceError>;

    /// Refresh state from the remote object. `None` means it no longer exists.
    async fn read(&self, state: &Self::Model) -> Result<Option<Self::Model>, ResourceError>;

    /// Replace the remote object wholesale and return the resulting state.
    async fn update(&self, plan: Self::Model) -> Result<Self::Model, ResourceError>;

    async fn delete(&self, state: &Self::Model) -> Result<(), ResourceError>;

    /// Adopt an existing remote object by its import identifier.
    async fn import_state(&self, id: &str) -> Result<Self::Model, ResourceError>;
}

/// Split a `<service>/<id>` import identifier.
pub(crate) fn split_import_id<'a>(
    id: &'a str,
) -> Result<(&'a str, &'a str), ResourceError> {
    match id.split_once('/') {
        Some((service, name)) if !service.is_empty() && !name.is_empty() => Ok((service, name)),
        _ => Err(ResourceError::InvalidImportId {
            id: id.to_string(),
            expected: "<service>/<name>",
        }),
    }
}
