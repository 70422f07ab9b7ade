//! Configuration models
//!
//! These are the records a user writes in a plan and the records kept in
//! local state. Each one translates field-by-field to and from its API
//! model in [`crate::client`]. The remote `id` is always the configured
//! `name`.

pub mod alert;
pub mod dashboard;
pub mod query;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::provider::ResourceError;

pub use alert::{AlertChannel, AlertResourceModel, AlertThreshold};
pub use dashboard::{DashboardResourceModel, DashboardWidget};
pub use query::{QueryCalculation, QueryFilter, QueryGroupBy, QueryOrderBy, QueryResourceModel, SearchNeedle};

pub trait ResourceModel: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Api;

    /// Name of the resource, used as the remote id.
    fn name(&self) -> &str;

    /// Service the remote object is scoped to, for kinds whose API paths
    /// include one.
    fn service(&self) -> Option<&str> {
        None
    }

    /// Key in local state: `<name>`, or `<service>/<name>` for service-scoped
    /// kinds. This is also the import identifier.
    fn state_key(&self) -> String {
        match self.service() {
            Some(service) => format!("{}/{}", service, self.name()),
            None => self.name().to_string(),
        }
    }

    /// Validate the model and build the request body for the API.
    fn to_api_model(&self) -> Result<Self::Api, ResourceError>;

    /// Rebuild a model from what the API returned.
    fn from_api_model(api: &Self::Api) -> Self;
}

pub(crate) fn require_non_empty(
    kind: &'static str,
    field: &str,
    value: &str,
) -> Result<(), ResourceError> {
    if value.trim().is_empty() {
        return Err(ResourceError::invalid_plan(
            kind,
            format!("{} must not be empty", field),
        ));
    }
    Ok(())
}

/// Empty strings from the API map to unset optional attributes.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Deserialize an optional string, treating `""` as unset. The API cannot
/// tell an empty string from an absent one.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|value| !value.is_empty()))
}
