//! Drives a resource through one lifecycle step and keeps local state in
//! step with the remote service.
//!
//! Every function calls the resource first and touches the store only on
//! success. Nothing is written to disk here; the caller decides when to
//! `save`.

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::models::ResourceModel;
use crate::provider::{Resource, ResourceKind};
use crate::store::StateStore;

/// Read and parse a plan file.
pub fn load_plan<M: ResourceModel>(path: &Path) -> Result<M, AppError> {
    let bytes = fs::read(path).map_err(|err| AppError::Plan {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    serde_json::from_slice(&bytes).map_err(|err| AppError::Plan {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

pub async fn create<R: Resource>(
    resource: &R,
    store: &mut StateStore,
    plan: R::Model,
) -> Result<R::Model, AppError> {
    let kind = resource.kind();
    let key = plan.state_key();
    if store.get(kind, &key).is_some() {
        return Err(AppError::AlreadyManaged {
            address: StateStore::address(kind, &key),
        });
    }

    let state = resource.create(plan).await?;
    store.put(kind, &key, &state)?;
    tracing::info!(address = %StateStore::address(kind, &key), "created");
    Ok(state)
}

/// Refresh one resource by state key. Returns `None`, and forgets the
/// resource, when the remote object no longer exists.
pub async fn read<R: Resource>(
    resource: &R,
    store: &mut StateStore,
    key: &str,
) -> Result<Option<R::Model>, AppError> {
    let kind = resource.kind();
    let prior = prior_state::<R>(store, resource, key)?;

    match resource.read(&prior).await? {
        Some(state) => {
            store.put(kind, key, &state)?;
            Ok(Some(state))
        }
        None => {
            tracing::warn!(
                address = %StateStore::address(kind, key),
                "remote object is gone, removing from state"
            );
            store.remove(kind, key);
            Ok(None)
        }
    }
}

/// Replace a managed resource. The plan must keep the service it was
/// created in.
pub async fn update<R: Resource>(
    resource: &R,
    store: &mut StateStore,
    plan: R::Model,
) -> Result<R::Model, AppError> {
    let kind = resource.kind();
    let key = plan.state_key();
    if store.get(kind, &key).is_none() {
        if let Some(existing) = managed_under_other_service(store, kind, &plan) {
            return Err(AppError::ServiceChanged {
                address: StateStore::address(kind, &existing),
                service: plan.service().unwrap_or_default().to_string(),
            });
        }
    }
    prior_state::<R>(store, resource, &key)?;

    let state = resource.update(plan).await?;
    store.put(kind, &key, &state)?;
    tracing::info!(address = %StateStore::address(kind, &key), "updated");
    Ok(state)
}

pub async fn delete<R: Resource>(
    resource: &R,
    store: &mut StateStore,
    key: &str,
) -> Result<(), AppError> {
    let kind = resource.kind();
    let prior = prior_state::<R>(store, resource, key)?;

    resource.delete(&prior).await?;
    store.remove(kind, key);
    tracing::info!(address = %StateStore::address(kind, key), "deleted");
    Ok(())
}

pub async fn import<R: Resource>(
    resource: &R,
    store: &mut StateStore,
    id: &str,
) -> Result<R::Model, AppError> {
    let kind = resource.kind();
    let state = resource.import_state(id).await?;
    let key = state.state_key();
    if store.get(kind, &key).is_some() {
        return Err(AppError::AlreadyManaged {
            address: StateStore::address(kind, &key),
        });
    }

    store.put(kind, &key, &state)?;
    tracing::info!(address = %StateStore::address(kind, &key), "imported");
    Ok(state)
}

fn prior_state<R: Resource>(
    store: &StateStore,
    resource: &R,
    key: &str,
) -> Result<R::Model, AppError> {
    let kind = resource.kind();
    store
        .get_as::<R::Model>(kind, key)?
        .ok_or_else(|| AppError::NotManaged {
            address: StateStore::address(kind, key),
        })
}

/// Key of a tracked resource with the plan's name in a different service.
fn managed_under_other_service<M: ResourceModel>(
    store: &StateStore,
    kind: ResourceKind,
    plan: &M,
) -> Option<String> {
    plan.service()?;
    store
        .keys(kind)
        .find(|key| matches!(key.split_once('/'), Some((_, name)) if name == plan.name()))
        .map(str::to_string)
}
