use crate::client::RemoteTaskService;
use crate::error::{DueUpdateError, StoreError};
use crate::logging::redact_user_text_for_log;
use crate::model::{DueUpdateRequest, ResolvedDueFields};
use crate::storage::TaskStore;

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub const SUCCESS_TASK_DUE_STRING_SET: &str = "Due date set";

/// Result of a due-string update that reached the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueUpdated {
    pub task_id: Uuid,
    pub fields: ResolvedDueFields,
    pub message: String,
}

/// Sends a due-string to the remote service and writes back what it resolved.
#[derive(Clone)]
pub struct DueReconciler {
    service: Arc<dyn RemoteTaskService>,
    store: Arc<dyn TaskStore>,
}

impl DueReconciler {
    pub fn new(service: Arc<dyn RemoteTaskService>, store: Arc<dyn TaskStore>) -> Self {
        Self { service, store }
    }

    /// Updates the due date of `task_id` from a (normalized) due-string.
    ///
    /// The local record receives the service's resolved due-date, due-datetime,
    /// recurrence flag and deadline in one write, clears included. On any service
    /// failure nothing local changes. A task deleted locally before the response
    /// lands yields [`DueUpdateError::TaskNotFound`] and no record is created.
    pub async fn set_task_due_string(
        &self,
        task_id: Uuid,
        due_string: &str,
    ) -> Result<DueUpdated, DueUpdateError> {
        let task = on_store(&self.store, move |store| store.get(task_id))
            .await?
            .ok_or(DueUpdateError::TaskNotFound(task_id))?;

        info!(
            %task_id,
            due_string = %redact_user_text_for_log(due_string),
            "setting due string"
        );

        let request = DueUpdateRequest::from_text(due_string);
        let fields = match self.service.update_due(&task.remote_id, &request).await {
            Ok(fields) => fields,
            Err(e) => {
                warn!(%task_id, retryable = e.is_retryable(), "due update failed: {}", e);
                return Err(e.into());
            }
        };

        let written = {
            let fields = fields.clone();
            on_store(&self.store, move |store| store.write_due_fields(task_id, &fields)).await?
        };
        if !written {
            warn!(%task_id, "task deleted while its due update was in flight");
            return Err(DueUpdateError::TaskNotFound(task_id));
        }

        if fields.is_cleared() {
            info!(%task_id, "due date cleared");
        } else {
            info!(%task_id, resolved = %fields.describe(), "due date stored");
        }
        Ok(DueUpdated {
            task_id,
            message: format!("{}: {}", SUCCESS_TASK_DUE_STRING_SET, fields.describe()),
            fields,
        })
    }
}

// Store calls may block on file locks and disk, so they run off the async workers.
async fn on_store<T, F>(store: &Arc<dyn TaskStore>, f: F) -> Result<T, StoreError>
where
    T: Send + 'static,
    F: FnOnce(&dyn TaskStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref())).await?
}
