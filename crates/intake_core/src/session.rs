//! One user session: registry, workflow controller and the store behind them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::domain::{Classification, NewRequestDraft, Request, RequestId, RequestStatus};
use storage::RequestStore;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    export::{CsvExport, ExportError},
    registry::{CancelOutcome, Registry, RegistryError, RequestFilter, StatusChange},
    validation::validate_submission,
    workflow::{SubmitError, WorkflowController},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The in-memory change stands but may not have reached the store.
    #[error("change applied but not saved: {0:#}")]
    Storage(anyhow::Error),
}

impl SessionError {
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            SessionError::Submit(submit) => submit.validation_messages(),
            _ => None,
        }
    }
}

pub struct IntakeSession {
    store: Arc<dyn RequestStore>,
    registry: Registry,
    workflow: WorkflowController,
    /// Set when the stored list could not be read; the store is then never seeded.
    load_failed: bool,
    /// Set while the store is behind the registry after a failed save.
    dirty: bool,
}

impl IntakeSession {
    /// Loads the stored list. A failed load starts an empty registry rather
    /// than failing the session.
    pub async fn open(store: Arc<dyn RequestStore>) -> Self {
        let (registry, load_failed) = match store.load().await {
            Ok(requests) => {
                info!(store = %store.describe(), count = requests.len(), "loaded requests");
                (Registry::from_requests(requests), false)
            }
            Err(error) => {
                warn!(
                    store = %store.describe(),
                    error = ?error,
                    "failed to load requests; starting with an empty registry"
                );
                (Registry::new(), true)
            }
        };

        Self {
            store,
            registry,
            workflow: WorkflowController::new(),
            load_failed,
            dirty: false,
        }
    }

    /// Whether the stored list was unreadable when the session opened.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Whether the last save failed and the store still holds older data.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn workflow(&self) -> &WorkflowController {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut WorkflowController {
        &mut self.workflow
    }

    /// Submits `draft` through the workflow controller's current selection.
    pub async fn submit(&mut self, draft: &NewRequestDraft) -> Result<Request, SessionError> {
        let request = self.workflow.submit(&mut self.registry, draft)?;
        self.after_insert(&request).await?;
        Ok(request)
    }

    /// Submits the form fields held by the workflow controller.
    pub async fn submit_form(&mut self) -> Result<Request, SessionError> {
        let request = self.workflow.submit_form(&mut self.registry)?;
        self.after_insert(&request).await?;
        Ok(request)
    }

    /// Direct submission where the classification arrives with the form.
    pub async fn submit_classified(
        &mut self,
        classification: &Classification,
        draft: &NewRequestDraft,
    ) -> Result<Request, SessionError> {
        let validated =
            validate_submission(classification, draft).map_err(SubmitError::Validation)?;
        let request = validated.into_request(self.registry.next_id());
        self.registry.insert(request.clone())?;
        self.after_insert(&request).await?;
        Ok(request)
    }

    pub async fn set_status(
        &mut self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<StatusChange, SessionError> {
        let change = self.registry.set_status(id, status)?;
        if change.changed() {
            info!(request_id = %id, from = %change.previous, to = %change.current, "status changed");
        }
        if change.changed() || self.dirty {
            self.persist().await?;
        }
        Ok(change)
    }

    pub async fn cancel(&mut self, id: RequestId) -> Result<CancelOutcome, SessionError> {
        let outcome = self.registry.cancel(id)?;
        if let CancelOutcome::Cancelled { previous } = outcome {
            info!(request_id = %id, from = %previous, "request cancelled");
        }
        if outcome != CancelOutcome::AlreadyCancelled || self.dirty {
            self.persist().await?;
        }
        Ok(outcome)
    }

    pub fn filter(&self, filter: &RequestFilter) -> Vec<&Request> {
        self.registry.filter(filter)
    }

    pub fn export(
        &self,
        filter: &RequestFilter,
        prefix: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<CsvExport>, SessionError> {
        let selected = self.registry.filter(filter);
        Ok(CsvExport::build(&selected, prefix, at)?)
    }

    /// Fills an empty registry with `samples`; returns whether anything was added.
    /// An unreadable store is left alone so its contents are not overwritten.
    pub async fn seed_if_empty(&mut self, samples: Vec<Request>) -> Result<bool, SessionError> {
        if self.load_failed {
            warn!(store = %self.store.describe(), "store could not be read; skipping sample data");
            return Ok(false);
        }
        if !self.registry.is_empty() {
            return Ok(false);
        }
        // Insert oldest first so the stored order stays newest first.
        for request in samples.into_iter().rev() {
            self.registry.insert(request)?;
        }
        info!(count = self.registry.len(), "seeded sample requests");
        self.persist().await?;
        Ok(true)
    }

    async fn after_insert(&mut self, request: &Request) -> Result<(), SessionError> {
        info!(
            request_id = %request.id,
            campus = %request.campus,
            category = %request.main_category,
            priority = request.is_priority,
            "request submitted"
        );
        self.persist().await
    }

    async fn persist(&mut self) -> Result<(), SessionError> {
        match self.store.save(self.registry.requests()).await {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(source) => {
                self.dirty = true;
                error!(
                    store = %self.store.describe(),
                    error = ?source,
                    "failed to save requests"
                );
                Err(SessionError::Storage(source))
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
