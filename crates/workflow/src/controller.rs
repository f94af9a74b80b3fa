//! The review workflow controller.
//!
//! Orchestrates the fetch-next / skip / reject / save / approve cycle over
//! the collaborator seams, owning the current [`ReviewRecordState`], the
//! record cache, and the in-flight submission guard.
//!
//! Phases: `Idle → Loading → Ready → {Saving | Approving} → Ready | Exhausted`.
//! A fetch failure keeps the prior record current. Approve persists the
//! annotation, runs the best-effort remote anonymization audit (failure =
//! warning, never a gate), and advances. Completions that arrive after the
//! reviewer navigated away from the record are discarded by identity check.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use medanon_core::segment::LABEL_OUT_OF_SCOPE;
use medanon_core::{DbId, ReviewRecord, ValidationProgress};

use crate::cache::RecordCache;
use crate::collaborators::{
    AnnotationSink, AnonymizationAuditor, RecordSource, ReviewScope, SegmentValidationEvent,
};
use crate::error::WorkflowError;
use crate::state::{Derived, EditEvent, ReviewRecordState};

/// Tuning and scope for one controller instance.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub scope: ReviewScope,
    /// Label marking segments that require reviewer sign-off.
    pub out_of_scope_label: String,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            scope: ReviewScope::All,
            out_of_scope_label: LABEL_OUT_OF_SCOPE.to_string(),
            cache_ttl: Duration::from_secs(300),
            cache_capacity: 32,
        }
    }
}

/// Where the controller currently is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    Idle,
    Loading,
    Ready,
    Saving,
    Approving,
    /// The record source has no further pending items.
    Exhausted,
}

/// Read-only projection consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowProjection {
    pub phase: WorkflowPhase,
    pub record: Option<ReviewRecord>,
    pub dirty: bool,
    pub can_approve: bool,
    pub approval_block_reason: Option<String>,
    pub validation_progress: ValidationProgress,
    pub last_warning: Option<String>,
    pub last_error: Option<String>,
}

/// Outcome of an [`approve`](ReviewWorkflowController::approve) call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// Approval submitted and the queue advanced. Carries the warning
    /// text when the remote audit failed.
    Approved { warning: Option<String> },
    /// The gate blocked approval; nothing was submitted.
    Blocked(String),
    /// Another save/approve was already in flight; this call was a no-op.
    Ignored,
}

/// Outcome of a [`save`](ReviewWorkflowController::save) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Another save/approve was already in flight; this call was a no-op.
    Ignored,
}

#[derive(Debug)]
struct ControllerInner {
    phase: WorkflowPhase,
    state: Option<ReviewRecordState>,
    cache: RecordCache,
    last_warning: Option<String>,
    last_error: Option<String>,
}

/// Orchestrates one reviewer's pass over the pending-record queue.
pub struct ReviewWorkflowController {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn AnnotationSink>,
    auditor: Arc<dyn AnonymizationAuditor>,
    config: WorkflowConfig,
    inner: Mutex<ControllerInner>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission path exits, on success
/// and on every early return alike.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ReviewWorkflowController {
    pub fn new(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn AnnotationSink>,
        auditor: Arc<dyn AnonymizationAuditor>,
        config: WorkflowConfig,
    ) -> Self {
        let cache = RecordCache::new(config.cache_ttl, config.cache_capacity);
        Self {
            source,
            sink,
            auditor,
            config,
            inner: Mutex::new(ControllerInner {
                phase: WorkflowPhase::Idle,
                state: None,
                cache,
                last_warning: None,
                last_error: None,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Load the next pending record, replacing the current one.
    ///
    /// On fetch failure the controller stays on the prior record and the
    /// error is surfaced both as the return value and in the projection.
    pub async fn fetch_next(&self) -> Result<(), WorkflowError> {
        {
            let mut inner = self.lock();
            inner.phase = WorkflowPhase::Loading;
            inner.last_error = None;
            inner.last_warning = None;
        }

        match self.source.fetch_next(self.config.scope).await {
            Ok(Some(record)) => {
                let mut inner = self.lock();
                debug!(record_id = record.id, media_kind = %record.media_kind, "loaded next record");
                inner.cache.insert(record.clone());
                inner.state = Some(ReviewRecordState::load(
                    record,
                    &self.config.out_of_scope_label,
                ));
                inner.phase = WorkflowPhase::Ready;
                Ok(())
            }
            Ok(None) => {
                let mut inner = self.lock();
                info!("review queue exhausted");
                inner.state = None;
                inner.phase = WorkflowPhase::Exhausted;
                Ok(())
            }
            Err(failure) => {
                let mut inner = self.lock();
                warn!(error = %failure, "fetch failed; staying on current record");
                inner.phase = if inner.state.is_some() {
                    WorkflowPhase::Ready
                } else {
                    WorkflowPhase::Idle
                };
                inner.last_error = Some(failure.to_string());
                Err(WorkflowError::Fetch(failure))
            }
        }
    }

    /// Put the current record aside and advance. No persistence side
    /// effect beyond advancing.
    pub async fn skip(&self) -> Result<(), WorkflowError> {
        debug!("skip: advancing without persistence");
        self.fetch_next().await
    }

    /// Send the current record back and advance. Like skip, advancing is
    /// the only local side effect; any rejected-status bookkeeping belongs
    /// to the persistence collaborator.
    pub async fn reject(&self) -> Result<(), WorkflowError> {
        debug!("reject: advancing without persistence");
        self.fetch_next().await
    }

    /// Persist the current annotation and re-capture the dirty baseline.
    /// Does not advance.
    pub async fn save(&self) -> Result<SaveOutcome, WorkflowError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("save ignored: a submission is already in flight");
            return Ok(SaveOutcome::Ignored);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let (record_id, patient, free_text, media_kind) = {
            let mut inner = self.lock();
            let state = match inner.state.as_ref() {
                Some(state) => state,
                None => return Err(WorkflowError::NoCurrentRecord),
            };
            let record = state.record();
            let data = (
                record.id,
                record.patient.clone(),
                record.free_text.clone(),
                record.media_kind,
            );
            inner.phase = WorkflowPhase::Saving;
            data
        };

        let result = self
            .sink
            .persist(record_id, &patient, &free_text, media_kind)
            .await;

        let mut inner = self.lock();
        let still_current = inner
            .state
            .as_ref()
            .is_some_and(|s| s.record().id == record_id);

        match result {
            Ok(()) => {
                if still_current {
                    inner.phase = WorkflowPhase::Ready;
                    if let Some(state) = inner.state.as_mut() {
                        state.mark_saved();
                    }
                    debug!(record_id, "annotation saved; baseline recaptured");
                } else {
                    debug!(record_id, "discarding save completion for abandoned record");
                }
                Ok(SaveOutcome::Saved)
            }
            Err(failure) => {
                if still_current {
                    inner.phase = WorkflowPhase::Ready;
                }
                warn!(record_id, error = %failure, "saving annotation failed");
                inner.last_error = Some(failure.to_string());
                Err(WorkflowError::Persist(failure))
            }
        }
    }

    /// Approve the current record and advance.
    ///
    /// The annotation persist is a hard step: its failure surfaces as an
    /// error and the record stays current. The subsequent remote
    /// anonymization audit is best-effort: its failure becomes a warning
    /// and the queue advances regardless.
    pub async fn approve(&self) -> Result<ApproveOutcome, WorkflowError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("approve ignored: a submission is already in flight");
            return Ok(ApproveOutcome::Ignored);
        }
        let guard = InFlightGuard(&self.in_flight);

        let (record_id, patient, free_text, media_kind) = {
            let mut inner = self.lock();
            let state = match inner.state.as_ref() {
                Some(state) => state,
                None => return Err(WorkflowError::NoCurrentRecord),
            };
            if let Some(reason) = state.approval_block_reason() {
                debug!(record_id = state.record().id, %reason, "approval blocked");
                return Ok(ApproveOutcome::Blocked(reason));
            }
            let record = state.record();
            let data = (
                record.id,
                record.patient.clone(),
                record.free_text.clone(),
                record.media_kind,
            );
            inner.phase = WorkflowPhase::Approving;
            data
        };

        if let Err(failure) = self
            .sink
            .persist(record_id, &patient, &free_text, media_kind)
            .await
        {
            let mut inner = self.lock();
            if inner
                .state
                .as_ref()
                .is_some_and(|s| s.record().id == record_id)
            {
                inner.phase = WorkflowPhase::Ready;
            }
            warn!(record_id, error = %failure, "approval persist failed; staying on record");
            inner.last_error = Some(failure.to_string());
            return Err(WorkflowError::Persist(failure));
        }

        let warning = match self.auditor.validate(record_id, &patient).await {
            Ok(()) => None,
            Err(failure) => {
                let message = format!("remote anonymization validation failed: {failure}");
                warn!(record_id, error = %failure, "remote validation failed; advancing anyway");
                self.lock().last_warning = Some(message.clone());
                Some(message)
            }
        };

        let still_current = {
            let mut inner = self.lock();
            inner.cache.remove(record_id);
            inner
                .state
                .as_ref()
                .is_some_and(|s| s.record().id == record_id)
        };
        // The submission is finished; the advance runs unguarded.
        drop(guard);

        if !still_current {
            debug!(record_id, "discarding approve completion for abandoned record");
            return Ok(ApproveOutcome::Approved { warning });
        }

        self.fetch_next().await?;
        let outcome = ApproveOutcome::Approved {
            warning: warning.clone(),
        };
        // fetch_next cleared the transient flags; keep the audit warning
        // visible on the freshly loaded record.
        if let Some(message) = warning {
            self.lock().last_warning = Some(message);
        }
        Ok(outcome)
    }

    /// Apply one reviewer edit to the current record.
    pub fn apply_edit(&self, event: EditEvent) -> Result<Derived, WorkflowError> {
        let mut inner = self.lock();
        let state = inner.state.as_mut().ok_or(WorkflowError::NoCurrentRecord)?;
        Ok(state.apply(event))
    }

    /// Consume a segment validation event stream until its completion
    /// marker (or until the sender goes away). Events for segments the
    /// current record does not contain are ignored.
    pub async fn ingest_segment_events(&self, mut events: mpsc::Receiver<SegmentValidationEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                SegmentValidationEvent::Validated {
                    segment_id,
                    validated,
                } => {
                    let mut inner = self.lock();
                    if let Some(state) = inner.state.as_mut() {
                        state.apply(EditEvent::SegmentValidated {
                            segment_id,
                            validated,
                        });
                    }
                }
                SegmentValidationEvent::Completed => {
                    debug!("segment validation stream completed");
                    break;
                }
            }
        }
    }

    /// The read-only view consumed by the presentation layer.
    pub fn projection(&self) -> WorkflowProjection {
        let inner = self.lock();
        match inner.state.as_ref() {
            Some(state) => WorkflowProjection {
                phase: inner.phase,
                record: Some(state.record().clone()),
                dirty: state.dirty(),
                can_approve: state.can_approve(),
                approval_block_reason: state.approval_block_reason(),
                validation_progress: state.progress(),
                last_warning: inner.last_warning.clone(),
                last_error: inner.last_error.clone(),
            },
            None => WorkflowProjection {
                phase: inner.phase,
                record: None,
                dirty: false,
                can_approve: false,
                approval_block_reason: None,
                validation_progress: ValidationProgress::default(),
                last_warning: inner.last_warning.clone(),
                last_error: inner.last_error.clone(),
            },
        }
    }

    /// Look up a previously fetched record still held by the cache.
    pub fn cached(&self, id: DbId) -> Option<ReviewRecord> {
        self.lock().cache.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        // Never held across an await.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
