//! Shared mock collaborators for workflow integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use medanon_core::segment::Segment;
use medanon_core::{DbId, MediaKind, PatientFields, ReviewRecord};
use medanon_workflow::{
    AnnotationSink, AnonymizationAuditor, RecordSource, RemoteFailure, ReviewScope,
    ReviewWorkflowController, WorkflowConfig,
};

/// Record source scripted with a fixed queue. `fail_once` makes the next
/// call fail instead of popping.
pub struct ScriptedSource {
    queue: Mutex<VecDeque<ReviewRecord>>,
    fail_next: AtomicBool,
    pub calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(records: Vec<ReviewRecord>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(records.into()),
            fail_next: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn fail_once(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    async fn fetch_next(&self, _scope: ReviewScope) -> Result<Option<ReviewRecord>, RemoteFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RemoteFailure::new("record source offline"));
        }
        Ok(self.queue.lock().unwrap().pop_front())
    }
}

/// Annotation sink that records calls. `fail_once` fails the next call;
/// `hold` makes calls block until [`release`](RecordingSink::release).
pub struct RecordingSink {
    pub calls: AtomicUsize,
    fail_next: AtomicBool,
    hold: AtomicBool,
    gate: Semaphore,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
            hold: AtomicBool::new(false),
            gate: Semaphore::new(0),
        })
    }

    pub fn fail_once(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Make subsequent calls block until released.
    pub fn hold(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Let one held call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl AnnotationSink for RecordingSink {
    async fn persist(
        &self,
        _record_id: DbId,
        _patient: &PatientFields,
        _free_text: &str,
        _media_kind: MediaKind,
    ) -> Result<(), RemoteFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hold.load(Ordering::SeqCst) {
            let permit = self.gate.acquire().await.unwrap();
            permit.forget();
        }
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RemoteFailure::new("persist rejected"));
        }
        Ok(())
    }
}

/// Remote anonymization auditor that records calls; `fail_once` fails the
/// next call.
pub struct RecordingAuditor {
    pub calls: AtomicUsize,
    fail_next: AtomicBool,
}

impl RecordingAuditor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        })
    }

    pub fn fail_once(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AnonymizationAuditor for RecordingAuditor {
    async fn validate(
        &self,
        _record_id: DbId,
        _patient: &PatientFields,
    ) -> Result<(), RemoteFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(RemoteFailure::new("audit endpoint unreachable"));
        }
        Ok(())
    }
}

/// A document record with legal patient fields.
pub fn document_record(id: DbId) -> ReviewRecord {
    let mut record = ReviewRecord::new(id, MediaKind::Document);
    record.patient.first_name = "John".into();
    record.patient.last_name = "Doe".into();
    record.patient.date_of_birth = Some("1994-03-21".into());
    record.patient.examination_date = Some("2025-10-09".into());
    record
}

/// A video record with legal patient fields and two unvalidated
/// "outside" segments.
pub fn video_record(id: DbId) -> ReviewRecord {
    let mut record = document_record(id);
    record.media_kind = MediaKind::Video;
    record.segments = vec![
        Segment::new(10, "outside", 0.0, 2.0).unwrap(),
        Segment::new(11, "outside", 5.0, 9.0).unwrap(),
    ];
    record
}

pub struct Harness {
    pub controller: Arc<ReviewWorkflowController>,
    pub source: Arc<ScriptedSource>,
    pub sink: Arc<RecordingSink>,
    pub auditor: Arc<RecordingAuditor>,
}

/// Build a controller wired to scripted mocks over `records`.
pub fn harness(records: Vec<ReviewRecord>) -> Harness {
    let source = ScriptedSource::new(records);
    let sink = RecordingSink::new();
    let auditor = RecordingAuditor::new();
    let controller = Arc::new(ReviewWorkflowController::new(
        source.clone(),
        sink.clone(),
        auditor.clone(),
        WorkflowConfig::default(),
    ));
    Harness {
        controller,
        source,
        sink,
        auditor,
    }
}

/// Spin until `condition` holds, yielding to let spawned tasks run.
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..1000 {
        if condition() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached after 1000 yields");
}
