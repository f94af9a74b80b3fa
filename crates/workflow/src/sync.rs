//! Dual-source playback coordination.
//!
//! The reviewer watches the original and the processed rendition of the
//! same media side by side. Each source buffers independently and pushes
//! progress notices on its own schedule, so the two cursors drift; that
//! drift is never corrected automatically. Alignment happens only on the
//! explicit sync-to-earlier action, which snaps both cursors to the one
//! further behind.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Which of the two media sources a cursor or notice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSide {
    Original,
    Processed,
}

/// A playback progress notice pushed by one source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressNotice {
    pub side: SourceSide,
    pub position: f64,
}

/// The observed state of one playback source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceCursor {
    pub position: f64,
    pub playing: bool,
    pub errored: bool,
}

/// Coordinates the original and processed playback cursors.
#[derive(Debug, Default)]
pub struct DualSourceSynchronizer {
    original: SourceCursor,
    processed: SourceCursor,
}

impl DualSourceSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, side: SourceSide) -> SourceCursor {
        match side {
            SourceSide::Original => self.original,
            SourceSide::Processed => self.processed,
        }
    }

    fn cursor_mut(&mut self, side: SourceSide) -> &mut SourceCursor {
        match side {
            SourceSide::Original => &mut self.original,
            SourceSide::Processed => &mut self.processed,
        }
    }

    /// Record one source's progress. The other cursor is left alone.
    pub fn note_progress(&mut self, side: SourceSide, position: f64) {
        self.cursor_mut(side).position = position;
    }

    /// Drain all pending progress notices without blocking.
    pub fn drain_notices(&mut self, notices: &mut mpsc::Receiver<ProgressNotice>) {
        while let Ok(notice) = notices.try_recv() {
            self.note_progress(notice.side, notice.position);
        }
    }

    pub fn set_playing(&mut self, side: SourceSide, playing: bool) {
        self.cursor_mut(side).playing = playing;
    }

    /// Stop both sources.
    pub fn pause_all(&mut self) {
        self.original.playing = false;
        self.processed.playing = false;
    }

    /// Snap both cursors to the earlier of the two positions.
    ///
    /// Returns the position both now share.
    pub fn sync_to_earlier(&mut self) -> f64 {
        let earlier = self.original.position.min(self.processed.position);
        self.original.position = earlier;
        self.processed.position = earlier;
        earlier
    }

    /// Mark one source as failed and stop it. The other source keeps
    /// playing; the two have no runtime dependency on each other.
    pub fn note_error(&mut self, side: SourceSide) {
        let cursor = self.cursor_mut(side);
        cursor.errored = true;
        cursor.playing = false;
    }

    pub fn clear_error(&mut self, side: SourceSide) {
        self.cursor_mut(side).errored = false;
    }

    /// Absolute distance between the two cursors.
    pub fn drift(&self) -> f64 {
        (self.original.position - self.processed.position).abs()
    }
}
