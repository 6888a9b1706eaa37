use crate::control::{CursorState, DirectionPad, FocusTracker};
use crate::error::StoreError;
use crate::store::LabelledExampleStore;
use crate::streams::FeatureSource;
use crate::tasks::trace::{SessionTrace, TickReport};
use cpu_time::ThreadTime;
use std::sync::mpsc::Sender;

/// Drives one classification session tick by tick: pull a frame, predict
/// its label, steer the cursor, update the focus zoom.
///
/// Scheduling is explicit and owned by the caller: one `tick` is one
/// frame, `run` is the whole session, and nothing re-enters.
pub struct ControlLoop {
    store: LabelledExampleStore,
    source: Box<dyn FeatureSource>,
    pad: DirectionPad,
    cursor: CursorState,
    focus: Option<FocusTracker>,
    k: usize,
    max_frames: Option<u64>,
    processed: u64,
    trace: SessionTrace,
    start_cpu: ThreadTime,
    progress_tx: Option<Sender<TickReport>>,
}

impl std::fmt::Debug for ControlLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLoop")
            .field("k", &self.k)
            .field("max_frames", &self.max_frames)
            .field("processed", &self.processed)
            .finish_non_exhaustive()
    }
}

impl ControlLoop {
    pub fn new(
        store: LabelledExampleStore,
        source: Box<dyn FeatureSource>,
        pad: DirectionPad,
        cursor: CursorState,
        k: usize,
        max_frames: Option<u64>,
    ) -> Result<Self, StoreError> {
        if k == 0 {
            return Err(StoreError::InvalidNeighborCount);
        }
        if store.is_empty() {
            return Err(StoreError::EmptyStore);
        }

        Ok(Self {
            store,
            source,
            pad,
            cursor,
            focus: None,
            k,
            max_frames,
            processed: 0,
            trace: SessionTrace::default(),
            start_cpu: ThreadTime::now(),
            progress_tx: None,
        })
    }

    pub fn with_focus(mut self, tracker: FocusTracker) -> Self {
        self.focus = Some(tracker);
        self
    }

    pub fn with_progress(mut self, tx: Sender<TickReport>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Processes one frame. Returns `None` when the source is exhausted or
    /// the frame cap is reached; a frame whose dimensionality disagrees
    /// with the store is a contract violation and fails the session.
    pub fn tick(&mut self) -> Result<Option<TickReport>, StoreError> {
        if let Some(cap) = self.max_frames
            && self.processed >= cap
        {
            return Ok(None);
        }
        let Some(frame) = self.source.next_frame() else {
            return Ok(None);
        };

        let prediction = self.store.predict(&frame, self.k)?;
        if let Some(action) = self.pad.action_for(&prediction.label) {
            self.cursor.apply(action);
        }
        let zoom = self
            .focus
            .as_mut()
            .map(|tracker| tracker.observe(&prediction.label));

        self.processed += 1;
        let (cursor_x, cursor_y) = self.cursor.position();
        let report = TickReport {
            frames_seen: self.processed,
            confidence: prediction.winning_confidence(),
            label: prediction.label,
            confidence_by_label: prediction.confidence_by_label,
            cursor_x,
            cursor_y,
            zoom,
            seconds: self.start_cpu.elapsed().as_secs_f64(),
            model_bytes: self.store.memory_size(),
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(report.clone());
        }
        self.trace.push(report.clone());
        Ok(Some(report))
    }

    /// Runs until the source is exhausted or the frame cap is reached.
    pub fn run(&mut self) -> Result<(), StoreError> {
        self.start_cpu = ThreadTime::now();
        while self.tick()?.is_some() {}
        Ok(())
    }

    pub fn trace(&self) -> &SessionTrace {
        &self.trace
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    pub fn frames_processed(&self) -> u64 {
        self.processed
    }
}
