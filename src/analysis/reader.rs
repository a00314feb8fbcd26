//! Title reader orchestration
//!
//! Drives the per-frame pipeline: detect, map into display space, filter by
//! the region of interest, accumulate, and every `evaluation_cadence` frames
//! run the cluster-and-consensus evaluation. A title decision is emitted only
//! when the shortlist collapses to exactly one candidate.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::capture::CapturedFrame;
use crate::config::{ConfigError, SessionConfig};
use crate::vision::{DetectionError, FrameScale, Orientation, Rect, TextDetector};

use super::{anchor_cluster, event_channel, shortlist, Observation, ObservationBuffer, ScanEvent};

/// Outcome of one frame-processing call.
///
/// Progress reporting only; decision semantics live in the event channel.
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    /// Observations that passed the region filter this frame
    pub accepted: usize,
    /// Shortlist of the evaluation run on this frame, if one ran
    pub shortlist: Option<Vec<String>>,
}

impl FrameReport {
    /// Whether a consensus evaluation ran on this frame
    pub fn evaluated(&self) -> bool {
        self.shortlist.is_some()
    }
}

/// Mutable session state. Buffer, frame counter and session scale are owned
/// exclusively by the reader and only ever touched under this one lock, so
/// concurrent frame completions cannot race the evaluation cadence.
struct ReaderState {
    buffer: ObservationBuffer,
    frames_analyzed: u64,
    scale: Option<FrameScale>,
}

/// The title-consensus orchestrator.
///
/// Generic over any [`TextDetector`]; emits [`ScanEvent`]s on the channel
/// handed out at construction. A session spans from one [`reset`] to the
/// next.
///
/// [`reset`]: TitleReader::reset
pub struct TitleReader<D> {
    detector: D,
    config: SessionConfig,
    region: Rect,
    events: Sender<ScanEvent>,
    paused: AtomicBool,
    state: Mutex<ReaderState>,
}

impl<D: TextDetector> TitleReader<D> {
    /// Create a reader and the receiving end of its event channel.
    ///
    /// Configuration is validated here, before any frame processing begins.
    pub fn new(detector: D, config: SessionConfig) -> Result<(Self, Receiver<ScanEvent>), ConfigError> {
        config.validate()?;

        let region = config
            .region_of_interest
            .unwrap_or_else(|| Rect::from_size(config.display));
        let (events, receiver) = event_channel();

        let reader = Self {
            detector,
            region,
            events,
            paused: AtomicBool::new(false),
            state: Mutex::new(ReaderState {
                buffer: ObservationBuffer::with_capacity(config.max_observations),
                frames_analyzed: 0,
                scale: None,
            }),
            config,
        };
        Ok((reader, receiver))
    }

    /// Submit one captured frame to the detector and fold the completion into
    /// the session.
    ///
    /// A detector error skips the frame (buffer untouched, counter unchanged)
    /// and is returned verbatim; the reader keeps running.
    pub async fn process_frame(
        &self,
        frame: &CapturedFrame,
        orientation: Orientation,
    ) -> Result<FrameReport, DetectionError> {
        if self.paused.load(Ordering::Acquire) {
            return Ok(FrameReport::default());
        }

        let lines = self.detector.detect(frame, orientation).await?;
        Ok(self.apply_completion(frame, lines))
    }

    /// While paused, frames are dropped before submission and late detector
    /// completions are discarded instead of applied.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Force the session back to idle: clears the buffer, the frame counter
    /// and the session scale atomically. Configuration is untouched. Usable
    /// at any time, including mid-evaluation.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.buffer.reset();
        state.frames_analyzed = 0;
        state.scale = None;
        debug!("session reset");
    }

    /// Frames folded into the current session
    pub fn frames_analyzed(&self) -> u64 {
        self.state.lock().frames_analyzed
    }

    /// Accepted observations currently held
    pub fn observation_count(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Apply a detection completion under the single reader lock
    fn apply_completion(&self, frame: &CapturedFrame, lines: Vec<crate::vision::TextLine>) -> FrameReport {
        let mut state = self.state.lock();

        // Re-check under the lock: a completion that raced set_paused(true)
        // is discarded rather than applied.
        if self.paused.load(Ordering::Acquire) {
            return FrameReport::default();
        }

        // The first frame of the session fixes the image-to-display scale;
        // capture resolution is assumed constant until the next reset.
        let scale = *state
            .scale
            .get_or_insert_with(|| FrameScale::between(frame.size(), self.config.display));

        state.frames_analyzed += 1;

        let mut accepted = 0;
        for line in lines {
            let mapped = scale.map(line.bounds);
            if !self.region.contains(mapped.origin()) {
                continue;
            }
            let _ = self.events.send(ScanEvent::ObservationAccepted(mapped));
            state.buffer.append(Observation::new(line.text, mapped));
            accepted += 1;
        }

        let due = state.frames_analyzed % u64::from(self.config.evaluation_cadence) == 0
            && state.frames_analyzed >= u64::from(self.config.required_frames);
        if !due {
            return FrameReport {
                accepted,
                shortlist: None,
            };
        }

        let snapshot = state.buffer.snapshot();
        let clustered = anchor_cluster(&snapshot);
        let candidates = shortlist(
            clustered.iter().map(|o| o.text.as_str()),
            self.config.minimum_frequency,
            self.config.accuracy_required,
            self.config.shortlist_limit,
        );

        debug!(
            frame = state.frames_analyzed,
            buffered = snapshot.len(),
            clustered = clustered.len(),
            candidates = candidates.len(),
            "consensus evaluation"
        );

        if let [title] = candidates.as_slice() {
            info!(title = %title, "title detected");
            let _ = self.events.send(ScanEvent::TitleDetected(title.clone()));
        }

        FrameReport {
            accepted,
            shortlist: Some(candidates),
        }
    }
}
