//! Outbound event channel for scan decisions and debug feedback
//!
//! The engine never calls back into caller types; decisions leave through a
//! typed channel the surrounding layer consumes at its own pace.

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::vision::Rect;

/// Events produced by the title reader
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// Consensus collapsed to exactly one candidate. Fires at most once per
    /// evaluation cycle.
    TitleDetected(String),
    /// An observation passed the region filter; display-space box for
    /// caller-side visual feedback. Carries no decision semantics.
    ObservationAccepted(Rect),
}

/// Create the channel pair a reader publishes on
pub fn event_channel() -> (Sender<ScanEvent>, Receiver<ScanEvent>) {
    unbounded()
}
