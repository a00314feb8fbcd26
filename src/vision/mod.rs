//! Vision Layer
//!
//! Types exchanged with the external text-detection capability. Detection
//! itself is an opaque async capability behind the [`TextDetector`] trait;
//! the engine needs no knowledge of how it is implemented.

pub mod geometry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::frame::CapturedFrame;

pub use geometry::{FrameScale, Point, Rect, Size};

/// A single text line reported by the detector, box in source-image pixel
/// space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Recognized text content
    pub text: String,
    /// Bounding box in source-image pixel space
    pub bounds: Rect,
}

/// Orientation hint passed through to the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    /// Camera held sideways, home button right - the usual card-scanning grip
    #[default]
    LandscapeRight,
}

/// Error reported by the detection capability for a single frame.
///
/// Non-fatal: the frame is skipped and the error surfaced to the caller
/// verbatim; the engine keeps running.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("text detection failed: {0}")]
    Provider(String),
}

/// The external OCR capability.
///
/// Submitting a frame suspends until the capability responds; no in-flight
/// call can be cancelled and no timeout is imposed. A hang stalls only that
/// frame's buffer update.
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Detect text lines in a captured frame
    async fn detect(
        &self,
        frame: &CapturedFrame,
        orientation: Orientation,
    ) -> Result<Vec<TextLine>, DetectionError>;
}
