//! Replay frame source
//!
//! Plays back recorded per-frame OCR observations from a JSON script,
//! standing in for the live camera + OCR capability behind the same
//! detector trait. Useful for tuning thresholds against a captured session.

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::capture::CapturedFrame;
use crate::vision::{DetectionError, Orientation, TextDetector, TextLine};

/// A recorded scanning session
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplayScript {
    pub frames: Vec<ReplayFrame>,
}

/// One recorded frame: capture dimensions plus the text lines OCR reported
#[derive(Debug, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// Load a replay script from a JSON file
pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read replay script {}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&content)
        .with_context(|| format!("malformed replay script {}", path.display()))?;
    Ok(script)
}

impl ReplayScript {
    /// Split into the frames to drive the reader with and the detector that
    /// answers for them, in recording order
    pub fn into_parts(self) -> (Vec<CapturedFrame>, ReplayDetector) {
        let frames = self
            .frames
            .iter()
            .map(|f| CapturedFrame::new(vec![], f.width, f.height))
            .collect();
        let detector = ReplayDetector {
            results: Mutex::new(self.frames.into_iter().map(|f| f.lines).collect()),
        };
        (frames, detector)
    }
}

/// Detector answering each `detect` call with the next recorded frame's lines
pub struct ReplayDetector {
    results: Mutex<VecDeque<Vec<TextLine>>>,
}

#[async_trait]
impl TextDetector for ReplayDetector {
    async fn detect(
        &self,
        _frame: &CapturedFrame,
        _orientation: Orientation,
    ) -> Result<Vec<TextLine>, DetectionError> {
        self.results
            .lock()
            .pop_front()
            .ok_or_else(|| DetectionError::Provider("replay script exhausted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::Rect;

    const SAMPLE: &str = r#"{
        "frames": [
            {
                "width": 1920,
                "height": 1080,
                "lines": [
                    {"text": "Goblin Guide", "bounds": {"x": 10.0, "y": 10.0, "width": 200.0, "height": 30.0}}
                ]
            },
            {"width": 1920, "height": 1080}
        ]
    }"#;

    #[test]
    fn test_parse_script() {
        let script: ReplayScript = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(script.frames.len(), 2);
        assert_eq!(script.frames[0].lines.len(), 1);
        assert_eq!(script.frames[0].lines[0].text, "Goblin Guide");
        assert_eq!(
            script.frames[0].lines[0].bounds,
            Rect::new(10.0, 10.0, 200.0, 30.0)
        );
        // Lines default to empty when a frame saw nothing
        assert!(script.frames[1].lines.is_empty());
    }

    #[tokio::test]
    async fn test_detector_replays_in_order() {
        let script: ReplayScript = serde_json::from_str(SAMPLE).unwrap();
        let (frames, detector) = script.into_parts();
        assert_eq!(frames.len(), 2);

        let first = detector
            .detect(&frames[0], Orientation::default())
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].text, "Goblin Guide");

        let second = detector
            .detect(&frames[1], Orientation::default())
            .await
            .unwrap();
        assert!(second.is_empty());

        // Past the end of the recording the capability reports failure
        let exhausted = detector.detect(&frames[0], Orientation::default()).await;
        assert!(exhausted.is_err());
    }

    #[test]
    fn test_load_script_missing_file() {
        assert!(load_script(Path::new("/nonexistent/session.json")).is_err());
    }
}
