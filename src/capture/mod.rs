//! Capture Layer
//!
//! Camera/session setup and live frame delivery are the caller's concern;
//! this layer only defines the frame shape handed to the detector.

pub mod frame;

pub use frame::CapturedFrame;
