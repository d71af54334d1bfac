//! Buffer-level helpers for applying a transfer curve to audio.
//!
//! These are allocation-free and realtime-safe, shaped for direct use in a
//! render callback: a per-sample form for graph-style code and in-place
//! buffer forms for block processing.

/// Apply a curve to samples and buffers, with optional drive.
pub mod shaper;
