//! Realtime hand-off between the editing thread and the audio thread.
//!
//! The curve engine itself is single-threaded, but its deployment is not:
//! a UI thread mutates the curve at gesture rates while the audio thread
//! calls `evaluate` with hard deadlines. Instead of sharing one mutable
//! curve behind a lock, the editing side owns a private working copy and
//! publishes *complete snapshots* through a wait-free SPSC ring buffer.
//! The audio side drains the ring at block boundaries and keeps the newest
//! snapshot as its last-known-good curve.
//!
//! A snapshot is a flat `Copy` value (fixed vertex pool, no heap), so a
//! publish is a bounded memcpy and a refresh is a bounded number of pops.
//! Neither side ever blocks, allocates, or sees a half-applied edit.

/// Snapshot channel: editor side and audio side.
pub mod snapshot;

pub use snapshot::{curve_channel, CurveEditor, SharedCurve};
