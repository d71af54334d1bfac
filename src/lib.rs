pub mod curve; // Transfer-curve model: vertices, warp, evaluation
pub mod dsp; // Buffer shaping helpers
pub mod persist; // Exact hex-float state string for host persistence
#[cfg(feature = "rtrb")]
pub mod rt; // UI <-> audio-thread snapshot channel

/// Fixed capacity of a curve's vertex pool.
pub const MAX_VERTICES: usize = 99;
