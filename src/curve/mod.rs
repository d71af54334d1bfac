//! The waveshaping transfer curve: a user-editable mapping from an input
//! sample to an output sample.
//!
//! A curve is a sorted set of control points ("vertices") on the normalized
//! [0,1]x[0,1] plane, with the x endpoints pinned at 0 and 1. Between two
//! adjacent vertices the output is interpolated with a power-law "tension"
//! blend; tension 0 is a straight line, positive tension bows the segment
//! toward its start vertex, negative toward its end vertex.
//!
//! On top of the stored ("raw") coordinates sits an optional warp: a
//! monotonic remapping of the x axis that changes where vertices *report*
//! themselves without touching what is stored. Evaluation, display, and
//! sort order all live in reported space; persistence stores raw space.
//!
//! Negative inputs are mirrored through the origin, so the curve always
//! defines an odd transfer function over [-1,1]. Inputs beyond +/-1 are
//! extrapolated from the endpoints, in one of two modes (see
//! [`Curve::set_bipolar_mode`]).

/// The aggregate curve: sorted vertex pool, warp, evaluation, mutation.
pub mod transfer;
/// One control point and its curve-type tag.
pub mod vertex;
/// Monotonic x-axis remapping functions and their inverses.
pub mod warp;

pub use transfer::{Curve, CurveError};
pub use vertex::{CurveType, Vertex};
pub use warp::{Warp, WarpType};
