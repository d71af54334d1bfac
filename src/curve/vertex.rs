#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::warp::Warp;

/// Interpolation law tag carried by each vertex.
///
/// Only `Single`'s power law is implemented; the other tags are accepted,
/// stored, and round-tripped through persistence, but currently evaluate
/// identically to `Single`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CurveType {
    #[default]
    Single,
    Double,
    Stairs,
    Wave,
}

impl CurveType {
    /// Integer tag used by the persisted state string.
    pub fn to_index(self) -> i32 {
        match self {
            CurveType::Single => 0,
            CurveType::Double => 1,
            CurveType::Stairs => 2,
            CurveType::Wave => 3,
        }
    }

    /// Inverse of [`CurveType::to_index`]. Unknown tags are rejected.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(CurveType::Single),
            1 => Some(CurveType::Double),
            2 => Some(CurveType::Stairs),
            3 => Some(CurveType::Wave),
            _ => None,
        }
    }
}

/// One control point of the transfer curve.
///
/// `x` and `y` are the *raw* (unwarped) normalized coordinates, each in
/// [0,1]. The reported coordinates - what evaluation and display use - are
/// obtained by passing the curve-wide [`Warp`] into the accessors.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    /// Segment tension toward the next vertex, in [-100, 100]. 0 = linear.
    pub tension: f32,
    pub curve_type: CurveType,
}

impl Vertex {
    pub fn new(x: f32, y: f32, tension: f32, curve_type: CurveType) -> Self {
        Self {
            x,
            y,
            tension,
            curve_type,
        }
    }

    /// The x position after the active warp is applied.
    #[inline]
    pub fn reported_x(&self, warp: Warp) -> f32 {
        warp.apply(self.x)
    }

    /// The y position in reported space. Y-axis warp is reserved; this is
    /// currently the identity.
    #[inline]
    pub fn reported_y(&self, _warp: Warp) -> f32 {
        self.y
    }

    /// Store the raw x that reports as `x` under `warp`, so that
    /// `reported_x` round-trips.
    pub fn set_reported_x(&mut self, warp: Warp, x: f32) {
        self.x = warp.apply_inverse(x);
    }

    /// Counterpart of [`Vertex::reported_y`]; currently the identity.
    pub fn set_reported_y(&mut self, _warp: Warp, y: f32) {
        self.y = y;
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, CurveType::Single)
    }
}
