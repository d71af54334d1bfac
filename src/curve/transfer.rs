//! The curve aggregate: a bounded, sorted vertex pool plus the evaluation
//! hot path.
//!
//! # Storage
//!
//! Vertices live in a fixed `[Vertex; MAX_VERTICES]` pool with an explicit
//! count, kept sorted by reported x. Insert and remove shift neighbors the
//! insertion-sort way - O(count) with a tiny constant, and the pool never
//! touches the heap. That makes a whole `Curve` a flat `Copy` value, which
//! is exactly what the realtime hand-off in [`crate::rt`] wants: publishing
//! an edit is a memcpy, not an allocation.
//!
//! # Evaluation
//!
//! `evaluate` runs once per audio sample, so it is allocation-free and
//! O(log count): binary search for the bracketing segment in reported
//! space, then one power-law blend. Negative inputs are mirrored through
//! the origin (`f(-x) = -f(x)`), and inputs beyond +/-1 extrapolate from
//! the endpoint vertices.
//!
//! # The tension law
//!
//! For a segment from p1 to p2 with normalized position
//! `u = (x - p1.x) / (p2.x - p1.x)` and tension `t` in [-1, 1]:
//!
//!   t >= 0:  out = dy * u^(1 + 14*t^1.2) + p1.y
//!   t <  0:  mirrored through the segment's other corner
//!
//! Positive tension bows the curve toward the start vertex, negative toward
//! the end vertex. The 1.2 exponent perceptually linearizes the tension
//! knob; 14 sets the maximum bow.

use crate::curve::vertex::{CurveType, Vertex};
use crate::curve::warp::{Warp, WarpType};
use crate::MAX_VERTICES;

/// A complete transfer curve.
///
/// Always holds at least the two endpoint vertices, pinned at raw x 0 and 1.
#[derive(Clone, Copy)]
pub struct Curve {
    vertices: [Vertex; MAX_VERTICES],
    count: usize,
    bipolar_mode: bool,
    warp: Warp,
}

impl Curve {
    /// The default curve: a straight line from (0,0) to (1,1).
    pub fn new() -> Self {
        let mut vertices = [Vertex::default(); MAX_VERTICES];
        vertices[0] = Vertex::new(0.0, 0.0, 0.0, CurveType::Single);
        vertices[1] = Vertex::new(1.0, 1.0, 0.0, CurveType::Single);

        Self {
            vertices,
            count: 2,
            bipolar_mode: false,
            warp: Warp::default(),
        }
    }

    /// Evaluate the transfer function at `x`. The audio-rate hot path:
    /// wait-free, allocation-free, O(log count).
    pub fn evaluate(&self, x: f32) -> f32 {
        let abs_x = x.abs();

        if abs_x > 1.0 {
            // Past the defined range: extrapolate from the endpoints.
            if self.bipolar_mode {
                let endpoint = if x >= 0.0 { self.count - 1 } else { 0 };
                let vertex_y = self.vertices[endpoint].reported_y(self.warp);

                return abs_x * (-1.0 + vertex_y * 2.0);
            } else {
                return x * self.vertices[self.count - 1].reported_y(self.warp);
            }
        }

        // Binary search in reported space. The search runs on |x|; the sign
        // is reapplied afterward, which is what makes the curve odd.
        let mut left: isize = 0;
        let mut right: isize = self.count as isize - 1;

        while left <= right {
            let mid = left + (right - left) / 2;
            let mid_x = self.vertices[mid as usize].reported_x(self.warp);

            if mid_x < abs_x {
                left = mid + 1;
            } else if mid_x > abs_x {
                right = mid - 1;
            } else {
                let y = self.vertices[mid as usize].reported_y(self.warp);
                return if x >= 0.0 { y } else { -y };
            }
        }

        // `left` converged to the insertion index, so the bracketing pair is
        // (left - 1, left). Endpoints are pinned at 0 and 1, so with finite
        // input the clamp never fires; it guards against NaN-poisoned state.
        let upper = (left.max(1) as usize).min(self.count - 1);
        let p1 = &self.vertices[upper - 1];
        let p2 = &self.vertices[upper];

        segment_value(
            x,
            p1.tension,
            p1.reported_x(self.warp),
            p1.reported_y(self.warp),
            p2.reported_x(self.warp),
            p2.reported_y(self.warp),
        )
    }

    /// Insert a vertex at the reported position `(x, y)` with tension 0 and
    /// the `Single` curve type.
    pub fn insert_vertex(&mut self, x: f32, y: f32) -> Result<(), CurveError> {
        self.insert_vertex_with(x, y, 0.0, CurveType::Single)
    }

    /// Insert a vertex at the reported position `(x, y)`.
    ///
    /// The stored raw x is the inverse-warped position, so the vertex
    /// reports back exactly where it was placed. Fails when the pool is
    /// full; the curve is unchanged in that case.
    pub fn insert_vertex_with(
        &mut self,
        x: f32,
        y: f32,
        tension: f32,
        curve_type: CurveType,
    ) -> Result<(), CurveError> {
        if self.count == MAX_VERTICES {
            return Err(CurveError::AtCapacity);
        }

        let raw_x = self.warp.apply_inverse(x);

        // Insertion-sort placement: shift right until the slot is found.
        // Raw and reported order agree because every warp is monotonic.
        let mut i = self.count;
        while i > 0 && raw_x < self.vertices[i - 1].x {
            self.vertices[i] = self.vertices[i - 1];
            i -= 1;
        }

        self.vertices[i] = Vertex::new(raw_x, y, tension, curve_type);
        self.count += 1;

        Ok(())
    }

    /// Remove the vertex at `index`, shifting the rest left.
    ///
    /// The endpoint vertices can never be removed.
    pub fn remove_vertex(&mut self, index: usize) -> Result<(), CurveError> {
        if index >= self.count {
            return Err(CurveError::OutOfBounds {
                index,
                len: self.count,
            });
        }
        if index == 0 || index == self.count - 1 {
            return Err(CurveError::EndpointRemoval { index });
        }

        self.vertices.copy_within(index + 1..self.count, index);
        self.count -= 1;

        Ok(())
    }

    /// Set the tension of the segment starting at `index`.
    ///
    /// The value is stored as given; callers clamp to [-100, 100] before the
    /// call (the editing UI does this at gesture time).
    pub fn set_tension(&mut self, index: usize, tension: f32) -> Result<(), CurveError> {
        let len = self.count;
        let vertex = self
            .vertices
            .get_mut(..len)
            .and_then(|v| v.get_mut(index))
            .ok_or(CurveError::OutOfBounds { index, len })?;

        vertex.tension = tension;
        Ok(())
    }

    /// Set the curve-type tag of the vertex at `index`.
    pub fn set_curve_type(&mut self, index: usize, curve_type: CurveType) -> Result<(), CurveError> {
        let len = self.count;
        let vertex = self
            .vertices
            .get_mut(..len)
            .and_then(|v| v.get_mut(index))
            .ok_or(CurveError::OutOfBounds { index, len })?;

        vertex.curve_type = curve_type;
        Ok(())
    }

    /// Move the vertex at `index` to the reported position `(x, y)`.
    ///
    /// Interior vertices are clamped between their neighbors' reported x so
    /// the sort order survives any drag; endpoint vertices keep their x
    /// pinned and only move vertically. y is clamped to [0, 1].
    pub fn set_vertex_position(&mut self, index: usize, x: f32, y: f32) -> Result<(), CurveError> {
        if index >= self.count {
            return Err(CurveError::OutOfBounds {
                index,
                len: self.count,
            });
        }

        let y = y.clamp(0.0, 1.0);

        if index > 0 && index < self.count - 1 {
            let lower = self.vertices[index - 1].reported_x(self.warp);
            let upper = self.vertices[index + 1].reported_x(self.warp);
            let warp = self.warp;

            self.vertices[index].set_reported_x(warp, x.clamp(lower, upper));
        }
        let warp = self.warp;
        self.vertices[index].set_reported_y(warp, y);

        Ok(())
    }

    /// Set the warp amount, in [0, 1]. Applies to every vertex at once;
    /// stored positions are untouched.
    pub fn set_warp_amount(&mut self, amount: f32) {
        self.warp.amount = amount;
    }

    /// Select the warp function.
    pub fn set_warp_type(&mut self, kind: WarpType) {
        self.warp.kind = kind;
    }

    /// The active warp configuration.
    pub fn warp(&self) -> Warp {
        self.warp
    }

    /// Choose how inputs beyond +/-1 extrapolate: bipolar mode treats the
    /// two input polarities symmetrically around the endpoint vertices;
    /// unipolar mode scales the last vertex's y.
    pub fn set_bipolar_mode(&mut self, bipolar: bool) {
        self.bipolar_mode = bipolar;
    }

    pub fn bipolar_mode(&self) -> bool {
        self.bipolar_mode
    }

    /// The vertex at `index`, if it exists.
    pub fn vertex_at(&self, index: usize) -> Option<&Vertex> {
        self.vertices[..self.count].get(index)
    }

    pub fn vertex_count(&self) -> usize {
        self.count
    }

    /// The live vertices in reported-x order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices[..self.count]
    }

    /// Restore the default two-vertex line. Warp and bipolar settings are
    /// separate controls and survive a reset.
    pub fn reset(&mut self) {
        let fresh = Curve::new();
        self.vertices = fresh.vertices;
        self.count = fresh.count;
    }

    /// Replace the whole vertex pool with an already-validated, sorted set.
    /// Used by the persistence layer after a successful parse.
    pub(crate) fn replace_vertices(&mut self, parsed: &[Vertex]) {
        debug_assert!(parsed.len() >= 2 && parsed.len() <= MAX_VERTICES);
        debug_assert!(parsed.windows(2).all(|w| w[0].x <= w[1].x));

        self.vertices[..parsed.len()].copy_from_slice(parsed);
        self.count = parsed.len();
    }
}

/// Power-law blend between two adjacent vertices; the tension law from the
/// module docs.
fn segment_value(input: f32, tension: f32, p1x: f32, p1y: f32, p2x: f32, p2y: f32) -> f32 {
    let input_sign = if input >= 0.0 { 1.0 } else { -1.0 };

    // Degenerate vertical segment: step straight to the far vertex.
    if p1x == p2x {
        return input_sign * p2y;
    }

    let dx = p2x - p1x;
    let dy = p2y - p1y;
    let input = input.abs();

    let mut tension = tension / 100.0;

    let result = if tension >= 0.0 {
        tension = tension.powf(1.2);
        dy * ((input - p1x) / dx).powf(1.0 + tension * 14.0) + p1y
    } else {
        tension = -(-tension).powf(1.2);
        1.0 - (dy * (1.0 - (input - p1x) / dx).powf(1.0 - tension * 14.0) + p1y) + p2y
            - (1.0 - p1y)
    };

    input_sign * result
}

impl Default for Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Curve {
    fn eq(&self, other: &Self) -> bool {
        self.vertices() == other.vertices()
            && self.bipolar_mode == other.bipolar_mode
            && self.warp == other.warp
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Curve")
            .field("vertices", &self.vertices())
            .field("bipolar_mode", &self.bipolar_mode)
            .field("warp", &self.warp)
            .finish()
    }
}

/// Errors from curve mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// The vertex pool is full; nothing was inserted.
    AtCapacity,
    /// The index does not refer to a live vertex.
    OutOfBounds { index: usize, len: usize },
    /// The first and last vertices can never be removed.
    EndpointRemoval { index: usize },
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurveError::AtCapacity => {
                write!(f, "curve is at capacity ({MAX_VERTICES} vertices)")
            }
            CurveError::OutOfBounds { index, len } => {
                write!(f, "vertex index {index} out of bounds (count {len})")
            }
            CurveError::EndpointRemoval { index } => {
                write!(f, "endpoint vertex {index} cannot be removed")
            }
        }
    }
}

impl std::error::Error for CurveError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted(curve: &Curve) -> bool {
        let warp = curve.warp();
        curve
            .vertices()
            .windows(2)
            .all(|w| w[0].reported_x(warp) <= w[1].reported_x(warp))
    }

    #[test]
    fn default_curve_is_the_identity_line() {
        let curve = Curve::new();

        assert_eq!(curve.vertex_count(), 2);
        assert_eq!(curve.vertex_at(0).unwrap().x, 0.0);
        assert_eq!(curve.vertex_at(1).unwrap().x, 1.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn inserted_vertex_is_hit_exactly() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.8).unwrap();

        // Binary-search exact match, no interpolation involved.
        assert_eq!(curve.evaluate(0.5), 0.8);
        assert_eq!(curve.vertex_count(), 3);
    }

    #[test]
    fn evaluation_hits_every_vertex() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.2, 0.6).unwrap();
        curve.insert_vertex(0.7, 0.3).unwrap();
        curve.set_warp_type(WarpType::SkewPlus);
        curve.set_warp_amount(0.4);

        let warp = curve.warp();
        for vertex in curve.vertices() {
            let x = vertex.reported_x(warp);
            let y = vertex.reported_y(warp);
            assert!(
                (curve.evaluate(x) - y).abs() < 1e-5,
                "missed vertex at reported x {x}"
            );
        }
    }

    #[test]
    fn curve_is_odd_over_the_unit_range() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.3, 0.9).unwrap();
        curve.set_tension(0, 40.0).unwrap();

        for i in 0..=100 {
            let x = i as f32 / 100.0;
            let pos = curve.evaluate(x);
            let neg = curve.evaluate(-x);
            assert!(
                (pos + neg).abs() < 1e-6,
                "f(-{x}) = {neg} is not -f({x}) = -{pos}"
            );
        }
    }

    #[test]
    fn inserts_keep_vertices_sorted() {
        let mut curve = Curve::new();
        for &x in &[0.9, 0.1, 0.5, 0.3, 0.7, 0.2, 0.8] {
            curve.insert_vertex(x, x).unwrap();
            assert!(is_sorted(&curve));
        }

        curve.remove_vertex(3).unwrap();
        curve.remove_vertex(1).unwrap();
        assert!(is_sorted(&curve));
        assert_eq!(curve.vertex_count(), 7);
    }

    #[test]
    fn inserts_stay_sorted_under_warp() {
        let mut curve = Curve::new();
        curve.set_warp_type(WarpType::SkewMinus);
        curve.set_warp_amount(0.8);

        for &x in &[0.6, 0.2, 0.9, 0.4] {
            curve.insert_vertex(x, 0.5).unwrap();
        }
        assert!(is_sorted(&curve));
    }

    #[test]
    fn capacity_overflow_is_refused() {
        let mut curve = Curve::new();
        let mut inserted = 2;
        let mut i = 1;

        loop {
            let x = (i % 997) as f32 / 997.0;
            match curve.insert_vertex(x, 0.5) {
                Ok(()) => inserted += 1,
                Err(CurveError::AtCapacity) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
            i += 1;
        }

        assert_eq!(inserted, crate::MAX_VERTICES);
        assert_eq!(curve.vertex_count(), crate::MAX_VERTICES);

        // Refusal leaves the curve untouched.
        assert_eq!(
            curve.insert_vertex(0.123, 0.5),
            Err(CurveError::AtCapacity)
        );
        assert_eq!(curve.vertex_count(), crate::MAX_VERTICES);
    }

    #[test]
    fn endpoints_are_protected() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.5).unwrap();

        assert!(matches!(
            curve.remove_vertex(0),
            Err(CurveError::EndpointRemoval { index: 0 })
        ));
        assert!(matches!(
            curve.remove_vertex(2),
            Err(CurveError::EndpointRemoval { index: 2 })
        ));
        assert!(matches!(
            curve.remove_vertex(7),
            Err(CurveError::OutOfBounds { index: 7, len: 3 })
        ));
        assert_eq!(curve.vertex_count(), 3);

        curve.remove_vertex(1).unwrap();
        assert_eq!(curve.vertex_count(), 2);
    }

    #[test]
    fn positive_tension_bows_toward_start() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.8).unwrap();
        curve.set_tension(0, 100.0).unwrap();

        // Max positive tension hugs the start vertex, so the midpoint of the
        // first segment drops far below the linear value 0.4.
        let linear = 0.25 / 0.5 * 0.8;
        assert!(curve.evaluate(0.25) < linear);
        assert!(curve.evaluate(0.25) >= 0.0);
    }

    #[test]
    fn negative_tension_bows_toward_end() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.8).unwrap();
        curve.set_tension(0, -100.0).unwrap();

        let linear = 0.25 / 0.5 * 0.8;
        assert!(curve.evaluate(0.25) > linear);
        assert!(curve.evaluate(0.25) <= 0.8 + 1e-6);
    }

    #[test]
    fn zero_tension_segments_are_linear() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.8).unwrap();

        let quarter = curve.evaluate(0.25);
        assert!((quarter - 0.4).abs() < 1e-6);

        let three_quarters = curve.evaluate(0.75);
        assert!((three_quarters - 0.9).abs() < 1e-6);
    }

    #[test]
    fn degenerate_vertical_segment_steps() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.2).unwrap();
        curve.insert_vertex(0.5, 0.9).unwrap();

        // Two vertices sharing an x: the segment between them is a step to
        // the far vertex's y.
        let out = curve.evaluate(0.5);
        assert!(out == 0.2 || out == 0.9);
        assert!(is_sorted(&curve));
    }

    #[test]
    fn unipolar_extrapolation_scales_last_vertex() {
        let mut curve = Curve::new();
        curve.set_vertex_position(1, 1.0, 0.5).unwrap();

        assert!((curve.evaluate(2.0) - 1.0).abs() < 1e-6);
        assert!((curve.evaluate(-2.0) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn bipolar_extrapolation_uses_matching_endpoint() {
        let mut curve = Curve::new();
        curve.set_bipolar_mode(true);
        curve.set_vertex_position(0, 0.0, 0.25).unwrap();
        curve.set_vertex_position(1, 1.0, 1.0).unwrap();

        // Positive side: last vertex y = 1.0 maps to +1, scaled by |x|.
        assert!((curve.evaluate(1.5) - 1.5).abs() < 1e-6);
        // Negative side: first vertex y = 0.25 maps to -0.5, scaled by |x|.
        assert!((curve.evaluate(-1.5) + 0.75).abs() < 1e-6);
    }

    #[test]
    fn moving_a_vertex_is_clamped_between_neighbors() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.3, 0.3).unwrap();
        curve.insert_vertex(0.6, 0.6).unwrap();

        // Try to drag the middle vertex past its right neighbor.
        curve.set_vertex_position(1, 0.95, 0.5).unwrap();
        assert!(is_sorted(&curve));
        let warp = curve.warp();
        assert!(curve.vertex_at(1).unwrap().reported_x(warp) <= 0.6 + 1e-6);

        // Endpoints only move vertically.
        curve.set_vertex_position(0, 0.4, 0.2).unwrap();
        assert_eq!(curve.vertex_at(0).unwrap().x, 0.0);
        assert_eq!(curve.vertex_at(0).unwrap().y, 0.2);
    }

    #[test]
    fn reset_restores_the_default_line_but_keeps_modes() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.5, 0.1).unwrap();
        curve.set_bipolar_mode(true);
        curve.set_warp_type(WarpType::SkewPlus);
        curve.set_warp_amount(0.3);

        curve.reset();

        assert_eq!(curve.vertex_count(), 2);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
        assert!(curve.bipolar_mode());
        assert_eq!(curve.warp().kind, WarpType::SkewPlus);
    }

    #[test]
    fn stub_curve_types_evaluate_like_single() {
        let mut single = Curve::new();
        single
            .insert_vertex_with(0.5, 0.7, 30.0, CurveType::Single)
            .unwrap();

        let mut stairs = Curve::new();
        stairs
            .insert_vertex_with(0.5, 0.7, 30.0, CurveType::Stairs)
            .unwrap();

        for i in 0..=20 {
            let x = i as f32 / 20.0;
            assert_eq!(single.evaluate(x), stairs.evaluate(x));
        }
    }
}
