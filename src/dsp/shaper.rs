//! Waveshaping through a user-drawn transfer curve.
//!
//! A waveshaper applies a transfer function to each sample:
//!
//!   output = f(input * drive)
//!
//! Here f is not a fixed formula but the user's [`Curve`]: identity when
//! the curve is the default diagonal, anything from soft saturation to
//! folding as control points are added. Drive pushes the signal into the
//! outer regions of the curve; past +/-1 the curve's extrapolation mode
//! (unipolar or bipolar) decides what happens.

use crate::curve::Curve;

/// Shape one sample through the curve.
#[inline]
pub fn shape(curve: &Curve, sample: f32) -> f32 {
    curve.evaluate(sample)
}

/// Shape one sample with input drive applied first.
#[inline]
pub fn shape_driven(curve: &Curve, sample: f32, drive: f32) -> f32 {
    curve.evaluate(sample * drive)
}

/// Shape an entire buffer in place.
pub fn shape_buffer(curve: &Curve, buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = curve.evaluate(*sample);
    }
}

/// Shape an entire buffer in place with input drive applied first.
pub fn shape_buffer_driven(curve: &Curve, buffer: &mut [f32], drive: f32) {
    for sample in buffer.iter_mut() {
        *sample = curve.evaluate(*sample * drive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_curve_passes_signal_through() {
        let curve = Curve::new();
        let mut buffer: Vec<f32> = (0..64).map(|i| (i as f32 * 0.31).sin()).collect();
        let original = buffer.clone();

        shape_buffer(&curve, &mut buffer);

        for (out, expected) in buffer.iter().zip(original.iter()) {
            assert!((out - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn shaped_buffer_matches_per_sample_form() {
        let mut curve = Curve::new();
        curve.insert_vertex(0.4, 0.9).unwrap();
        curve.set_tension(0, 60.0).unwrap();

        let mut buffer: Vec<f32> = (0..32).map(|i| i as f32 / 16.0 - 1.0).collect();
        let reference: Vec<f32> = buffer.iter().map(|&s| shape(&curve, s)).collect();

        shape_buffer(&curve, &mut buffer);
        assert_eq!(buffer, reference);
    }

    #[test]
    fn drive_pushes_into_extrapolation() {
        let curve = Curve::new();

        // Unipolar default: f(x) = x * last.y past the unit range.
        let driven = shape_driven(&curve, 0.9, 4.0);
        assert!((driven - 3.6).abs() < 1e-5);
    }
}
