//! Warp: monotonic remapping of the x axis.
//!
//! Warping lets the user crowd control points into one end of the input
//! range without changing the stored model. Each warp kind is a pair of
//! closed-form monotonic functions on [0,1] - a forward map used when a
//! vertex reports its position, and its exact inverse used when a reported
//! position is written back.
//!
//! The skew family, with `a = amount * 2 + 1`:
//!
//!   skew+  f(x) = 1 - (1-x)^a      pushes points toward x = 1
//!   skew-  f(x) = x^a              pushes points toward x = 0
//!
//! `SkewPlusMinus` crossfades the two over the amount range: below 0.5 it
//! applies skew+ with `a = (0.5 - amount) * 2`, above 0.5 skew- with
//! `a = (amount - 0.5) * 2`, and at exactly 0.5 it is the identity.
//!
//! The bend kinds are reserved: they are accepted and stored but currently
//! pass x through unchanged, pending a decision on their mapping law.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WarpType {
    #[default]
    None,
    BendPlus,
    BendMinus,
    BendPlusMinus,
    SkewPlus,
    SkewMinus,
    SkewPlusMinus,
}

#[inline]
fn skew_plus(x: f32, amount: f32) -> f32 {
    1.0 - (1.0 - x).powf(amount * 2.0 + 1.0)
}

#[inline]
fn inv_skew_plus(x: f32, amount: f32) -> f32 {
    1.0 - (1.0 - x).powf(1.0 / (amount * 2.0 + 1.0))
}

#[inline]
fn skew_minus(x: f32, amount: f32) -> f32 {
    x.powf(amount * 2.0 + 1.0)
}

#[inline]
fn inv_skew_minus(x: f32, amount: f32) -> f32 {
    x.powf(1.0 / (amount * 2.0 + 1.0))
}

/// The curve-wide warp configuration: a kind plus an amount in [0,1].
///
/// Stored once on the curve and passed by value into the vertex accessors,
/// so there is no per-vertex copy to go stale.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Warp {
    pub kind: WarpType,
    pub amount: f32,
}

impl Warp {
    pub fn new(kind: WarpType, amount: f32) -> Self {
        Self { kind, amount }
    }

    /// Map a raw x to its reported position.
    #[inline]
    pub fn apply(self, x: f32) -> f32 {
        match self.kind {
            WarpType::None => x,
            // Reserved: bend kinds pass through until their law is defined.
            WarpType::BendPlus | WarpType::BendMinus | WarpType::BendPlusMinus => x,
            WarpType::SkewPlus => skew_plus(x, self.amount),
            WarpType::SkewMinus => skew_minus(x, self.amount),
            WarpType::SkewPlusMinus => {
                if self.amount < 0.5 {
                    skew_plus(x, (0.5 - self.amount) * 2.0)
                } else if self.amount > 0.5 {
                    skew_minus(x, (self.amount - 0.5) * 2.0)
                } else {
                    x
                }
            }
        }
    }

    /// Map a reported x back to the raw position, undoing [`Warp::apply`].
    #[inline]
    pub fn apply_inverse(self, x: f32) -> f32 {
        match self.kind {
            WarpType::None => x,
            WarpType::BendPlus | WarpType::BendMinus | WarpType::BendPlusMinus => x,
            WarpType::SkewPlus => inv_skew_plus(x, self.amount),
            WarpType::SkewMinus => inv_skew_minus(x, self.amount),
            WarpType::SkewPlusMinus => {
                if self.amount < 0.5 {
                    inv_skew_plus(x, (0.5 - self.amount) * 2.0)
                } else if self.amount > 0.5 {
                    inv_skew_minus(x, (self.amount - 0.5) * 2.0)
                } else {
                    x
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: &[WarpType] = &[
        WarpType::None,
        WarpType::BendPlus,
        WarpType::BendMinus,
        WarpType::BendPlusMinus,
        WarpType::SkewPlus,
        WarpType::SkewMinus,
        WarpType::SkewPlusMinus,
    ];

    #[test]
    fn zero_amount_skews_are_identity() {
        let plus = Warp::new(WarpType::SkewPlus, 0.0);
        let minus = Warp::new(WarpType::SkewMinus, 0.0);

        for i in 0..=10 {
            let x = i as f32 / 10.0;
            assert!((plus.apply(x) - x).abs() < 1e-6);
            assert!((minus.apply(x) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn skew_plus_minus_is_identity_at_center() {
        let warp = Warp::new(WarpType::SkewPlusMinus, 0.5);
        assert_eq!(warp.apply(0.3), 0.3);
        assert_eq!(warp.apply_inverse(0.3), 0.3);
    }

    #[test]
    fn skew_plus_pushes_toward_one() {
        let warp = Warp::new(WarpType::SkewPlus, 0.8);
        assert!(warp.apply(0.5) > 0.5);
        assert_eq!(warp.apply(0.0), 0.0);
        assert!((warp.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn skew_minus_pushes_toward_zero() {
        let warp = Warp::new(WarpType::SkewMinus, 0.8);
        assert!(warp.apply(0.5) < 0.5);
        assert_eq!(warp.apply(0.0), 0.0);
        assert!((warp.apply(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn forward_then_inverse_round_trips() {
        for &kind in KINDS {
            for amount in [0.1, 0.25, 0.5, 0.75, 0.9] {
                let warp = Warp::new(kind, amount);
                for i in 0..=20 {
                    let x = i as f32 / 20.0;
                    let round = warp.apply_inverse(warp.apply(x));
                    assert!(
                        (round - x).abs() < 1e-5,
                        "{kind:?} amount {amount} failed at x={x}: got {round}"
                    );
                }
            }
        }
    }

    #[test]
    fn warps_are_monotonic() {
        for &kind in KINDS {
            for amount in [0.1, 0.5, 0.9] {
                let warp = Warp::new(kind, amount);
                let mut prev = warp.apply(0.0);
                for i in 1..=50 {
                    let next = warp.apply(i as f32 / 50.0);
                    assert!(next >= prev, "{kind:?} amount {amount} not monotonic");
                    prev = next;
                }
            }
        }
    }
}
