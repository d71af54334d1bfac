//! Host-state persistence for curves.
//!
//! A curve's externally visible state is a compact text string: one record
//! per vertex, fields separated by `,`, records terminated by `;`:
//!
//! ```text
//! record := hexfloat "," hexfloat "," hexfloat "," integer ";"
//! state  := record record+
//! ```
//!
//! Fields in order: raw x, raw y, tension, curve-type tag. The floats use
//! an exact hexadecimal encoding (`0x1.99999ap-4` style) so round-trips are
//! bit-perfect and immune to locale decimal separators. The default
//! two-vertex curve serializes as:
//!
//! ```text
//! 0x0p+0,0x0p+0,0x0p+0,0;0x1p+0,0x1p+0,0x0p+0,0;
//! ```
//!
//! The string may come back from an untrusted saved-project file, so the
//! parser validates everything - grammar, field counts, finiteness, sort
//! order, and the x = 0 / x = 1 endpoint pins - and rejects malformed
//! input instead of corrupting the curve.

/// Exact hexadecimal float encoding and parsing.
pub mod hexfloat;
/// Curve state string emission and rebuilding.
pub mod state;

pub use hexfloat::{parse_hex_float, to_hex_float, HexFloatError};
pub use state::ParseError;
