//! Curve state string: emission and rebuilding.
//!
//! See the module docs in [`crate::persist`] for the grammar. Emission is
//! infallible; rebuilding validates the whole string first and only then
//! touches the curve, so a malformed saved-project string can never leave
//! the curve half-rebuilt.

use crate::curve::{Curve, CurveType, Vertex};
use crate::persist::hexfloat::{parse_hex_float, to_hex_float, HexFloatError};
use crate::MAX_VERTICES;

/// Field order inside one vertex record.
const FIELDS_PER_RECORD: usize = 4;

impl Curve {
    /// Encode the vertex pool as the persisted state string.
    ///
    /// Warp and bipolar settings are host parameters, not curve state, and
    /// are deliberately absent from the string.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.vertex_count() * 32);

        for vertex in self.vertices() {
            out.push_str(&to_hex_float(vertex.x));
            out.push(',');
            out.push_str(&to_hex_float(vertex.y));
            out.push(',');
            out.push_str(&to_hex_float(vertex.tension));
            out.push(',');
            out.push_str(&vertex.curve_type.to_index().to_string());
            out.push(';');
        }

        out
    }

    /// Replace the vertex pool from a persisted state string.
    ///
    /// On any parse error the curve is left exactly as it was. Warp and
    /// bipolar settings are untouched either way; the host restores those
    /// separately.
    pub fn rebuild_from_string(&mut self, text: &str) -> Result<(), ParseError> {
        let parsed = parse_state(text)?;
        self.replace_vertices(&parsed);
        Ok(())
    }
}

/// Tokenize and validate a full state string into a sorted vertex list.
fn parse_state(text: &str) -> Result<Vec<Vertex>, ParseError> {
    let mut vertices: Vec<Vertex> = Vec::new();

    let mut records = text.split(';');
    // A well-formed state ends with ';', so the final split piece is empty.
    let trailer = records.next_back().unwrap_or("");
    if !trailer.is_empty() {
        return Err(ParseError::UnterminatedRecord {
            record: text.matches(';').count(),
        });
    }

    for (record_index, record) in records.enumerate() {
        if vertices.len() == MAX_VERTICES {
            return Err(ParseError::TooManyVertices {
                limit: MAX_VERTICES,
            });
        }

        let mut fields = record.split(',');
        let mut next_field = |field: usize| {
            fields.next().ok_or(ParseError::WrongFieldCount {
                record: record_index,
                found: field,
            })
        };

        let x = parse_float_field(next_field(0)?, record_index, 0)?;
        let y = parse_float_field(next_field(1)?, record_index, 1)?;
        let tension = parse_float_field(next_field(2)?, record_index, 2)?;

        let type_text = next_field(3)?;
        let type_index: i32 = type_text.parse().map_err(|_| ParseError::BadCurveType {
            record: record_index,
            text: type_text.to_string(),
        })?;
        let curve_type =
            CurveType::from_index(type_index).ok_or(ParseError::BadCurveType {
                record: record_index,
                text: type_text.to_string(),
            })?;

        let extra = fields.count();
        if extra != 0 {
            return Err(ParseError::WrongFieldCount {
                record: record_index,
                found: FIELDS_PER_RECORD + extra,
            });
        }

        if let Some(previous) = vertices.last() {
            if x < previous.x {
                return Err(ParseError::OutOfOrder {
                    record: record_index,
                });
            }
        }

        vertices.push(Vertex::new(x, y, tension, curve_type));
    }

    if vertices.len() < 2 {
        return Err(ParseError::TooFewVertices {
            found: vertices.len(),
        });
    }

    // The evaluator assumes the pool spans the whole [0, 1] input range; a
    // first vertex past 0 (or a last vertex short of 1) would leave inputs
    // outside any segment and feed the power law a negative base.
    if vertices[0].x != 0.0 {
        return Err(ParseError::UnpinnedEndpoint { record: 0 });
    }
    if vertices[vertices.len() - 1].x != 1.0 {
        return Err(ParseError::UnpinnedEndpoint {
            record: vertices.len() - 1,
        });
    }

    Ok(vertices)
}

fn parse_float_field(text: &str, record: usize, field: usize) -> Result<f32, ParseError> {
    let value = parse_hex_float(text).map_err(|source| ParseError::BadFloat {
        record,
        field,
        source,
    })?;

    if !value.is_finite() {
        return Err(ParseError::NonFiniteValue { record, field });
    }

    Ok(value)
}

/// Errors from [`Curve::rebuild_from_string`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Trailing bytes after the last `;`, or no terminator at all.
    UnterminatedRecord { record: usize },
    /// A record did not have exactly four fields.
    WrongFieldCount { record: usize, found: usize },
    /// A coordinate or tension field failed hex-float parsing.
    BadFloat {
        record: usize,
        field: usize,
        source: HexFloatError,
    },
    /// A parsed field was infinite or NaN.
    NonFiniteValue { record: usize, field: usize },
    /// The curve-type tag was not one of the known integers.
    BadCurveType { record: usize, text: String },
    /// Raw x positions must be non-decreasing.
    OutOfOrder { record: usize },
    /// Fewer than the two mandatory endpoint vertices.
    TooFewVertices { found: usize },
    /// The first vertex is not at x = 0, or the last is not at x = 1.
    UnpinnedEndpoint { record: usize },
    /// More records than the fixed vertex pool can hold.
    TooManyVertices { limit: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnterminatedRecord { record } => {
                write!(f, "record {record} is not terminated by ';'")
            }
            ParseError::WrongFieldCount { record, found } => {
                write!(
                    f,
                    "record {record} has {found} fields, expected {FIELDS_PER_RECORD}"
                )
            }
            ParseError::BadFloat {
                record,
                field,
                source,
            } => {
                write!(f, "record {record}, field {field}: {source}")
            }
            ParseError::NonFiniteValue { record, field } => {
                write!(f, "record {record}, field {field}: value is not finite")
            }
            ParseError::BadCurveType { record, text } => {
                write!(f, "record {record}: unknown curve type {text:?}")
            }
            ParseError::OutOfOrder { record } => {
                write!(f, "record {record}: x positions must be non-decreasing")
            }
            ParseError::TooFewVertices { found } => {
                write!(f, "state has {found} vertices, need at least 2")
            }
            ParseError::UnpinnedEndpoint { record } => {
                write!(f, "record {record}: endpoint vertices must sit at x = 0 and x = 1")
            }
            ParseError::TooManyVertices { limit } => {
                write!(f, "state exceeds the {limit}-vertex capacity")
            }
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::BadFloat { source, .. } => Some(source),
            _ => None,
        }
    }
}
