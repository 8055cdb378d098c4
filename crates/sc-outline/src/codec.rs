//! Text form of an [`Outline`]: `x;y;x;y|x;y;...`, one field per polygon.

use core::fmt;
use core::str::FromStr;

use sc_core::{Point2f, Polygon2f};

use crate::outline::Outline;

pub const POLYGON_SEPARATOR: char = '|';
pub const COORDINATE_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A token that is not a decimal number.
    Number { polygon: usize, token: String },
    /// A polygon field with an unpaired coordinate.
    OddCoordinateCount { polygon: usize, count: usize },
    /// A polygon field with fewer than three vertices.
    TooFewVertices { polygon: usize, vertices: usize },
    /// A coordinate that parses to NaN or infinity.
    NonFinite { polygon: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number { polygon, token } => {
                write!(f, "polygon {polygon}: invalid number {token:?}")
            }
            Self::OddCoordinateCount { polygon, count } => {
                write!(f, "polygon {polygon}: {count} coordinates do not form pairs")
            }
            Self::TooFewVertices { polygon, vertices } => {
                write!(f, "polygon {polygon}: {vertices} vertices, need at least 3")
            }
            Self::NonFinite { polygon } => write!(f, "polygon {polygon}: non-finite coordinate"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Serializes every polygon as interleaved `x;y` pairs, polygons joined by `|`.
///
/// Numbers use the shortest decimal form that parses back to the same `f32`.
/// An outline without polygons encodes as the empty string.
pub fn encode(outline: &Outline) -> String {
    let mut out = String::new();
    for (i, polygon) in outline.polygons.iter().enumerate() {
        if i > 0 {
            out.push(POLYGON_SEPARATOR);
        }
        for (j, p) in polygon.points.iter().enumerate() {
            if j > 0 {
                out.push(COORDINATE_SEPARATOR);
            }
            out.push_str(&p.x.to_string());
            out.push(COORDINATE_SEPARATOR);
            out.push_str(&p.y.to_string());
        }
    }
    out
}

/// Parses the text form produced by [`encode`].
///
/// Surrounding whitespace is ignored; an empty input is the empty outline.
pub fn decode(text: &str) -> Result<Outline, CodecError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Outline::empty());
    }

    let polygons = text
        .split(POLYGON_SEPARATOR)
        .enumerate()
        .map(|(i, field)| decode_polygon(i, field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Outline::new(polygons))
}

fn decode_polygon(polygon: usize, field: &str) -> Result<Polygon2f, CodecError> {
    let mut coords = Vec::new();
    for token in field.split(COORDINATE_SEPARATOR) {
        let token = token.trim();
        let v = token.parse::<f32>().map_err(|_| CodecError::Number {
            polygon,
            token: token.to_owned(),
        })?;
        if !v.is_finite() {
            return Err(CodecError::NonFinite { polygon });
        }
        coords.push(v);
    }

    if coords.len() % 2 != 0 {
        return Err(CodecError::OddCoordinateCount {
            polygon,
            count: coords.len(),
        });
    }
    let vertices = coords.len() / 2;
    if vertices < 3 {
        return Err(CodecError::TooFewVertices { polygon, vertices });
    }

    Ok(Polygon2f::new(
        coords
            .chunks_exact(2)
            .map(|xy| Point2f::new(xy[0], xy[1]))
            .collect(),
    ))
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Outline {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}
