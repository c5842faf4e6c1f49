//! m3d XML format
//!
//! Writes meshes to the tab-indented m3d XML layout (header, `<Mesh>`,
//! `<Material>`, `<Texture>`, `<Vertex>`, `<Face>`).

mod exporter;
mod plan;
mod writer;

pub use exporter::MeshXmlExporter;
pub use plan::{ExportPlan, PlanNode};
pub use writer::XmlWriter;

use std::fmt;

/// First line of every file. Kept byte-for-byte as existing readers expect it.
pub const DECLARATION: &str = "<? xml version=\"1.0\" ?>";

/// Decimal places for positions, normals, scale and rotation
pub const GEOMETRY_PRECISION: usize = 5;
/// Decimal places for colours and shininess
pub const COLOR_PRECISION: usize = 4;
/// Decimal places for texture coordinates
pub const UV_PRECISION: usize = 3;

/// Fixed-point number with a given number of decimals.
///
/// Negative zero prints as `0.000...`.
#[derive(Debug, Clone, Copy)]
pub struct Fixed(pub f64, pub usize);

impl Fixed {
    pub fn geometry(value: f64) -> Self {
        Self(value, GEOMETRY_PRECISION)
    }

    pub fn color(value: f64) -> Self {
        Self(value, COLOR_PRECISION)
    }

    pub fn uv(value: f64) -> Self {
        Self(value, UV_PRECISION)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.0 == 0.0 { 0.0 } else { self.0 };
        write!(f, "{:.*}", self.1, value)
    }
}

/// Optional index, `-1` when absent
#[derive(Debug, Clone, Copy)]
pub struct IndexOrNone(pub Option<usize>);

impl fmt::Display for IndexOrNone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, "{}", index),
            None => f.write_str("-1"),
        }
    }
}

/// Attribute value with `& < > "` escaped
#[derive(Debug, Clone, Copy)]
pub struct Escaped<'a>(pub &'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.0;
        while let Some(pos) = rest.find(['&', '<', '>', '"']) {
            f.write_str(&rest[..pos])?;
            let entity = match rest.as_bytes()[pos] {
                b'&' => "&amp;",
                b'<' => "&lt;",
                b'>' => "&gt;",
                _ => "&quot;",
            };
            f.write_str(entity)?;
            rest = &rest[pos + 1..];
        }
        f.write_str(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_precision() {
        assert_eq!(Fixed::geometry(1.0).to_string(), "1.00000");
        assert_eq!(Fixed::geometry(-2.5).to_string(), "-2.50000");
        assert_eq!(Fixed::color(0.8).to_string(), "0.8000");
        assert_eq!(Fixed::uv(0.25).to_string(), "0.250");
    }

    #[test]
    fn test_fixed_negative_zero() {
        assert_eq!(Fixed::geometry(-0.0).to_string(), "0.00000");
        assert_eq!(Fixed::uv(-0.0).to_string(), "0.000");
    }

    #[test]
    fn test_index_or_none() {
        assert_eq!(IndexOrNone(Some(3)).to_string(), "3");
        assert_eq!(IndexOrNone(None).to_string(), "-1");
    }

    #[test]
    fn test_escaped() {
        assert_eq!(Escaped("Hull_01").to_string(), "Hull_01");
        assert_eq!(Escaped("a<b & \"c\">").to_string(), "a&lt;b &amp; &quot;c&quot;&gt;");
    }
}
