//! Geometry value types and their well-known-text form.
//!
//! Attribute values tagged with a geometry type arrive as WKT literals
//! (`POINT (1 2)`, `MULTIPOLYGON (((...)))`). The reader here covers
//! exactly the six forms the engine emits; anything else is a
//! [`WktError`], which the value codec downgrades to a plain string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single 2D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A geometry decoded from a well-known-text literal.
///
/// Polygons are rings (outer first, then holes); multi-polygons nest one
/// level deeper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
}

/// Raised when a well-known-text literal cannot be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WktError(String);

impl WktError {
    fn new<S: Into<String>>(message: S) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for WktError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid WKT: {}", self.0)
    }
}

impl std::error::Error for WktError {}

impl FromStr for Geometry {
    type Err = WktError;

    fn from_str(s: &str) -> Result<Self, WktError> {
        let mut reader = WktReader::new(s);
        let geometry = reader.read_geometry()?;
        reader.expect_end()?;
        Ok(geometry)
    }
}

/// Cursor over the byte representation of a WKT literal.
///
/// WKT is ASCII; the cursor only ever advances past ASCII bytes, so
/// slicing stays on character boundaries.
struct WktReader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> WktReader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input.as_bytes().get(self.pos).map(|&b| b as char)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn read_keyword(&mut self) -> String {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        self.input[start..self.pos].to_ascii_uppercase()
    }

    fn expect(&mut self, want: char) -> Result<(), WktError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(WktError::new(format!(
                "expected '{}' at byte {}, found '{}'",
                want, self.pos, c
            ))),
            None => Err(WktError::new(format!(
                "expected '{}' but input ended",
                want
            ))),
        }
    }

    fn try_consume(&mut self, want: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_number(&self) -> bool {
        matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
    }

    fn read_number(&mut self) -> Result<f64, WktError> {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')
        ) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(WktError::new(format!("expected number at byte {}", start)));
        }
        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| WktError::new(format!("bad number '{}'", &self.input[start..self.pos])))
    }

    fn read_coord(&mut self) -> Result<Coord, WktError> {
        let x = self.read_number()?;
        let y = self.read_number()?;
        // discard Z/M ordinates
        loop {
            self.skip_whitespace();
            if self.at_number() {
                self.read_number()?;
            } else {
                break;
            }
        }
        Ok(Coord { x, y })
    }

    fn read_coord_seq(&mut self) -> Result<Vec<Coord>, WktError> {
        self.expect('(')?;
        let mut coords = vec![self.read_coord()?];
        while self.try_consume(',') {
            coords.push(self.read_coord()?);
        }
        self.expect(')')?;
        Ok(coords)
    }

    fn read_ring_seq(&mut self) -> Result<Vec<Vec<Coord>>, WktError> {
        self.expect('(')?;
        let mut rings = vec![self.read_coord_seq()?];
        while self.try_consume(',') {
            rings.push(self.read_coord_seq()?);
        }
        self.expect(')')?;
        Ok(rings)
    }

    fn read_polygon_seq(&mut self) -> Result<Vec<Vec<Vec<Coord>>>, WktError> {
        self.expect('(')?;
        let mut polygons = vec![self.read_ring_seq()?];
        while self.try_consume(',') {
            polygons.push(self.read_ring_seq()?);
        }
        self.expect(')')?;
        Ok(polygons)
    }

    // members may be bare pairs or parenthesized: MULTIPOINT (1 2, 3 4)
    // and MULTIPOINT ((1 2), (3 4)) are both emitted in the wild
    fn read_multipoint(&mut self) -> Result<Vec<Coord>, WktError> {
        self.expect('(')?;
        let mut points = vec![self.read_multipoint_member()?];
        while self.try_consume(',') {
            points.push(self.read_multipoint_member()?);
        }
        self.expect(')')?;
        Ok(points)
    }

    fn read_multipoint_member(&mut self) -> Result<Coord, WktError> {
        if self.try_consume('(') {
            let coord = self.read_coord()?;
            self.expect(')')?;
            Ok(coord)
        } else {
            self.read_coord()
        }
    }

    fn read_geometry(&mut self) -> Result<Geometry, WktError> {
        let keyword = self.read_keyword();
        match keyword.as_str() {
            "POINT" => {
                self.expect('(')?;
                let coord = self.read_coord()?;
                self.expect(')')?;
                Ok(Geometry::Point(coord))
            }
            "LINESTRING" => Ok(Geometry::LineString(self.read_coord_seq()?)),
            "POLYGON" => Ok(Geometry::Polygon(self.read_ring_seq()?)),
            "MULTIPOINT" => Ok(Geometry::MultiPoint(self.read_multipoint()?)),
            "MULTILINESTRING" => Ok(Geometry::MultiLineString(self.read_ring_seq()?)),
            "MULTIPOLYGON" => Ok(Geometry::MultiPolygon(self.read_polygon_seq()?)),
            "" => Err(WktError::new("empty geometry literal")),
            other => Err(WktError::new(format!("unknown geometry type '{}'", other))),
        }
    }

    fn expect_end(&mut self) -> Result<(), WktError> {
        self.skip_whitespace();
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(WktError::new(format!(
                "trailing content at byte {}",
                self.pos
            )))
        }
    }
}

fn write_coord(f: &mut fmt::Formatter<'_>, coord: &Coord) -> fmt::Result {
    write!(f, "{} {}", coord.x, coord.y)
}

fn write_coord_seq(f: &mut fmt::Formatter<'_>, coords: &[Coord]) -> fmt::Result {
    write!(f, "(")?;
    for (i, coord) in coords.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_coord(f, coord)?;
    }
    write!(f, ")")
}

fn write_ring_seq(f: &mut fmt::Formatter<'_>, rings: &[Vec<Coord>]) -> fmt::Result {
    write!(f, "(")?;
    for (i, ring) in rings.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_coord_seq(f, ring)?;
    }
    write!(f, ")")
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(coord) => {
                write!(f, "POINT (")?;
                write_coord(f, coord)?;
                write!(f, ")")
            }
            Geometry::LineString(coords) => {
                write!(f, "LINESTRING ")?;
                write_coord_seq(f, coords)
            }
            Geometry::Polygon(rings) => {
                write!(f, "POLYGON ")?;
                write_ring_seq(f, rings)
            }
            Geometry::MultiPoint(points) => {
                write!(f, "MULTIPOINT (")?;
                for (i, point) in points.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "(")?;
                    write_coord(f, point)?;
                    write!(f, ")")?;
                }
                write!(f, ")")
            }
            Geometry::MultiLineString(lines) => {
                write!(f, "MULTILINESTRING ")?;
                write_ring_seq(f, lines)
            }
            Geometry::MultiPolygon(polygons) => {
                write!(f, "MULTIPOLYGON (")?;
                for (i, polygon) in polygons.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_ring_seq(f, polygon)?;
                }
                write!(f, ")")
            }
        }
    }
}
