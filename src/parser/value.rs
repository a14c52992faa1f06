use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeogitError, Result};
use crate::model::Geometry;

/// Declared attribute type tags as emitted by `show --raw`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    /// Any tag outside the known set; the raw tag text is preserved.
    Other(String),
}

impl AttributeType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "BOOLEAN" => Self::Boolean,
            "BYTE" => Self::Byte,
            "SHORT" => Self::Short,
            "INTEGER" => Self::Integer,
            "LONG" => Self::Long,
            "FLOAT" => Self::Float,
            "DOUBLE" => Self::Double,
            "POINT" => Self::Point,
            "LINESTRING" => Self::LineString,
            "POLYGON" => Self::Polygon,
            "MULTIPOINT" => Self::MultiPoint,
            "MULTILINESTRING" => Self::MultiLineString,
            "MULTIPOLYGON" => Self::MultiPolygon,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag text as the engine prints it
    pub fn tag(&self) -> &str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Integer => "INTEGER",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Point => "POINT",
            Self::LineString => "LINESTRING",
            Self::Polygon => "POLYGON",
            Self::MultiPoint => "MULTIPOINT",
            Self::MultiLineString => "MULTILINESTRING",
            Self::MultiPolygon => "MULTIPOLYGON",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_geometric(&self) -> bool {
        matches!(
            self,
            Self::Point
                | Self::LineString
                | Self::Polygon
                | Self::MultiPoint
                | Self::MultiLineString
                | Self::MultiPolygon
        )
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A decoded attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Geometry(Geometry),
    Text(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Geometry> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Geometry(g) => write!(f, "{}", g),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Decode one raw value text against its declared type.
///
/// Boolean and numeric text must decode cleanly; a geometry literal that
/// fails its WKT parse degrades to the raw text instead of failing.
/// Unknown tags pass the text through unchanged.
pub fn decode(raw: &str, declared: &AttributeType) -> Result<Value> {
    match declared {
        AttributeType::Boolean => {
            if raw.trim().eq_ignore_ascii_case("true") {
                Ok(Value::Bool(true))
            } else if raw.trim().eq_ignore_ascii_case("false") {
                Ok(Value::Bool(false))
            } else {
                Err(value_error(raw, declared))
            }
        }
        AttributeType::Byte | AttributeType::Short | AttributeType::Integer | AttributeType::Long => {
            raw.trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| value_error(raw, declared))
        }
        AttributeType::Float | AttributeType::Double => raw
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| value_error(raw, declared)),
        _ if declared.is_geometric() => Ok(raw
            .parse::<Geometry>()
            .map(Value::Geometry)
            .unwrap_or_else(|_| Value::Text(raw.to_string()))),
        _ => Ok(Value::Text(raw.to_string())),
    }
}

fn value_error(raw: &str, declared: &AttributeType) -> GeogitError {
    GeogitError::ValueParse {
        value: raw.to_string(),
        declared: declared.tag().to_string(),
    }
}
