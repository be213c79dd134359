//! Null normalization of the outgoing structure.
//!
//! The grouped result is lowered to a [`Shape`] tree (mapping, ordered list
//! or scalar) and every non-finite number is replaced by an explicit null
//! before it is serialized. JSON has no NaN, so nothing non-finite may leave
//! the service.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::models::{DateGroups, Metric, PerformanceRecord};

/// Leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Text(String),
    Number(f64),
}

/// Closed set of shapes the response can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Ordered key/value pairs.
    Mapping(Vec<(String, Shape)>),
    List(Vec<Shape>),
    Scalar(Scalar),
}

impl Shape {
    pub fn text(value: impl Into<String>) -> Self {
        Shape::Scalar(Scalar::Text(value.into()))
    }

    pub fn number(value: Option<f64>) -> Self {
        Shape::Scalar(value.map_or(Scalar::Null, Scalar::Number))
    }
}

/// Lowering into a [`Shape`].
pub trait ToShape {
    fn to_shape(&self) -> Shape;
}

impl ToShape for PerformanceRecord {
    fn to_shape(&self) -> Shape {
        let mut entries = vec![
            ("Outlet".to_string(), Shape::text(&self.outlet)),
            ("Type".to_string(), Shape::text(&self.kind)),
            ("URL".to_string(), Shape::text(&self.url)),
        ];
        for metric in Metric::ALL {
            entries.push((metric.label().to_string(), Shape::number(self.metric(metric))));
        }
        Shape::Mapping(entries)
    }
}

impl<T: ToShape> ToShape for [T] {
    fn to_shape(&self) -> Shape {
        Shape::List(self.iter().map(ToShape::to_shape).collect())
    }
}

impl<T: ToShape> ToShape for Vec<T> {
    fn to_shape(&self) -> Shape {
        self.as_slice().to_shape()
    }
}

impl ToShape for DateGroups {
    fn to_shape(&self) -> Shape {
        Shape::Mapping(
            self.iter()
                .map(|(date, records)| (date.clone(), records.to_shape()))
                .collect(),
        )
    }
}

/// Replace every non-finite number with null, at every nesting level.
pub fn sanitize(shape: Shape) -> Shape {
    match shape {
        Shape::Mapping(entries) => {
            Shape::Mapping(entries.into_iter().map(|(k, v)| (k, sanitize(v))).collect())
        }
        Shape::List(items) => Shape::List(items.into_iter().map(sanitize).collect()),
        Shape::Scalar(Scalar::Number(n)) if !n.is_finite() => Shape::Scalar(Scalar::Null),
        Shape::Scalar(scalar) => Shape::Scalar(scalar),
    }
}

/// Lower and sanitize in one step.
pub fn sanitized<T: ToShape + ?Sized>(value: &T) -> Shape {
    sanitize(value.to_shape())
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Shape::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Shape::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Shape::Scalar(Scalar::Null) => serializer.serialize_none(),
            Shape::Scalar(Scalar::Text(s)) => serializer.serialize_str(s),
            Shape::Scalar(Scalar::Number(n)) => serializer.serialize_f64(*n),
        }
    }
}
