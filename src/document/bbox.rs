//! Axis-aligned text boxes and their quadrilateral corner form.
//!
//! Box components keep the kind of number they were written with. An
//! integer `30` stays an integer through the corner math and prints as `30`;
//! a float `10.0` stays a float and prints as `10.0`.

use std::fmt;
use std::ops::Add;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single box component, integer or float as read from the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    Int(i128),
    Float(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Int(0)
    }
}

// int + int stays exact; anything involving a float is computed in f64.
impl Add for Scalar {
    type Output = Scalar;

    fn add(self, rhs: Scalar) -> Scalar {
        match (self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => match a.checked_add(b) {
                Some(sum) => Scalar::Int(sum),
                None => Scalar::Float(a as f64 + b as f64),
            },
            (a, b) => Scalar::Float(a.as_f64() + b.as_f64()),
        }
    }
}

/// Integers print as-is. Floats print in their shortest round-trip form and
/// always carry a fraction or exponent (`40.0`, `20.5`, `1e16`).
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Scalar::Int(v) => serializer.serialize_i128(v),
            Scalar::Float(v) => serializer.serialize_f64(v),
        }
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
        Ok(Scalar::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
        Ok(Scalar::from(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Scalar, E> {
        Ok(Scalar::Int(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
        Ok(Scalar::Float(v))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// A point in image coordinates (y grows downward).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord {
    pub x: Scalar,
    pub y: Scalar,
}

impl Coord {
    #[inline]
    pub fn new(x: impl Into<Scalar>, y: impl Into<Scalar>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// An axis-aligned box in `[x, y, width, height]` form.
///
/// Width and height are not validated; zero or negative sizes are carried
/// through unchanged so the corner math stays a pure function of the input.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BBoxXYWH {
    pub x: Scalar,
    pub y: Scalar,
    pub w: Scalar,
    pub h: Scalar,
}

impl BBoxXYWH {
    /// Creates a box from its top-left corner and size.
    #[inline]
    pub fn new(
        x: impl Into<Scalar>,
        y: impl Into<Scalar>,
        w: impl Into<Scalar>,
        h: impl Into<Scalar>,
    ) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            w: w.into(),
            h: h.into(),
        }
    }

    /// Returns the four corners clockwise from the top-left.
    pub fn corners(&self) -> Quad {
        let right = self.x + self.w;
        let bottom = self.y + self.h;
        Quad([
            Coord::new(self.x, self.y),
            Coord::new(right, self.y),
            Coord::new(right, bottom),
            Coord::new(self.x, bottom),
        ])
    }
}

// Serialized as a bare `[x, y, w, h]` array, matching the document format.
impl Serialize for BBoxXYWH {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y, self.w, self.h].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BBoxXYWH {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [x, y, w, h] = <[Scalar; 4]>::deserialize(deserializer)?;
        Ok(Self::new(x, y, w, h))
    }
}

/// Four corners of a text region, clockwise from the top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad(pub [Coord; 4]);

impl Quad {
    /// Flattens the corners into `x1, y1, ..., x4, y4` order.
    pub fn to_flat(&self) -> [Scalar; 8] {
        let [a, b, c, d] = self.0;
        [a.x, a.y, b.x, b.y, c.x, c.y, d.x, d.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_strings(quad: Quad) -> Vec<String> {
        quad.to_flat().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn corners_run_clockwise_from_top_left() {
        let quad = BBoxXYWH::new(10, 20, 30, 40).corners();
        assert_eq!(flat_strings(quad), ["10", "20", "40", "20", "40", "60", "10", "60"]);
    }

    #[test]
    fn negative_sizes_are_not_normalized() {
        let quad = BBoxXYWH::new(5, 5, -2, 0).corners();
        assert_eq!(quad.0[1], Coord::new(3, 5));
        assert_eq!(quad.0[2], Coord::new(3, 5));
        assert_eq!(quad.0[3], Coord::new(5, 5));
    }

    #[test]
    fn bbox_keeps_integer_and_float_components_apart() {
        let bbox: BBoxXYWH = serde_json::from_str("[10.0, 20.5, 30, 40]").unwrap();
        assert_eq!(bbox.x, Scalar::Float(10.0));
        assert_eq!(bbox.w, Scalar::Int(30));
        assert_eq!(
            flat_strings(bbox.corners()),
            ["10.0", "20.5", "40.0", "20.5", "40.0", "60.5", "10.0", "60.5"]
        );
    }

    #[test]
    fn large_integers_are_not_rounded() {
        let bbox: BBoxXYWH = serde_json::from_str("[9007199254740993, 0, 1, 1]").unwrap();
        assert_eq!(
            flat_strings(bbox.corners()),
            [
                "9007199254740993",
                "0",
                "9007199254740994",
                "0",
                "9007199254740994",
                "1",
                "9007199254740993",
                "1"
            ]
        );
    }

    #[test]
    fn integer_overflow_falls_back_to_float() {
        let sum = Scalar::Int(i128::MAX) + Scalar::Int(1);
        assert!(matches!(sum, Scalar::Float(_)));
    }

    #[test]
    fn bbox_rejects_wrong_arity_and_non_numbers() {
        assert!(serde_json::from_str::<BBoxXYWH>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<BBoxXYWH>("[1, 2, 3, 4, 5]").is_err());
        assert!(serde_json::from_str::<BBoxXYWH>("[1, \"2\", 3, 4]").is_err());
    }
}
