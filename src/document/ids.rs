//! Image identifiers as they appear in `images[].id` and
//! `annotations[].image_id`.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Key linking annotations to image records within one document.
///
/// Label files use integers almost everywhere, but nothing stops a producer
/// from writing negative or string ids, so both are accepted. Matching is
/// exact: `1` and `"1"` are different ids.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageId {
    Int(i128),
    Str(String),
}

impl From<u64> for ImageId {
    fn from(id: u64) -> Self {
        ImageId::Int(id.into())
    }
}

impl From<i64> for ImageId {
    fn from(id: i64) -> Self {
        ImageId::Int(id.into())
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        ImageId::Str(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        ImageId::Str(id)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageId::Int(id) => write!(f, "{}", id),
            ImageId::Str(id) => write!(f, "{:?}", id),
        }
    }
}

impl Serialize for ImageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ImageId::Int(id) => serializer.serialize_i128(*id),
            ImageId::Str(id) => serializer.serialize_str(id),
        }
    }
}

struct ImageIdVisitor;

impl<'de> Visitor<'de> for ImageIdVisitor {
    type Value = ImageId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or string image id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ImageId, E> {
        Ok(ImageId::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ImageId, E> {
        Ok(ImageId::from(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ImageId, E> {
        Ok(ImageId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ImageId, E> {
        Ok(ImageId::Str(v))
    }
}

impl<'de> Deserialize<'de> for ImageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ImageIdVisitor)
    }
}
