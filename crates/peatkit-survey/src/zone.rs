//! Management zones and their attribute mappings.

use crate::Polygon;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a management zone, unique within its [`ZoneSet`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ZoneId(pub u32);

impl ZoneId {
    /// Create a new zone id.
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "z{}", self.0)
    }
}

/// A value in a zone's attribute mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Floating point value.
    Float(f64),
    /// Integer value.
    Integer(i64),
    /// Text value (e.g. a vegetation community code).
    Text(String),
    /// Boolean flag.
    Bool(bool),
}

impl AttributeValue {
    /// Convert to f64 if the value is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Borrow the text value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to bool if the value is boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

/// A management zone: a polygon plus its measured attributes.
///
/// Typical attributes for peatland condition work are `depth_mean` (m),
/// `vegetation_cover_pct` (0-100) and `hydrology_index` (0-1), but the
/// mapping is open: classification rules name the attributes they test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Human-readable zone name.
    pub name: String,
    /// Zone boundary.
    pub polygon: Polygon,
    /// Attribute mapping used by classification rules.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Zone {
    /// Create a zone with an empty attribute mapping.
    pub fn new(id: u32, name: impl Into<String>, polygon: Polygon) -> Self {
        Self {
            id: ZoneId::new(id),
            name: name.into(),
            polygon,
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute, builder style.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up a numeric attribute.
    pub fn numeric_attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).and_then(AttributeValue::as_f64)
    }
}

/// An immutable collection of zones, ordered by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    /// Create a zone set, taking ownership of the zones.
    pub fn new(mut zones: Vec<Zone>) -> Self {
        zones.sort_by_key(|z| z.id);
        Self { zones }
    }

    /// The zones, ordered by id.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Whether the set holds no zones.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Look up a zone by id.
    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones
            .binary_search_by_key(&id, |z| z.id)
            .ok()
            .map(|i| &self.zones[i])
    }
}
