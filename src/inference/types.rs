//! Schema node types produced by inference

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// `$schema` URI written at the root of [`SchemaNode::to_json_schema`]
pub const DRAFT_04_SCHEMA_URI: &str = "http://json-schema.org/draft-04/schema#";

/// Ordered property map of an object node
pub type Properties = IndexMap<String, SchemaNode>;

/// Coarse JSON Schema type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl SchemaKind {
    /// Get the JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::String => "string",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
        }
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format refinement of an integer node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerFormat {
    /// Fits in a signed 32-bit integer
    Int32,
    /// Needs a signed 64-bit integer
    Int64,
}

impl IntegerFormat {
    /// Pick the narrowest format able to hold `value`
    pub fn for_value(value: i128) -> Self {
        if value > i128::from(i32::MAX) || value < i128::from(i32::MIN) {
            IntegerFormat::Int64
        } else {
            IntegerFormat::Int32
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntegerFormat::Int32 => "int32",
            IntegerFormat::Int64 => "int64",
        }
    }
}

/// Format refinement of a number node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// Single precision
    Float,
    /// Double precision
    Double,
}

impl NumberFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberFormat::Float => "float",
            NumberFormat::Double => "double",
        }
    }
}

/// Format refinement of a string node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    /// Base64 encoded bytes
    Byte,
    /// ISO 8601 date (YYYY-MM-DD)
    Date,
    /// ISO 8601 date-time
    DateTime,
    /// Time of day
    Time,
    /// Duration
    TimeSpan,
    /// GUID in any of its textual forms
    Guid,
    /// UUID
    Uuid,
    /// Email address
    Email,
    /// IPv4 address
    Ipv4,
    /// IPv6 address
    Ipv6,
    /// Absolute URI
    Uri,
}

impl StringFormat {
    /// Get the JSON Schema format string for this format
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Byte => "byte",
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
            StringFormat::Time => "time",
            StringFormat::TimeSpan => "time-span",
            StringFormat::Guid => "guid",
            StringFormat::Uuid => "uuid",
            StringFormat::Email => "email",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
            StringFormat::Uri => "uri",
        }
    }
}

impl std::fmt::Display for StringFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred schema for one value position
///
/// Formats live inside the variants they refine, so a node can never carry
/// a format that contradicts its kind.
#[derive(Debug, Clone)]
pub enum SchemaNode {
    Null,
    Boolean,
    Integer { format: IntegerFormat },
    Number { format: NumberFormat },
    String { format: Option<StringFormat> },
    Array { items: Box<SchemaNode> },
    Object { properties: Properties },
}

impl SchemaNode {
    /// Object node with no properties, used wherever a shape can't be resolved
    pub fn placeholder() -> Self {
        SchemaNode::Object {
            properties: Properties::new(),
        }
    }

    /// String node with the given format
    pub fn string(format: Option<StringFormat>) -> Self {
        SchemaNode::String { format }
    }

    /// Array node with the given item shape
    pub fn array(items: SchemaNode) -> Self {
        SchemaNode::Array {
            items: Box::new(items),
        }
    }

    /// Integer node sized for `value`
    pub fn integer(value: i128) -> Self {
        SchemaNode::Integer {
            format: IntegerFormat::for_value(value),
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaNode::Null => SchemaKind::Null,
            SchemaNode::Boolean => SchemaKind::Boolean,
            SchemaNode::Integer { .. } => SchemaKind::Integer,
            SchemaNode::Number { .. } => SchemaKind::Number,
            SchemaNode::String { .. } => SchemaKind::String,
            SchemaNode::Array { .. } => SchemaKind::Array,
            SchemaNode::Object { .. } => SchemaKind::Object,
        }
    }

    /// Format tag, if this node carries one
    pub fn format(&self) -> Option<&'static str> {
        match self {
            SchemaNode::Integer { format } => Some(format.as_str()),
            SchemaNode::Number { format } => Some(format.as_str()),
            SchemaNode::String { format } => format.map(|f| f.as_str()),
            _ => None,
        }
    }

    /// Object properties; `None` for non-object nodes
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            SchemaNode::Object { properties } => Some(properties),
            _ => None,
        }
    }

    /// Array item shape; `None` for non-array nodes
    pub fn items(&self) -> Option<&SchemaNode> {
        match self {
            SchemaNode::Array { items } => Some(items),
            _ => None,
        }
    }

    /// Look up a direct property by name
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties().and_then(|p| p.get(name))
    }

    /// Convert to a draft-04 JSON Schema document
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::Map::new();
        schema.insert(
            "$schema".to_string(),
            serde_json::Value::String(DRAFT_04_SCHEMA_URI.to_string()),
        );
        // Serializing into a Value can't fail: keys are strings and there are no floats.
        if let Ok(serde_json::Value::Object(body)) = serde_json::to_value(self) {
            schema.extend(body);
        }
        serde_json::Value::Object(schema)
    }
}

/// Object nodes are equal only when their properties match in order
impl PartialEq for SchemaNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SchemaNode::Null, SchemaNode::Null) => true,
            (SchemaNode::Boolean, SchemaNode::Boolean) => true,
            (SchemaNode::Integer { format: a }, SchemaNode::Integer { format: b }) => a == b,
            (SchemaNode::Number { format: a }, SchemaNode::Number { format: b }) => a == b,
            (SchemaNode::String { format: a }, SchemaNode::String { format: b }) => a == b,
            (SchemaNode::Array { items: a }, SchemaNode::Array { items: b }) => a == b,
            (SchemaNode::Object { properties: a }, SchemaNode::Object { properties: b }) => {
                a.iter().eq(b.iter())
            }
            _ => false,
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind().as_str())?;
        if let Some(format) = self.format() {
            map.serialize_entry("format", format)?;
        }
        match self {
            SchemaNode::Object { properties } if !properties.is_empty() => {
                map.serialize_entry("properties", properties)?;
            }
            SchemaNode::Array { items } => {
                map.serialize_entry("items", items)?;
            }
            _ => {}
        }
        map.end()
    }
}
