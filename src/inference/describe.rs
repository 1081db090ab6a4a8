//! Structural description of in-memory values
//!
//! [`Describe`] is implemented by every type the engine can walk. Value
//! inference goes through [`Describe::describe`]; type-only inference, used
//! when a collection is empty and only its element type is known, goes
//! through [`Describe::describe_type`].
//!
//! User structs opt in with [`describe_struct!`](crate::describe_struct) or
//! with a hand-written impl built on [`Describer::object`]:
//!
//! ```rust
//! use schema_infer::inference::{Describe, Describer, InferenceError, SchemaNode};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Describe for Point {
//!     fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
//!         let mut object = describer.object();
//!         object.field("x", &self.x)?;
//!         object.field("y", &self.y)?;
//!         Ok(object.finish())
//!     }
//! }
//! ```

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use indexmap::{IndexMap, IndexSet};
use serde_json::{Number, Value};

use super::config::InferenceConfig;
use super::error::InferenceError;
use super::formats::{SourceKind, classify};
use super::types::{IntegerFormat, NumberFormat, Properties, SchemaNode, StringFormat};

/// A value the inference engine can walk
pub trait Describe {
    /// Infer the schema of this value
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError>;

    /// Infer the schema of this type without a value
    ///
    /// Types whose shape can't be known statically keep the default, an
    /// object node with no properties.
    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        let _ = describer;
        SchemaNode::placeholder()
    }
}

/// Recursion context handed to [`Describe`] implementations
#[derive(Debug)]
pub struct Describer<'a> {
    config: &'a InferenceConfig,
    depth: usize,
    /// Types currently being described by a type-only walk
    type_stack: Vec<&'static str>,
}

impl<'a> Describer<'a> {
    pub fn new(config: &'a InferenceConfig) -> Self {
        Self {
            config,
            depth: 0,
            type_stack: Vec::new(),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        self.config
    }

    /// Nesting depth of the value currently being described
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Describe a value nested one level below the current one
    pub fn describe<T: Describe + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<SchemaNode, InferenceError> {
        let depth = self.depth + 1;
        if depth > self.config.max_depth {
            tracing::warn!(
                depth,
                max = self.config.max_depth,
                "nesting depth exceeded, input may be cyclic"
            );
            return Err(InferenceError::MaxDepthExceeded {
                depth,
                max: self.config.max_depth,
            });
        }

        self.depth = depth;
        let result = value.describe(self);
        self.depth -= 1;
        result
    }

    /// Describe a type without a value
    ///
    /// A type that is already being described further up the same walk
    /// resolves to the placeholder, so self-referential types terminate.
    pub fn describe_type<T: Describe + ?Sized>(&mut self) -> SchemaNode {
        let name = std::any::type_name::<T>();
        if self.type_stack.contains(&name) {
            tracing::debug!(type_name = name, "recursive type, using placeholder");
            return SchemaNode::placeholder();
        }

        self.type_stack.push(name);
        let node = T::describe_type(self);
        self.type_stack.pop();
        node
    }

    /// String node, classified when format resolution is enabled
    pub fn string(&self, value: &str, source: SourceKind) -> SchemaNode {
        if !self.config.resolve_format_for_strings {
            return SchemaNode::string(None);
        }
        SchemaNode::string(classify(value, source))
    }

    /// Array node whose item shape comes from the first element
    ///
    /// Later elements are never looked at. An empty sequence falls back to
    /// the static element type.
    pub fn sequence<'v, T, I>(&mut self, elements: I) -> Result<SchemaNode, InferenceError>
    where
        T: Describe + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        let items = match elements.into_iter().next() {
            Some(first) => self.describe(first)?,
            None => self.describe_type::<T>(),
        };
        Ok(SchemaNode::array(items))
    }

    /// Start describing a structured value field by field
    pub fn object(&mut self) -> ObjectDescriber<'_, 'a> {
        ObjectDescriber {
            describer: self,
            properties: Properties::new(),
        }
    }

    /// Object node from map entries, keyed in iteration order
    pub fn entries<'v, K, V, I>(&mut self, entries: I) -> Result<SchemaNode, InferenceError>
    where
        K: AsRef<str> + ?Sized + 'v,
        V: Describe + ?Sized + 'v,
        I: IntoIterator<Item = (&'v K, &'v V)>,
    {
        let mut object = self.object();
        for (key, value) in entries {
            let name: &str = key.as_ref();
            object.field(name, value)?;
        }
        Ok(object.finish())
    }
}

/// Builder for object nodes, see [`Describer::object`]
pub struct ObjectDescriber<'d, 'a> {
    describer: &'d mut Describer<'a>,
    properties: Properties,
}

impl ObjectDescriber<'_, '_> {
    /// Describe one field and add it under `name`
    pub fn field<T: Describe + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self, InferenceError> {
        let node = self.describer.describe(value)?;
        self.properties.insert(name.into(), node);
        Ok(self)
    }

    pub fn finish(self) -> SchemaNode {
        SchemaNode::Object {
            properties: self.properties,
        }
    }
}

/// Implement [`Describe`] for a struct from its field list
///
/// Fields are described in the order given, which should match declaration
/// order. Field types are needed for type-only inference.
///
/// ```rust
/// use schema_infer::describe_struct;
///
/// struct User {
///     name: String,
///     age: u32,
/// }
///
/// describe_struct!(User { name: String, age: u32 });
/// ```
#[macro_export]
macro_rules! describe_struct {
    ($ty:ty { $($field:ident : $field_ty:ty),* $(,)? }) => {
        impl $crate::inference::Describe for $ty {
            fn describe(
                &self,
                describer: &mut $crate::inference::Describer<'_>,
            ) -> ::std::result::Result<$crate::inference::SchemaNode, $crate::inference::InferenceError> {
                #[allow(unused_mut)]
                let mut object = describer.object();
                $( object.field(stringify!($field), &self.$field)?; )*
                Ok(object.finish())
            }

            fn describe_type(
                describer: &mut $crate::inference::Describer<'_>,
            ) -> $crate::inference::SchemaNode {
                let _ = &describer;
                #[allow(unused_mut)]
                let mut properties = $crate::inference::Properties::new();
                $(
                    properties.insert(
                        stringify!($field).to_string(),
                        describer.describe_type::<$field_ty>(),
                    );
                )*
                $crate::inference::SchemaNode::Object { properties }
            }
        }
    };
}

macro_rules! describe_as {
    ($node:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(&self, _: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
                    Ok($node)
                }

                fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
                    $node
                }
            }
        )+
    };
}

// Integers are sized by value; the static type decides only when there is no value.
macro_rules! describe_integer {
    ($node:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe(&self, _: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
                    Ok(SchemaNode::integer(i128::try_from(*self).unwrap_or(i128::MAX)))
                }

                fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
                    $node
                }
            }
        )+
    };
}

macro_rules! describe_forward {
    ($($ty:ident),+) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
                    (**self).describe(describer)
                }

                fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
                    describer.describe_type::<T>()
                }
            }
        )+
    };
}

macro_rules! describe_sequence {
    ($($ty:ident),+) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
                    describer.sequence(self)
                }

                fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
                    SchemaNode::array(describer.describe_type::<T>())
                }
            }
        )+
    };
}

macro_rules! describe_map {
    ($($ty:ident),+) => {
        $(
            impl<K: AsRef<str>, V: Describe, S> Describe for $ty<K, V, S> {
                fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
                    describer.entries(self.iter())
                }
            }
        )+
    };
}

describe_as!(SchemaNode::Boolean => bool);
describe_as!(SchemaNode::Null => ());
describe_as!(SchemaNode::Number { format: NumberFormat::Float } => f32);
describe_as!(SchemaNode::Number { format: NumberFormat::Double } => f64);
describe_as!(SchemaNode::Number { format: NumberFormat::Float } => rust_decimal::Decimal);
// A single u8 is a byte, so `Vec<u8>` is an array of bytes
describe_as!(SchemaNode::string(Some(StringFormat::Byte)) => u8, bytes::Bytes, bytes::BytesMut);
describe_as!(SchemaNode::string(Some(StringFormat::Guid)) => uuid::Uuid);
describe_as!(SchemaNode::string(Some(StringFormat::Uri)) => url::Url);
describe_as!(SchemaNode::string(Some(StringFormat::TimeSpan)) => Duration, chrono::TimeDelta);
describe_as!(
    SchemaNode::string(Some(StringFormat::DateTime)) =>
    SystemTime,
    chrono::NaiveDateTime,
    chrono::NaiveDate,
    chrono::NaiveTime,
);

describe_integer!(SchemaNode::Integer { format: IntegerFormat::Int32 } => i8, i16, i32, u16);
describe_integer!(
    SchemaNode::Integer { format: IntegerFormat::Int64 } =>
    i64, u32, u64, i128, u128, isize, usize,
);

describe_forward!(Box, Rc, Arc);
describe_sequence!(Vec, VecDeque, LinkedList, BTreeSet);
describe_map!(HashMap, IndexMap);

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe(&self, _: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        Ok(SchemaNode::string(Some(StringFormat::DateTime)))
    }

    fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::string(Some(StringFormat::DateTime))
    }
}

impl Describe for str {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        Ok(describer.string(self, SourceKind::Native))
    }

    fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::string(None)
    }
}

impl Describe for String {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        Ok(describer.string(self, SourceKind::Native))
    }

    fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::string(None)
    }
}

impl Describe for char {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        let mut buf = [0u8; 4];
        Ok(describer.string(self.encode_utf8(&mut buf), SourceKind::Native))
    }

    fn describe_type(_: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::string(None)
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        (**self).describe(describer)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        describer.describe_type::<T>()
    }
}

impl<T: Describe + ToOwned + ?Sized> Describe for Cow<'_, T> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        (**self).describe(describer)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        describer.describe_type::<T>()
    }
}

/// `None` is a present null value; the type resolves to the wrapped type
impl<T: Describe> Describe for Option<T> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        match self {
            Some(value) => value.describe(describer),
            None => Ok(SchemaNode::Null),
        }
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        describer.describe_type::<T>()
    }
}

/// A value that is mutably borrowed elsewhere can't be inspected and
/// degrades to the placeholder
impl<T: Describe + ?Sized> Describe for RefCell<T> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        match self.try_borrow() {
            Ok(value) => value.describe(describer),
            Err(_) => Ok(SchemaNode::placeholder()),
        }
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        describer.describe_type::<T>()
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.sequence(self)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::array(describer.describe_type::<T>())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.sequence(self)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::array(describer.describe_type::<T>())
    }
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.sequence(self)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::array(describer.describe_type::<T>())
    }
}

impl<T: Describe, S> Describe for IndexSet<T, S> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.sequence(self)
    }

    fn describe_type(describer: &mut Describer<'_>) -> SchemaNode {
        SchemaNode::array(describer.describe_type::<T>())
    }
}

impl<K: AsRef<str>, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.entries(self.iter())
    }
}

impl Describe for serde_json::Map<String, Value> {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        describer.entries(self.iter())
    }
}

/// Parsed JSON follows the same dispatch as native values. A JSON array has
/// no static element type, so an empty one gets the placeholder items.
impl Describe for Value {
    fn describe(&self, describer: &mut Describer<'_>) -> Result<SchemaNode, InferenceError> {
        match self {
            Value::Array(items) => describer.sequence(items),
            Value::Bool(_) => Ok(SchemaNode::Boolean),
            Value::Number(number) => Ok(describe_number(number)),
            Value::Null => Ok(SchemaNode::Null),
            Value::Object(map) => map.describe(describer),
            Value::String(text) => Ok(describer.string(text, SourceKind::JsonToken)),
        }
    }
}

fn describe_number(number: &Number) -> SchemaNode {
    if let Some(value) = number.as_i64() {
        SchemaNode::integer(value.into())
    } else if let Some(value) = number.as_u64() {
        SchemaNode::integer(value.into())
    } else {
        // JSON text carries no precision; parsed floats are f64
        SchemaNode::Number {
            format: NumberFormat::Double,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn describe<T: Describe + ?Sized>(value: &T) -> SchemaNode {
        let config = InferenceConfig::default();
        value.describe(&mut Describer::new(&config)).unwrap()
    }

    fn describe_type<T: Describe + ?Sized>() -> SchemaNode {
        let config = InferenceConfig::default();
        Describer::new(&config).describe_type::<T>()
    }

    struct Child {
        child_integer: i32,
        child_date_time: chrono::DateTime<Utc>,
        child_time_span: Duration,
    }

    describe_struct!(Child {
        child_integer: i32,
        child_date_time: chrono::DateTime<Utc>,
        child_time_span: Duration,
    });

    struct Tree {
        label: String,
        children: Vec<Tree>,
    }

    describe_struct!(Tree {
        label: String,
        children: Vec<Tree>,
    });

    #[test]
    fn test_primitives() {
        assert_eq!(describe(&true), SchemaNode::Boolean);
        assert_eq!(describe(&()), SchemaNode::Null);
        assert_eq!(
            describe(&10.0f32),
            SchemaNode::Number {
                format: NumberFormat::Float
            }
        );
        assert_eq!(
            describe(&std::f64::consts::E),
            SchemaNode::Number {
                format: NumberFormat::Double
            }
        );
        assert_eq!(describe(&9i64), SchemaNode::integer(9));
        assert_eq!(
            describe(&i64::MAX),
            SchemaNode::Integer {
                format: IntegerFormat::Int64
            }
        );
        assert_eq!(
            describe(&u128::MAX),
            SchemaNode::Integer {
                format: IntegerFormat::Int64
            }
        );
    }

    #[test]
    fn test_bytes_and_decimals() {
        let byte = SchemaNode::string(Some(StringFormat::Byte));
        assert_eq!(describe(&7u8), byte);
        assert_eq!(describe_type::<u8>(), byte);
        assert_eq!(describe(&vec![1u8, 2, 3]), SchemaNode::array(byte.clone()));
        assert_eq!(describe_type::<[u8; 4]>(), SchemaNode::array(byte));

        let float = SchemaNode::Number {
            format: NumberFormat::Float,
        };
        assert_eq!(describe(&rust_decimal::Decimal::new(1999, 2)), float);
        assert_eq!(describe_type::<Option<rust_decimal::Decimal>>(), float);
    }

    #[test]
    fn test_special_kinds() {
        let guid = uuid::Uuid::parse_str("9579ec16-0f66-486c-a056-2f89f2e0c2dc").unwrap();
        assert_eq!(
            describe(&guid),
            SchemaNode::string(Some(StringFormat::Guid))
        );
        let uri = url::Url::parse("http://localhost:80/abc?a=5").unwrap();
        assert_eq!(describe(&uri), SchemaNode::string(Some(StringFormat::Uri)));
        assert_eq!(
            describe(&Duration::from_millis(999)),
            SchemaNode::string(Some(StringFormat::TimeSpan))
        );
        assert_eq!(
            describe(&bytes::Bytes::from_static(&[1, 2, 3])),
            SchemaNode::string(Some(StringFormat::Byte))
        );
        assert_eq!(
            describe(&Utc.with_ymd_and_hms(2018, 2, 17, 0, 0, 0).unwrap()),
            SchemaNode::string(Some(StringFormat::DateTime))
        );
    }

    #[test]
    fn test_strings_are_classified() {
        assert_eq!(describe("test"), SchemaNode::string(None));
        assert_eq!(describe(&'c'), SchemaNode::string(None));
        assert_eq!(
            describe(&String::from("https://test")),
            SchemaNode::string(Some(StringFormat::Uri))
        );
    }

    #[test]
    fn test_option() {
        assert_eq!(describe(&None::<i32>), SchemaNode::Null);
        assert_eq!(describe(&Some(4)), SchemaNode::integer(4));
        assert_eq!(describe_type::<Option<f64>>(), describe_type::<f64>());
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            describe(&vec![1, 2]),
            SchemaNode::array(SchemaNode::integer(1))
        );
        assert_eq!(
            describe(&["a1"]),
            SchemaNode::array(SchemaNode::string(None))
        );
        // Empty collections fall back to the element type
        assert_eq!(
            describe(&Vec::<i64>::new()),
            SchemaNode::array(SchemaNode::Integer {
                format: IntegerFormat::Int64
            })
        );
        assert_eq!(
            describe(&VecDeque::<uuid::Uuid>::new()),
            SchemaNode::array(SchemaNode::string(Some(StringFormat::Guid)))
        );
    }

    #[test]
    fn test_struct_fields_in_declaration_order() {
        let child = Child {
            child_integer: 4,
            child_date_time: Utc.with_ymd_and_hms(2018, 2, 17, 0, 0, 0).unwrap(),
            child_time_span: Duration::from_millis(999),
        };

        let node = describe(&child);
        let names: Vec<&str> = node
            .properties()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            names,
            vec!["child_integer", "child_date_time", "child_time_span"]
        );
        assert_eq!(node, describe_type::<Child>());
    }

    #[test]
    fn test_recursive_type_terminates() {
        let node = describe_type::<Tree>();
        let children = node.property("children").unwrap();
        assert_eq!(children.items(), Some(&SchemaNode::placeholder()));

        let tree = Tree {
            label: "root".to_string(),
            children: vec![Tree {
                label: "leaf".to_string(),
                children: Vec::new(),
            }],
        };
        let node = describe(&tree);
        let leaf = node.property("children").unwrap().items().unwrap();
        assert_eq!(leaf.property("label"), Some(&SchemaNode::string(None)));
    }

    #[test]
    fn test_maps() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 1);
        let node = describe(&map);
        let names: Vec<&str> = node
            .properties()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["a", "b"]);

        let mut map: HashMap<&str, bool> = HashMap::new();
        map.insert("flag", true);
        assert_eq!(describe(&map).property("flag"), Some(&SchemaNode::Boolean));

        // Map shapes are only known from entries
        assert_eq!(
            describe_type::<HashMap<String, i32>>(),
            SchemaNode::placeholder()
        );
    }

    #[test]
    fn test_cycle_hits_depth_limit() {
        struct Link {
            next: Option<Rc<RefCell<Link>>>,
        }

        impl Describe for Link {
            fn describe(
                &self,
                describer: &mut Describer<'_>,
            ) -> Result<SchemaNode, InferenceError> {
                let mut object = describer.object();
                object.field("next", &self.next)?;
                Ok(object.finish())
            }
        }

        let node = Rc::new(RefCell::new(Link { next: None }));
        node.borrow_mut().next = Some(node.clone());

        let config = InferenceConfig::builder().max_depth(16).build();
        let result = node.describe(&mut Describer::new(&config));
        assert_eq!(
            result,
            Err(InferenceError::MaxDepthExceeded { depth: 17, max: 16 })
        );

        node.borrow_mut().next = None;
    }
}
