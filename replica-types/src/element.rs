//! Declared types for array elements and record fields.

use std::fmt;
use std::rc::Rc;

use crate::Value;

/// The declared type of an array slot or record field.
///
/// Primitive types (`Bool` through `Char`) reject the absence marker; every
/// other type is a reference type and accepts [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Accepts any value.
    Any,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Str,
    Collection,
    Mapping,
    /// Array whose element type is exactly the inner type.
    Array(Box<ElementType>),
    /// Record of the named type or one of its subtypes.
    Record(Rc<str>),
}

impl ElementType {
    /// Shorthand for a record type reference.
    #[must_use]
    pub fn record(name: &str) -> Self {
        Self::Record(Rc::from(name))
    }

    /// Shorthand for an array type.
    #[must_use]
    pub fn array_of(element: ElementType) -> Self {
        Self::Array(Box::new(element))
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Byte
                | Self::Short
                | Self::Int
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::Char
        )
    }

    /// The value a slot of this type holds before anything is written to it.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::Bool => Value::Bool(false),
            Self::Byte => Value::Byte(0),
            Self::Short => Value::Short(0),
            Self::Int => Value::Int(0),
            Self::Long => Value::Long(0),
            Self::Float => Value::Float(0.0),
            Self::Double => Value::Double(0.0),
            Self::Char => Value::Char('\0'),
            _ => Value::Null,
        }
    }

    /// Returns true if `value` may be stored in a slot of this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _) => true,
            (ty, Value::Null) => !ty.is_primitive(),
            (Self::Bool, Value::Bool(_))
            | (Self::Byte, Value::Byte(_))
            | (Self::Short, Value::Short(_))
            | (Self::Int, Value::Int(_))
            | (Self::Long, Value::Long(_))
            | (Self::Float, Value::Float(_))
            | (Self::Double, Value::Double(_))
            | (Self::Char, Value::Char(_))
            | (Self::Str, Value::Str(_))
            | (Self::Collection, Value::Collection(_))
            | (Self::Mapping, Value::Mapping(_)) => true,
            (Self::Array(inner), Value::Array(array)) => array
                .try_borrow()
                .map(|array| array.element_type() == inner.as_ref())
                .unwrap_or(false),
            (Self::Record(name), Value::Record(record)) => {
                record.record_type().is_subtype_of(name)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Bool => f.write_str("boolean"),
            Self::Byte => f.write_str("byte"),
            Self::Short => f.write_str("short"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Float => f.write_str("float"),
            Self::Double => f.write_str("double"),
            Self::Char => f.write_str("char"),
            Self::Str => f.write_str("String"),
            Self::Collection => f.write_str("Collection"),
            Self::Mapping => f.write_str("Mapping"),
            Self::Array(inner) => write!(f, "{inner}[]"),
            Self::Record(name) => f.write_str(name),
        }
    }
}
