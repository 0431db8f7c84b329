//! The dynamic [`Value`] type.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::{Array, Collection, CollectionKind, Mapping, MappingKind, Record};
use crate::{ElementType, Result};

/// Shared, interiorly mutable handle used by containers and arrays.
///
/// Records carry their own interior mutability and are shared as `Rc<Record>`.
pub type Shared<T> = Rc<RefCell<T>>;

/// A node in an object graph.
///
/// Equality and hashing follow reference semantics: scalars compare by value
/// (floats by bit pattern), handles compare by identity. Use
/// [`Value::structural_eq`] to compare contents.
#[derive(Clone)]
pub enum Value {
    /// The absence marker.
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(Rc<str>),
    Collection(Shared<Collection>),
    Mapping(Shared<Mapping>),
    Array(Shared<Array>),
    Record(Rc<Record>),
    /// A function value or live resource; not part of any copyable category.
    Opaque(Opaque),
}

/// A foreign value carried through a graph by handle.
#[derive(Clone)]
pub struct Opaque {
    type_name: Rc<str>,
    handle: Rc<dyn Any>,
}

impl Opaque {
    /// Wraps `value` under a descriptive type name.
    pub fn new<T: Any>(type_name: &str, value: T) -> Self {
        Self {
            type_name: Rc::from(type_name),
            handle: Rc::new(value),
        }
    }

    /// Returns the descriptive type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrows the wrapped value if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.handle.downcast_ref()
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.handle) as *const () as usize
    }
}

impl Value {
    /// Creates a string value.
    #[must_use]
    pub fn str(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }

    /// Creates an array-backed list.
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Collection::from_values(CollectionKind::List, items).into()
    }

    /// Creates a double-ended queue.
    pub fn deque(items: impl IntoIterator<Item = Value>) -> Self {
        Collection::from_values(CollectionKind::Deque, items).into()
    }

    /// Creates an unordered hash set.
    pub fn hash_set(items: impl IntoIterator<Item = Value>) -> Self {
        Collection::from_values(CollectionKind::HashSet, items).into()
    }

    /// Creates an insertion-ordered set.
    pub fn index_set(items: impl IntoIterator<Item = Value>) -> Self {
        Collection::from_values(CollectionKind::IndexSet, items).into()
    }

    /// Creates an unordered hash map.
    pub fn hash_map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Mapping::from_entries(MappingKind::HashMap, entries).into()
    }

    /// Creates an insertion-ordered map.
    pub fn index_map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Mapping::from_entries(MappingKind::IndexMap, entries).into()
    }

    /// Creates a fixed-size array, checking every element against `element_type`.
    pub fn array(element_type: ElementType, items: Vec<Value>) -> Result<Self> {
        Ok(Array::from_values(element_type, items)?.into())
    }

    /// Wraps a record in a fresh handle.
    #[must_use]
    pub fn record(record: Record) -> Self {
        record.into()
    }

    /// Wraps a foreign value.
    pub fn opaque<T: Any>(type_name: &str, value: T) -> Self {
        Self::Opaque(Opaque::new(type_name, value))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for the absence marker and every immutable scalar.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null
                | Self::Bool(_)
                | Self::Byte(_)
                | Self::Short(_)
                | Self::Int(_)
                | Self::Long(_)
                | Self::Float(_)
                | Self::Double(_)
                | Self::Char(_)
                | Self::Str(_)
        )
    }

    /// Describes the runtime type, e.g. `int`, `List`, or a record type name.
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Self::Null => "null".into(),
            Self::Bool(_) => "boolean".into(),
            Self::Byte(_) => "byte".into(),
            Self::Short(_) => "short".into(),
            Self::Int(_) => "int".into(),
            Self::Long(_) => "long".into(),
            Self::Float(_) => "float".into(),
            Self::Double(_) => "double".into(),
            Self::Char(_) => "char".into(),
            Self::Str(_) => "String".into(),
            Self::Collection(c) => match c.try_borrow() {
                Ok(c) => format!("{:?}", c.kind()),
                Err(_) => "Collection".into(),
            },
            Self::Mapping(m) => match m.try_borrow() {
                Ok(m) => format!("{:?}", m.kind()),
                Err(_) => "Mapping".into(),
            },
            Self::Array(a) => match a.try_borrow() {
                Ok(a) => format!("{}[]", a.element_type()),
                Err(_) => "Array".into(),
            },
            Self::Record(r) => r.record_type().name().to_string(),
            Self::Opaque(o) => o.type_name().to_string(),
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_collection(&self) -> Option<&Shared<Collection>> {
        match self {
            Self::Collection(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&Shared<Mapping>> {
        match self {
            Self::Mapping(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Shared<Array>> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_record(&self) -> Option<&Rc<Record>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Address of the underlying allocation for handle variants.
    ///
    /// Scalars return `None`. Two values with the same address are the same
    /// object.
    #[must_use]
    pub fn handle_addr(&self) -> Option<usize> {
        match self {
            Self::Collection(c) => Some(Rc::as_ptr(c) as usize),
            Self::Mapping(m) => Some(Rc::as_ptr(m) as usize),
            Self::Array(a) => Some(Rc::as_ptr(a) as usize),
            Self::Record(r) => Some(Rc::as_ptr(r) as usize),
            Self::Opaque(o) => Some(o.addr()),
            _ => None,
        }
    }

    /// Returns true if both values are the same object.
    ///
    /// Strings are the same object only when they share one allocation; other
    /// scalars have no identity and fall back to value equality.
    #[must_use]
    pub fn same_identity(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Rc::ptr_eq(a, b),
            _ => match (self.handle_addr(), other.handle_addr()) {
                (Some(a), Some(b)) => a == b,
                (None, None) => self == other,
                _ => false,
            },
        }
    }

    /// Deep value equality.
    ///
    /// Containers must have the same kind, arrays the same element type and
    /// records the same record type. Cycles are compared coinductively: a pair
    /// of handles already under comparison is assumed equal.
    #[must_use]
    pub fn structural_eq(&self, other: &Value) -> bool {
        let mut seen = HashSet::new();
        structural_eq_inner(self, other, &mut seen)
    }
}

fn structural_eq_inner(a: &Value, b: &Value, seen: &mut HashSet<(usize, usize)>) -> bool {
    if let (Some(x), Some(y)) = (a.handle_addr(), b.handle_addr()) {
        if !seen.insert((x, y)) {
            return true;
        }
    }

    match (a, b) {
        (Value::Collection(x), Value::Collection(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            if x.kind() != y.kind() || x.len() != y.len() {
                return false;
            }
            if x.kind() == CollectionKind::HashSet {
                let right: Vec<&Value> = y.iter().collect();
                x.iter()
                    .all(|l| right.iter().any(|&r| trial_eq(&[(l, r)], seen)))
            } else {
                x.iter()
                    .zip(y.iter())
                    .all(|(l, r)| structural_eq_inner(l, r, seen))
            }
        }
        (Value::Mapping(x), Value::Mapping(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            if x.kind() != y.kind() || x.len() != y.len() {
                return false;
            }
            match x.kind() {
                MappingKind::HashMap => {
                    let right: Vec<(&Value, &Value)> = y.iter().collect();
                    x.iter().all(|(xk, xv)| {
                        right
                            .iter()
                            .any(|&(yk, yv)| trial_eq(&[(xk, yk), (xv, yv)], seen))
                    })
                }
                MappingKind::IndexMap => x.iter().zip(y.iter()).all(|((xk, xv), (yk, yv))| {
                    structural_eq_inner(xk, yk, seen) && structural_eq_inner(xv, yv, seen)
                }),
            }
        }
        (Value::Array(x), Value::Array(y)) => {
            let (x, y) = (x.borrow(), y.borrow());
            x.element_type() == y.element_type()
                && x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|(l, r)| structural_eq_inner(l, r, seen))
        }
        (Value::Record(x), Value::Record(y)) => {
            Rc::ptr_eq(x.record_type(), y.record_type())
                && x.slots()
                    .iter()
                    .zip(&y.slots())
                    .all(|(l, r)| structural_eq_inner(l, r, seen))
        }
        (Value::Opaque(_), Value::Opaque(_)) => a.same_identity(b),
        _ => a == b,
    }
}

// Unordered matching may try several candidates; only a successful match
// keeps the pairs it assumed equal.
fn trial_eq(pairs: &[(&Value, &Value)], seen: &mut HashSet<(usize, usize)>) -> bool {
    let mut trial = seen.clone();
    let matched = pairs
        .iter()
        .all(|(l, r)| structural_eq_inner(l, r, &mut trial));
    if matched {
        *seen = trial;
    }
    matched
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            _ => match (self.handle_addr(), other.handle_addr()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(b) => b.hash(state),
            Self::Byte(i) => i.hash(state),
            Self::Short(i) => i.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Long(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Double(d) => d.to_bits().hash(state),
            Self::Char(c) => c.hash(state),
            Self::Str(s) => s.hash(state),
            _ => self.handle_addr().hash(state),
        }
    }
}

// Handles print shallowly so cyclic graphs can be formatted.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Byte(i) => write!(f, "Byte({i})"),
            Self::Short(i) => write!(f, "Short({i})"),
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Long(i) => write!(f, "Long({i})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Double(x) => write!(f, "Double({x})"),
            Self::Char(c) => write!(f, "Char({c:?})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Collection(c) => match c.try_borrow() {
                Ok(c) => write!(f, "{:?}(len={})", c.kind(), c.len()),
                Err(_) => f.write_str("Collection(<borrowed>)"),
            },
            Self::Mapping(m) => match m.try_borrow() {
                Ok(m) => write!(f, "{:?}(len={})", m.kind(), m.len()),
                Err(_) => f.write_str("Mapping(<borrowed>)"),
            },
            Self::Array(_) | Self::Record(_) | Self::Opaque(_) => {
                write!(f, "{}@{:#x}", self.type_name(), self.handle_addr().unwrap_or(0))
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(Rc::from(s))
    }
}

impl From<Collection> for Value {
    fn from(c: Collection) -> Self {
        Self::Collection(Rc::new(RefCell::new(c)))
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Self::Mapping(Rc::new(RefCell::new(m)))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Self::Array(Rc::new(RefCell::new(a)))
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(Rc::new(r))
    }
}
