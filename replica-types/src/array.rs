use crate::{ElementType, Error, Result, Value};

/// A fixed-length array with a declared element type.
///
/// The length is set at construction. Every write is checked against the
/// element type.
#[derive(Debug, Clone)]
pub struct Array {
    element_type: ElementType,
    items: Box<[Value]>,
}

impl Array {
    /// Allocates an array of `len` slots holding the element type's zero value.
    #[must_use]
    pub fn new(element_type: ElementType, len: usize) -> Self {
        let items = vec![element_type.zero_value(); len].into_boxed_slice();
        Self {
            element_type,
            items,
        }
    }

    /// Builds an array from `values`, rejecting any value the element type
    /// does not accept.
    pub fn from_values(element_type: ElementType, values: Vec<Value>) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !element_type.accepts(v)) {
            return Err(Error::ElementType {
                expected: element_type.to_string(),
                found: bad.type_name(),
            });
        }
        Ok(Self {
            element_type,
            items: values.into_boxed_slice(),
        })
    }

    #[must_use]
    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Writes a slot, returning the value it held.
    pub fn set(&mut self, index: usize, value: Value) -> Result<Value> {
        let len = self.items.len();
        if !self.element_type.accepts(&value) {
            return Err(Error::ElementType {
                expected: self.element_type.to_string(),
                found: value.type_name(),
            });
        }
        let slot = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, value))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}
