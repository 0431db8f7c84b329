//! Runtime-described composite records.
//!
//! A [`RecordType`] declares fields and may extend a parent type. The full
//! field layout of a type is its own declared fields followed by each
//! ancestor's, most-derived first. A field may shadow an ancestor field of
//! the same name; both occupy their own slot.

use std::cell::RefCell;
use std::iter;
use std::rc::Rc;

use crate::{ElementType, Error, Result, Value};

/// Whether a field may change after construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mutability {
    #[default]
    Mutable,
    /// Assigned only by a constructor.
    Final,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// How instances of a record type come into existence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Construction {
    /// A no-argument constructor exists.
    #[default]
    Default,
    /// Instances can only be built from explicit field values.
    NoDefault,
    /// The type has no instances of its own.
    Abstract,
}

/// A field declared on a record type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    name: Rc<str>,
    element_type: ElementType,
    mutability: Mutability,
    visibility: Visibility,
    initializer: Option<fn() -> Value>,
}

impl FieldDef {
    /// Declares a public, mutable field.
    #[must_use]
    pub fn new(name: &str, element_type: ElementType) -> Self {
        Self {
            name: Rc::from(name),
            element_type,
            mutability: Mutability::Mutable,
            visibility: Visibility::Public,
            initializer: None,
        }
    }

    /// Marks the field immutable after construction.
    #[must_use]
    pub fn final_field(mut self) -> Self {
        self.mutability = Mutability::Final;
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Sets the value the no-argument constructor assigns.
    #[must_use]
    pub fn with_initializer(mut self, initializer: fn() -> Value) -> Self {
        self.initializer = Some(initializer);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn element_type(&self) -> &ElementType {
        &self.element_type
    }

    #[must_use]
    pub fn mutability(&self) -> Mutability {
        self.mutability
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn is_final(&self) -> bool {
        self.mutability == Mutability::Final
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }

    /// The value a freshly constructed instance holds in this field.
    #[must_use]
    pub fn initial_value(&self) -> Value {
        match self.initializer {
            Some(init) => init(),
            None => self.element_type.zero_value(),
        }
    }
}

/// A field together with its declaring type and slot position.
#[derive(Debug, Clone)]
pub struct FieldSlot {
    owner: Rc<str>,
    index: usize,
    def: FieldDef,
}

impl FieldSlot {
    /// Name of the type that declares the field.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn def(&self) -> &FieldDef {
        &self.def
    }
}

/// Descriptor of a composite record type.
#[derive(Debug)]
pub struct RecordType {
    name: Rc<str>,
    parent: Option<Rc<RecordType>>,
    fields: Vec<FieldDef>,
    construction: Construction,
}

impl RecordType {
    #[must_use]
    pub fn builder(name: &str) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: Rc::from(name),
            parent: None,
            fields: Vec::new(),
            construction: Construction::Default,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Rc<RecordType>> {
        self.parent.as_ref()
    }

    /// Fields declared on this type only.
    #[must_use]
    pub fn declared_fields(&self) -> &[FieldDef] {
        &self.fields
    }

    #[must_use]
    pub fn construction(&self) -> Construction {
        self.construction
    }

    /// This type followed by each ancestor.
    pub fn ancestry(&self) -> impl Iterator<Item = &RecordType> {
        iter::successors(Some(self), |ty| ty.parent.as_deref())
    }

    /// Returns true if this type is `name` or extends it.
    #[must_use]
    pub fn is_subtype_of(&self, name: &str) -> bool {
        self.ancestry().any(|ty| &*ty.name == name)
    }

    /// Enumerates every field of the type, inherited ones included.
    ///
    /// Walks the whole inheritance chain on each call.
    #[must_use]
    pub fn layout(&self) -> Vec<FieldSlot> {
        self.ancestry()
            .flat_map(|ty| {
                ty.fields
                    .iter()
                    .map(move |def| (Rc::clone(&ty.name), def.clone()))
            })
            .enumerate()
            .map(|(index, (owner, def))| FieldSlot { owner, index, def })
            .collect()
    }

    /// Runs the no-argument constructor.
    pub fn instantiate(self: &Rc<Self>) -> Result<Record> {
        self.instantiate_with_layout(self.layout().into())
    }

    /// Runs the no-argument constructor using a layout computed earlier by
    /// [`RecordType::layout`] on this same type.
    pub fn instantiate_with_layout(self: &Rc<Self>, layout: Rc<[FieldSlot]>) -> Result<Record> {
        match self.construction {
            Construction::Default => {}
            Construction::NoDefault => {
                return Err(self.not_constructible("no no-argument constructor"));
            }
            Construction::Abstract => return Err(self.not_constructible("type is abstract")),
        }
        let slots = layout.iter().map(|slot| slot.def.initial_value()).collect();
        Ok(Record {
            record_type: Rc::clone(self),
            layout,
            slots: RefCell::new(slots),
        })
    }

    /// Builds an instance from explicit field values, the way an all-arguments
    /// constructor would. Final fields may be assigned here.
    ///
    /// Fields not named keep their initial value. Names resolve to the
    /// most-derived field.
    pub fn construct<'a>(
        self: &Rc<Self>,
        values: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Record> {
        if self.construction == Construction::Abstract {
            return Err(self.not_constructible("type is abstract"));
        }
        let layout: Rc<[FieldSlot]> = self.layout().into();
        let slots = layout.iter().map(|slot| slot.def.initial_value()).collect();
        let record = Record {
            record_type: Rc::clone(self),
            layout,
            slots: RefCell::new(slots),
        };
        for (name, value) in values {
            let index = record.index_of(name)?;
            record.set_slot(index, value)?;
        }
        Ok(record)
    }

    fn not_constructible(&self, reason: &'static str) -> Error {
        Error::NotConstructible {
            type_name: self.name.to_string(),
            reason,
        }
    }
}

/// Builder returned by [`RecordType::builder`].
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: Rc<str>,
    parent: Option<Rc<RecordType>>,
    fields: Vec<FieldDef>,
    construction: Construction,
}

impl RecordTypeBuilder {
    #[must_use]
    pub fn extends(mut self, parent: &Rc<RecordType>) -> Self {
        self.parent = Some(Rc::clone(parent));
        self
    }

    #[must_use]
    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.construction = Construction::Abstract;
        self
    }

    /// Removes the no-argument constructor.
    #[must_use]
    pub fn without_default(mut self) -> Self {
        self.construction = Construction::NoDefault;
        self
    }

    /// Finishes the type. Field names must be unique within the type itself.
    pub fn build(self) -> Result<Rc<RecordType>> {
        for (i, def) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|other| other.name == def.name) {
                return Err(Error::DuplicateField {
                    type_name: self.name.to_string(),
                    field: def.name.to_string(),
                });
            }
        }
        Ok(Rc::new(RecordType {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            construction: self.construction,
        }))
    }
}

/// An instance of a [`RecordType`].
///
/// Field values sit behind a `RefCell`, so a record is shared as a plain
/// `Rc<Record>` and its type can be read while a field is being written.
#[derive(Debug, Clone)]
pub struct Record {
    record_type: Rc<RecordType>,
    layout: Rc<[FieldSlot]>,
    slots: RefCell<Vec<Value>>,
}

impl Record {
    #[must_use]
    pub fn record_type(&self) -> &Rc<RecordType> {
        &self.record_type
    }

    #[must_use]
    pub fn layout(&self) -> &[FieldSlot] {
        &self.layout
    }

    /// Snapshot of all field values in layout order.
    #[must_use]
    pub fn slots(&self) -> Vec<Value> {
        self.slots.borrow().clone()
    }

    #[must_use]
    pub fn slot(&self, index: usize) -> Option<Value> {
        self.slots.borrow().get(index).cloned()
    }

    /// Reads the most-derived field called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let index = self.index_of(name).ok()?;
        self.slot(index)
    }

    /// Reads the field `name` declared on `owner`, reaching shadowed fields.
    #[must_use]
    pub fn get_declared(&self, owner: &str, name: &str) -> Option<Value> {
        let slot = self
            .layout
            .iter()
            .find(|slot| slot.owner() == owner && slot.def.name() == name)?;
        self.slot(slot.index)
    }

    /// Writes the most-derived field called `name`, returning the old value.
    ///
    /// Final fields are rejected.
    pub fn set(&self, name: &str, value: Value) -> Result<Value> {
        let index = self.index_of(name)?;
        if self.layout[index].def.is_final() {
            return Err(Error::FinalField {
                type_name: self.record_type.name().to_string(),
                field: name.to_string(),
            });
        }
        self.set_slot(index, value)
    }

    /// Writes a slot by position, bypassing mutability and visibility.
    ///
    /// The value is still checked against the field's declared type.
    pub fn set_slot(&self, index: usize, value: Value) -> Result<Value> {
        let len = self.layout.len();
        let slot = self
            .layout
            .get(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        if !slot.def.element_type.accepts(&value) {
            return Err(Error::ElementType {
                expected: slot.def.element_type.to_string(),
                found: value.type_name(),
            });
        }
        let mut slots = self.slots.borrow_mut();
        let current = slots
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(current, value))
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.layout
            .iter()
            .position(|slot| slot.def.name() == name)
            .ok_or_else(|| Error::UnknownField {
                type_name: self.record_type.name().to_string(),
                field: name.to_string(),
            })
    }
}
