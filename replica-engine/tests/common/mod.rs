//! Shared fixtures for engine tests.

#![allow(dead_code)]

use std::rc::Rc;

use replica_types::{ElementType, FieldDef, RecordType, Value};

/// The exemplar record: a name, an age and a list of favorite books, all
/// private.
pub fn man_type() -> Rc<RecordType> {
    RecordType::builder("Man")
        .field(FieldDef::new("name", ElementType::Str).private())
        .field(FieldDef::new("age", ElementType::Int).private())
        .field(FieldDef::new("favorite_books", ElementType::Collection).private())
        .build()
        .unwrap()
}

pub fn make_man(man_type: &Rc<RecordType>, name: &str, age: i32, books: &[&str]) -> Value {
    let record = man_type
        .construct([
            ("name", Value::str(name)),
            ("age", Value::Int(age)),
            ("favorite_books", Value::list(books.iter().map(|b| Value::str(b)))),
        ])
        .unwrap();
    Value::record(record)
}

/// Reads a record field by name.
pub fn field(record: &Value, name: &str) -> Value {
    record
        .as_record()
        .expect("record")
        .get(name)
        .expect("field")
}

/// Appends to a collection value.
pub fn push(collection: &Value, item: Value) {
    collection
        .as_collection()
        .expect("collection")
        .borrow_mut()
        .push(item);
}

/// String elements of a collection, in iteration order.
pub fn strings(collection: &Value) -> Vec<String> {
    collection
        .as_collection()
        .expect("collection")
        .borrow()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

pub fn len(collection: &Value) -> usize {
    collection.as_collection().expect("collection").borrow().len()
}
