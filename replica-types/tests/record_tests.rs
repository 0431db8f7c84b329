use std::rc::Rc;

use pretty_assertions::assert_eq;
use replica_types::{Construction, ElementType, Error, FieldDef, RecordType, Value};

fn animal() -> Rc<RecordType> {
    RecordType::builder("Animal")
        .field(FieldDef::new("name", ElementType::Str))
        .field(FieldDef::new("legs", ElementType::Int).with_initializer(|| Value::Int(4)))
        .field(FieldDef::new("id", ElementType::Long).final_field())
        .abstract_type()
        .build()
        .unwrap()
}

fn dog(parent: &Rc<RecordType>) -> Rc<RecordType> {
    RecordType::builder("Dog")
        .extends(parent)
        .field(FieldDef::new("name", ElementType::Str).private())
        .field(FieldDef::new("tricks", ElementType::Collection))
        .build()
        .unwrap()
}

// ── Types ────────────────────────────────────────────────────────

#[test]
fn layout_is_most_derived_first() {
    let dog = dog(&animal());
    let names: Vec<(String, String)> = dog
        .layout()
        .iter()
        .map(|s| (s.owner().to_string(), s.def().name().to_string()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Dog".into(), "name".into()),
            ("Dog".into(), "tricks".into()),
            ("Animal".into(), "name".into()),
            ("Animal".into(), "legs".into()),
            ("Animal".into(), "id".into()),
        ]
    );
    assert!(dog.layout().iter().enumerate().all(|(i, s)| s.index() == i));
}

#[test]
fn ancestry_and_subtyping() {
    let animal = animal();
    let dog = dog(&animal);
    let names: Vec<&str> = dog.ancestry().map(RecordType::name).collect();
    assert_eq!(names, vec!["Dog", "Animal"]);
    assert!(dog.is_subtype_of("Animal"));
    assert!(!animal.is_subtype_of("Dog"));
    assert!(Rc::ptr_eq(dog.parent().unwrap(), &animal));
    assert_eq!(dog.declared_fields().len(), 2);
}

#[test]
fn duplicate_field_in_one_type_is_rejected() {
    let err = RecordType::builder("Broken")
        .field(FieldDef::new("x", ElementType::Int))
        .field(FieldDef::new("x", ElementType::Long))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateField { .. }));
}

#[test]
fn abstract_type_cannot_be_instantiated() {
    let err = animal().instantiate().unwrap_err();
    assert!(matches!(err, Error::NotConstructible { .. }));
    assert_eq!(animal().construction(), Construction::Abstract);
}

#[test]
fn no_default_type_can_still_be_constructed_explicitly() {
    let point = RecordType::builder("Point")
        .field(FieldDef::new("x", ElementType::Int).final_field())
        .without_default()
        .build()
        .unwrap();
    assert!(point.instantiate().is_err());
    let p = point.construct([("x", Value::Int(3))]).unwrap();
    assert_eq!(p.get("x"), Some(Value::Int(3)));
}

// ── Instances ────────────────────────────────────────────────────

#[test]
fn instantiate_applies_initializers_and_zero_values() {
    let dog = dog(&animal());
    let d = dog.instantiate().unwrap();
    assert_eq!(d.get("legs"), Some(Value::Int(4)));
    assert_eq!(d.get("id"), Some(Value::Long(0)));
    assert!(d.get("tricks").unwrap().is_null());
}

#[test]
fn get_resolves_shadowed_field_to_most_derived() {
    let dog = dog(&animal());
    let d = dog.construct([("name", Value::str("Rex"))]).unwrap();
    assert_eq!(d.get("name").unwrap().as_str(), Some("Rex"));
    assert!(d.get_declared("Animal", "name").unwrap().is_null());
    assert_eq!(d.get_declared("Dog", "name").unwrap().as_str(), Some("Rex"));
}

#[test]
fn set_rejects_final_fields() {
    let dog = dog(&animal());
    let d = dog.instantiate().unwrap();
    let err = d.set("id", Value::Long(9)).unwrap_err();
    assert!(matches!(err, Error::FinalField { .. }));
}

#[test]
fn set_slot_bypasses_final_but_checks_type() {
    let dog = dog(&animal());
    let d = dog.instantiate().unwrap();
    d.set_slot(4, Value::Long(9)).unwrap();
    assert_eq!(d.get("id"), Some(Value::Long(9)));
    assert!(d.set_slot(4, Value::str("nine")).is_err());
}

#[test]
fn set_unknown_field_fails() {
    let dog = dog(&animal());
    let d = dog.instantiate().unwrap();
    let err = d.set("wings", Value::Int(2)).unwrap_err();
    assert!(matches!(err, Error::UnknownField { .. }));
}

#[test]
fn record_field_accepts_subtypes() {
    let animal = animal();
    let dog = dog(&animal);
    let owner = RecordType::builder("Owner")
        .field(FieldDef::new("pet", ElementType::record("Animal")))
        .build()
        .unwrap();
    let o = owner.instantiate().unwrap();
    o.set("pet", Value::record(dog.instantiate().unwrap())).unwrap();
    assert_eq!(o.get("pet").unwrap().type_name(), "Dog");
    assert!(o.set("pet", Value::list([])).is_err());
}

#[test]
fn self_referential_type() {
    let node = RecordType::builder("Node")
        .field(FieldDef::new("next", ElementType::record("Node")))
        .build()
        .unwrap();
    let a = Value::record(node.instantiate().unwrap());
    let b = Value::record(node.instantiate().unwrap());
    a.as_record().unwrap().set("next", b.clone()).unwrap();
    b.as_record().unwrap().set("next", a.clone()).unwrap();
    let next = a.as_record().unwrap().get("next").unwrap();
    assert!(next.same_identity(&b));
}

#[test]
fn record_can_reference_itself() {
    let node = RecordType::builder("Node")
        .field(FieldDef::new("next", ElementType::record("Node")))
        .build()
        .unwrap();
    let a = Value::record(node.instantiate().unwrap());
    a.as_record().unwrap().set("next", a.clone()).unwrap();
    assert!(a.as_record().unwrap().get("next").unwrap().same_identity(&a));
}
