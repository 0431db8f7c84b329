mod common;

use std::rc::Rc;

use common::{make_man, man_type};
use pretty_assertions::assert_eq;
use replica_engine::{CacheStats, CopyOptions, DeepCopier, FieldCache};
use replica_types::{ElementType, FieldDef, RecordType, Value};

fn two_men(ty: &Rc<RecordType>) -> Value {
    Value::list([
        make_man(ty, "Man1", 25, &["Book1"]),
        make_man(ty, "Man2", 40, &["Book2"]),
    ])
}

#[test]
fn layout_computed_once_per_type() {
    let ty = man_type();
    let mut copier = DeepCopier::default();
    copier.copy(&two_men(&ty)).unwrap();

    assert_eq!(copier.cache().len(), 1);
    assert!(copier.cache().contains(&ty));
    assert_eq!(copier.cache().stats(), CacheStats { hits: 1, misses: 1 });
}

#[test]
fn cache_persists_across_calls() {
    let ty = man_type();
    let mut copier = DeepCopier::default();
    copier.copy(&two_men(&ty)).unwrap();
    copier.copy(&make_man(&ty, "Man3", 60, &[])).unwrap();

    assert_eq!(copier.cache().stats(), CacheStats { hits: 2, misses: 1 });
}

#[test]
fn cache_keyed_by_concrete_type() {
    let base = RecordType::builder("Base")
        .field(FieldDef::new("id", ElementType::Int))
        .build()
        .unwrap();
    let derived = RecordType::builder("Derived")
        .extends(&base)
        .field(FieldDef::new("tag", ElementType::Str))
        .build()
        .unwrap();
    let mut copier = DeepCopier::default();
    copier
        .copy(&Value::record(derived.instantiate().unwrap()))
        .unwrap();

    assert!(copier.cache().contains(&derived));
    assert!(!copier.cache().contains(&base));
}

#[test]
fn types_with_equal_names_are_distinct_entries() {
    let first = man_type();
    let second = man_type();
    let mut copier = DeepCopier::default();
    copier
        .copy(&Value::list([
            make_man(&first, "A", 1, &[]),
            make_man(&second, "B", 2, &[]),
        ]))
        .unwrap();

    assert_eq!(copier.cache().len(), 2);
    assert_eq!(copier.cache().stats().misses, 2);
}

#[test]
fn disabled_cache_stays_empty() {
    let ty = man_type();
    let mut copier = DeepCopier::new(CopyOptions::default().with_cache_fields(false));
    let original = two_men(&ty);
    let copy = copier.copy(&original).unwrap();

    assert!(copy.structural_eq(&original));
    assert!(copier.cache().is_empty());
    assert_eq!(copier.cache().stats(), CacheStats::default());
}

#[test]
fn cache_can_be_handed_to_another_copier() {
    let ty = man_type();
    let mut first = DeepCopier::default();
    first.copy(&make_man(&ty, "Man1", 25, &[])).unwrap();
    let cache = first.into_cache();

    let mut second = DeepCopier::with_cache(CopyOptions::default(), cache);
    second.copy(&make_man(&ty, "Man2", 26, &[])).unwrap();
    assert_eq!(second.cache().stats(), CacheStats { hits: 1, misses: 1 });
}

#[test]
fn clear_keeps_counters() {
    let ty = man_type();
    let mut cache = FieldCache::new();
    cache.layout_of(&ty);
    cache.layout_of(&ty);
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    cache.layout_of(&ty);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn cached_layout_matches_type_layout() {
    let ty = man_type();
    let mut cache = FieldCache::new();
    let cached = cache.layout_of(&ty);
    let names: Vec<&str> = cached.iter().map(|s| s.def().name()).collect();
    assert_eq!(names, vec!["name", "age", "favorite_books"]);
    assert!(Rc::ptr_eq(&cached, &cache.layout_of(&ty)));
}
