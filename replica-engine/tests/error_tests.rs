use replica_engine::CopyError;

#[test]
fn error_display_construction() {
    let err = CopyError::Construction {
        type_name: "Money".into(),
        reason: "no no-argument constructor".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("cannot construct Money"));
    assert!(msg.contains("no no-argument constructor"));
}

#[test]
fn error_display_field_access() {
    let err = CopyError::FieldAccess {
        type_name: "Man".into(),
        field: "Man.name".into(),
        reason: "field is private".into(),
    };
    let msg = format!("{err}");
    assert!(msg.contains("`Man.name`"));
    assert!(msg.contains("field is private"));
}

#[test]
fn error_display_element_type() {
    let err = CopyError::ElementType {
        expected: "int".into(),
        found: "String".into(),
        index: 3,
    };
    assert_eq!(format!("{err}"), "array of int cannot hold String at index 3");
}

#[test]
fn error_display_unsupported() {
    let err = CopyError::Unsupported("FileHandle".into());
    assert!(format!("{err}").contains("FileHandle"));
}

#[test]
fn error_display_cycle() {
    let err = CopyError::Cycle("Node".into());
    assert_eq!(format!("{err}"), "reference cycle through Node");
}

#[test]
fn error_display_depth_exceeded() {
    let err = CopyError::DepthExceeded(16);
    assert!(format!("{err}").contains("16"));
}

#[test]
fn error_from_model_error() {
    let model = replica_types::Error::IndexOutOfBounds { index: 4, len: 2 };
    let err: CopyError = model.into();
    assert!(matches!(err, CopyError::Model(_)));
    assert!(format!("{err}").contains("index 4 out of bounds"));
}

#[test]
fn error_from_toml() {
    let toml_err = toml::from_str::<toml::Table>("= nope").unwrap_err();
    let err: CopyError = toml_err.into();
    assert!(format!("{err}").contains("invalid copy options"));
}

#[test]
fn error_debug() {
    let err = CopyError::DepthExceeded(1);
    assert!(format!("{err:?}").contains("DepthExceeded"));
}
