use pretty_assertions::assert_eq;
use protostack_schema::{
    resolve, resolve_field, resolve_record, resolve_tuple, resolve_variant, CaseDecl,
    CompositeDecl, CompositeSchema, ElementDecl, Encoding, FieldDecl, FieldKind, LogicalType,
    RecordDecl, SchemaError, TupleDecl, TypeExpr, VariantDecl,
};
use protostack_wire::PayloadKind;

fn record(name: &str, fields: Vec<FieldDecl>) -> RecordDecl {
    RecordDecl {
        name: name.to_string(),
        params: Vec::new(),
        fields,
    }
}

#[test]
fn scalar_field_resolves_with_default_encoding() {
    let d = resolve_field(
        "Person",
        "age",
        &TypeExpr::name("int"),
        Some(2),
        None,
        None,
    )
    .unwrap();
    assert_eq!(d.name(), "age");
    assert_eq!(d.key(), 2);
    assert_eq!(d.encoding(), Encoding::Varint);
    assert_eq!(*d.logical_type(), LogicalType::Int);
    assert_eq!(d.kind(), FieldKind::Required);
    assert_eq!(d.payload_kind(), PayloadKind::Varint);
}

#[test]
fn default_encodings_follow_the_table() {
    let cases: &[(&str, Encoding)] = &[
        ("bool", Encoding::Bool),
        ("int", Encoding::Varint),
        ("int32", Encoding::Bits32),
        ("uint32", Encoding::Bits32),
        ("int64", Encoding::Bits64),
        ("uint64", Encoding::Bits64),
        ("double", Encoding::Bits64),
        ("string", Encoding::Bytes),
    ];
    for (name, expected) in cases {
        let d = resolve_field("T", "f", &TypeExpr::name(*name), Some(1), None, None).unwrap();
        assert_eq!(d.encoding(), *expected, "default encoding for {name}");
    }
}

#[test]
fn unknown_name_resolves_as_reference_with_bytes_encoding() {
    let d = resolve_field("T", "f", &TypeExpr::name("Address"), Some(1), None, None).unwrap();
    assert_eq!(
        *d.logical_type(),
        LogicalType::Reference("Address".to_string())
    );
    assert_eq!(d.encoding(), Encoding::Bytes);
}

#[test]
fn optional_wrapper_sets_kind() {
    let d = resolve_field(
        "T",
        "f",
        &TypeExpr::optional(TypeExpr::name("string")),
        Some(1),
        None,
        None,
    )
    .unwrap();
    assert_eq!(d.kind(), FieldKind::Optional);
}

#[test]
fn repeated_wrapper_sets_kind() {
    let d = resolve_field(
        "T",
        "f",
        &TypeExpr::repeated(TypeExpr::name("int")),
        Some(1),
        None,
        None,
    )
    .unwrap();
    assert_eq!(d.kind(), FieldKind::Repeated);
}

#[test]
fn nested_wrappers_are_rejected() {
    for ty in [
        TypeExpr::optional(TypeExpr::optional(TypeExpr::name("int"))),
        TypeExpr::optional(TypeExpr::repeated(TypeExpr::name("int"))),
        TypeExpr::repeated(TypeExpr::optional(TypeExpr::name("int"))),
        TypeExpr::repeated(TypeExpr::repeated(TypeExpr::name("int"))),
    ] {
        let err = resolve_field("T", "f", &ty, Some(1), None, None).unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { .. }), "{ty:?}");
    }
}

#[test]
fn unsupported_scalars_are_rejected() {
    for name in ["i8", "u16", "f32", "char", "usize"] {
        let err = resolve_field("T", "f", &TypeExpr::name(name), Some(1), None, None).unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { .. }), "{name}");
    }
}

#[test]
fn missing_key_is_an_error() {
    let err = resolve_field("T", "f", &TypeExpr::name("int"), None, None, None).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingKey {
            composite: "T".to_string(),
            field: "f".to_string(),
        }
    );
}

#[test]
fn explicit_key_wins_over_default() {
    let d = resolve_field("T", "f", &TypeExpr::name("int"), Some(7), None, Some(1)).unwrap();
    assert_eq!(d.key(), 7);
}

#[test]
fn default_key_applies_when_no_annotation() {
    let d = resolve_field("T", "f", &TypeExpr::name("int"), None, None, Some(3)).unwrap();
    assert_eq!(d.key(), 3);
}

#[test]
fn key_zero_is_out_of_range() {
    let err = resolve_field("T", "f", &TypeExpr::name("int"), Some(0), None, None).unwrap_err();
    assert!(matches!(err, SchemaError::KeyOutOfRange { key: 0, .. }));
}

#[test]
fn key_above_29_bits_is_out_of_range() {
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("int"),
        Some(0x2000_0000),
        None,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::KeyOutOfRange { .. }));
}

#[test]
fn max_key_is_accepted() {
    let d = resolve_field(
        "T",
        "f",
        &TypeExpr::name("int"),
        Some(0x1FFF_FFFF),
        None,
        None,
    )
    .unwrap();
    assert_eq!(d.key(), 0x1FFF_FFFF);
}

#[test]
fn reserved_keys_are_rejected() {
    for key in [19000, 19500, 19999] {
        let err =
            resolve_field("T", "f", &TypeExpr::name("int"), Some(key), None, None).unwrap_err();
        assert!(matches!(err, SchemaError::ReservedKey { .. }), "{key}");
    }
    assert!(resolve_field("T", "f", &TypeExpr::name("int"), Some(18999), None, None).is_ok());
    assert!(resolve_field("T", "f", &TypeExpr::name("int"), Some(20000), None, None).is_ok());
}

#[test]
fn explicit_encoding_wins_over_default() {
    let d = resolve_field(
        "T",
        "f",
        &TypeExpr::name("int"),
        Some(1),
        Some("zigzag"),
        None,
    )
    .unwrap();
    assert_eq!(d.encoding(), Encoding::Zigzag);
}

#[test]
fn unknown_encoding_name_is_an_error() {
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("int"),
        Some(1),
        Some("fixed32"),
        None,
    )
    .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownEncoding {
            composite: "T".to_string(),
            field: "f".to_string(),
            name: "fixed32".to_string(),
        }
    );
}

#[test]
fn incompatible_pairings_fail_no_conversion() {
    // bool only pairs with the bool encoding.
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("bool"),
        Some(1),
        Some("varint"),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::NoConversion { .. }));

    // Strings cannot ride as varints.
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("string"),
        Some(1),
        Some("varint"),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::NoConversion { .. }));

    // Floats cannot ride as zigzag varints.
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("double"),
        Some(1),
        Some("zigzag"),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::NoConversion { .. }));

    // References are length-delimited only.
    let err = resolve_field(
        "T",
        "f",
        &TypeExpr::name("Address"),
        Some(1),
        Some("bits64"),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, SchemaError::NoConversion { .. }));
}

#[test]
fn integer_types_accept_all_four_numeric_encodings() {
    for ty in ["int", "int32", "int64", "uint32", "uint64"] {
        for enc in ["varint", "zigzag", "bits32", "bits64"] {
            let d =
                resolve_field("T", "f", &TypeExpr::name(ty), Some(1), Some(enc), None).unwrap();
            assert_eq!(d.encoding(), Encoding::from_name(enc).unwrap());
        }
    }
}

#[test]
fn record_fields_require_explicit_keys() {
    let err = resolve_record(&record(
        "Person",
        vec![FieldDecl::new("name", TypeExpr::name("string"))],
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::MissingKey { .. }));
}

#[test]
fn record_resolves_in_declaration_order() {
    let schema = resolve_record(&record(
        "Person",
        vec![
            FieldDecl::new("name", TypeExpr::name("string")).with_key(1),
            FieldDecl::new("age", TypeExpr::name("int")).with_key(2),
        ],
    ))
    .unwrap();
    assert_eq!(schema.name(), "Person");
    assert!(!schema.is_positional());
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "age"]);
}

#[test]
fn tuple_elements_default_to_positional_keys() {
    let schema = resolve_tuple(&TupleDecl {
        name: "Pair".to_string(),
        params: Vec::new(),
        elements: vec![
            ElementDecl::new(TypeExpr::name("int32")),
            ElementDecl::new(TypeExpr::name("string")),
        ],
    })
    .unwrap();
    assert!(schema.is_positional());
    let keys: Vec<u32> = schema.fields().iter().map(|f| f.key()).collect();
    assert_eq!(keys, vec![1, 2]);
}

#[test]
fn variant_cases_default_to_declaration_order_keys() {
    let schema = resolve_variant(&VariantDecl {
        name: "Mode".to_string(),
        params: Vec::new(),
        cases: vec![CaseDecl::new("Off"), CaseDecl::new("On")],
    })
    .unwrap();
    assert!(schema.is_bare());
    assert_eq!(schema.cases()[0].key(), 1);
    assert_eq!(schema.cases()[1].key(), 2);
    assert_eq!(schema.case_by_key(2).unwrap().name(), "On");
    assert_eq!(schema.case_by_name("Off").unwrap().key(), 1);
}

#[test]
fn variant_payload_args_are_keyed_after_the_case() {
    let schema = resolve_variant(&VariantDecl {
        name: "Shape".to_string(),
        params: Vec::new(),
        cases: vec![
            CaseDecl::new("Point").with_key(1),
            CaseDecl::new("Rect")
                .with_key(4)
                .with_arg(ElementDecl::new(TypeExpr::name("double")))
                .with_arg(ElementDecl::new(TypeExpr::name("double"))),
        ],
    })
    .unwrap();
    assert!(!schema.is_bare());
    let rect = schema.case_by_name("Rect").unwrap();
    assert!(rect.has_payload());
    let keys: Vec<u32> = rect.args().iter().map(|a| a.key()).collect();
    assert_eq!(keys, vec![5, 6]);
}

#[test]
fn variant_args_must_be_bare_types() {
    let err = resolve_variant(&VariantDecl {
        name: "Holder".to_string(),
        params: Vec::new(),
        cases: vec![CaseDecl::new("Some")
            .with_key(1)
            .with_arg(ElementDecl::new(TypeExpr::optional(TypeExpr::name("int"))))],
    })
    .unwrap_err();
    assert!(matches!(err, SchemaError::WrongType { .. }));
}

#[test]
fn unbound_param_is_an_error() {
    let err = resolve_record(&record(
        "Box",
        vec![FieldDecl::new("value", TypeExpr::param("T")).with_key(1)],
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnboundParam { .. }));
}

#[test]
fn instantiate_substitutes_params() {
    let decl = CompositeDecl::Record(RecordDecl {
        name: "Pair".to_string(),
        params: vec!["A".to_string(), "B".to_string()],
        fields: vec![
            FieldDecl::new("first", TypeExpr::param("A")).with_key(1),
            FieldDecl::new("second", TypeExpr::param("B")).with_key(2),
        ],
    });
    let mono = decl
        .instantiate(&[TypeExpr::name("int32"), TypeExpr::name("string")])
        .unwrap();
    assert_eq!(mono.name(), "Pair<int32, string>");

    let schema = resolve(&mono).unwrap();
    let CompositeSchema::Message(schema) = schema else {
        panic!("expected a message schema");
    };
    assert_eq!(
        *schema.fields()[0].logical_type(),
        LogicalType::Int32
    );
    assert_eq!(
        *schema.fields()[1].logical_type(),
        LogicalType::String
    );
}

#[test]
fn instantiate_checks_arity() {
    let decl = CompositeDecl::Record(RecordDecl {
        name: "Box".to_string(),
        params: vec!["T".to_string()],
        fields: vec![FieldDecl::new("value", TypeExpr::param("T")).with_key(1)],
    });
    let err = decl.instantiate(&[]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::WrongArity {
            composite: "Box".to_string(),
            expected: 1,
            got: 0,
        }
    );
}

#[test]
fn duplicate_keys_are_not_validated() {
    // Documented behavior: both fields match the same wire tag and the
    // later occurrence wins on decode.
    let schema = resolve_record(&record(
        "Odd",
        vec![
            FieldDecl::new("a", TypeExpr::name("int")).with_key(1),
            FieldDecl::new("b", TypeExpr::name("int")).with_key(1),
        ],
    ));
    assert!(schema.is_ok());
}
