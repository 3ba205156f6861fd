//! Property-based round-trip tests over the full compatibility matrix.
//!
//! For every valid (logical type, encoding) pairing, `decode(encode(v))`
//! must return `v` for representable values, and encode of an out-of-range
//! value must fail with `Overflow` rather than truncate.

use proptest::prelude::*;
use protostack_codec::{EncodeError, Registry, Value};
use protostack_schema::{CompositeDecl, FieldDecl, RecordDecl, TypeExpr};

fn single_field(ty: &str, encoding: &str) -> Registry {
    let mut builder = Registry::builder();
    builder
        .register(&CompositeDecl::Record(RecordDecl {
            name: "T".to_string(),
            params: Vec::new(),
            fields: vec![FieldDecl::new("f", TypeExpr::name(ty))
                .with_key(1)
                .with_encoding(encoding)],
        }))
        .unwrap();
    builder.build().unwrap()
}

fn roundtrip(reg: &Registry, value: Value) -> Value {
    let wrapped = Value::Record(vec![("f".to_string(), value)]);
    let bytes = reg.encode("T", &wrapped).unwrap();
    let back = reg.decode("T", &bytes).unwrap();
    back.field("f").cloned().unwrap()
}

// =============================================================================
// SIGNED INTEGERS
// =============================================================================

proptest! {
    #[test]
    fn int_roundtrips_on_wide_encodings(v in any::<i64>()) {
        for encoding in ["varint", "zigzag", "bits64"] {
            let reg = single_field("int", encoding);
            prop_assert_eq!(roundtrip(&reg, Value::Int(v)), Value::Int(v));
        }
    }

    #[test]
    fn int_roundtrips_on_bits32_within_range(v in i64::from(i32::MIN)..=i64::from(i32::MAX)) {
        let reg = single_field("int", "bits32");
        prop_assert_eq!(roundtrip(&reg, Value::Int(v)), Value::Int(v));
    }

    #[test]
    fn int_overflows_bits32_out_of_range(v in any::<i64>()) {
        prop_assume!(v > i64::from(i32::MAX) || v < i64::from(i32::MIN));
        let reg = single_field("int", "bits32");
        let wrapped = Value::Record(vec![("f".to_string(), Value::Int(v))]);
        let is_overflow = matches!(
            reg.encode("T", &wrapped),
            Err(EncodeError::Overflow { .. })
        );
        prop_assert!(is_overflow);
    }

    #[test]
    fn int32_roundtrips_on_every_encoding(v in any::<i32>()) {
        for encoding in ["varint", "zigzag", "bits32", "bits64"] {
            let reg = single_field("int32", encoding);
            prop_assert_eq!(roundtrip(&reg, Value::Int32(v)), Value::Int32(v));
        }
    }

    #[test]
    fn int64_roundtrips_on_wide_encodings(v in any::<i64>()) {
        for encoding in ["varint", "zigzag", "bits64"] {
            let reg = single_field("int64", encoding);
            prop_assert_eq!(roundtrip(&reg, Value::Int64(v)), Value::Int64(v));
        }
    }

    #[test]
    fn int64_roundtrips_on_bits32_within_range(v in i64::from(i32::MIN)..=i64::from(i32::MAX)) {
        let reg = single_field("int64", "bits32");
        prop_assert_eq!(roundtrip(&reg, Value::Int64(v)), Value::Int64(v));
    }
}

// =============================================================================
// UNSIGNED INTEGERS
// =============================================================================

proptest! {
    #[test]
    fn uint32_roundtrips_on_every_encoding(v in any::<u32>()) {
        for encoding in ["varint", "zigzag", "bits32", "bits64"] {
            let reg = single_field("uint32", encoding);
            prop_assert_eq!(roundtrip(&reg, Value::UInt32(v)), Value::UInt32(v));
        }
    }

    #[test]
    fn uint64_roundtrips_on_wide_encodings(v in any::<u64>()) {
        for encoding in ["varint", "zigzag", "bits64"] {
            let reg = single_field("uint64", encoding);
            prop_assert_eq!(roundtrip(&reg, Value::UInt64(v)), Value::UInt64(v));
        }
    }

    #[test]
    fn uint64_roundtrips_on_bits32_within_range(v in 0u64..=u64::from(u32::MAX)) {
        let reg = single_field("uint64", "bits32");
        prop_assert_eq!(roundtrip(&reg, Value::UInt64(v)), Value::UInt64(v));
    }

    #[test]
    fn uint64_overflows_bits32_out_of_range(v in u64::from(u32::MAX) + 1..) {
        let reg = single_field("uint64", "bits32");
        let wrapped = Value::Record(vec![("f".to_string(), Value::UInt64(v))]);
        let is_overflow = matches!(
            reg.encode("T", &wrapped),
            Err(EncodeError::Overflow { .. })
        );
        prop_assert!(is_overflow);
    }
}

// =============================================================================
// BOOL, FLOAT, STRING
// =============================================================================

proptest! {
    #[test]
    fn bool_roundtrips(v in any::<bool>()) {
        let reg = single_field("bool", "bool");
        prop_assert_eq!(roundtrip(&reg, Value::Bool(v)), Value::Bool(v));
    }

    #[test]
    fn double_roundtrips_on_bits64(v in any::<f64>().prop_filter("comparable", |v| !v.is_nan())) {
        let reg = single_field("double", "bits64");
        prop_assert_eq!(roundtrip(&reg, Value::Double(v)), Value::Double(v));
    }

    #[test]
    fn double_roundtrips_on_bits32_for_single_precision_values(
        v in any::<f32>().prop_filter("comparable", |v| !v.is_nan()),
    ) {
        let reg = single_field("double", "bits32");
        let wide = f64::from(v);
        prop_assert_eq!(roundtrip(&reg, Value::Double(wide)), Value::Double(wide));
    }

    #[test]
    fn string_roundtrips(s in "\\PC{0,64}") {
        let reg = single_field("string", "bytes");
        prop_assert_eq!(
            roundtrip(&reg, Value::Str(s.clone())),
            Value::Str(s)
        );
    }

    #[test]
    fn repeated_roundtrips_in_order(xs in prop::collection::vec(any::<i64>(), 0..32)) {
        let mut builder = Registry::builder();
        builder
            .register(&CompositeDecl::Record(RecordDecl {
                name: "T".to_string(),
                params: Vec::new(),
                fields: vec![
                    FieldDecl::new("xs", TypeExpr::repeated(TypeExpr::name("int"))).with_key(1),
                ],
            }))
            .unwrap();
        let reg = builder.build().unwrap();

        let value = Value::Record(vec![(
            "xs".to_string(),
            Value::List(xs.iter().copied().map(Value::Int).collect()),
        )]);
        let bytes = reg.encode("T", &value).unwrap();
        prop_assert_eq!(reg.decode("T", &bytes).unwrap(), value);
    }
}
