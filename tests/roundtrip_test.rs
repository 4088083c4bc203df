use bytes::Bytes;
use chrono::{DateTime, Utc};
use dynval_encoder::{deserialize, serialize, TypeTag, Value};
use indexmap::IndexMap;
use num_bigint::BigInt;

fn roundtrip(value: &Value) -> Value {
    let bytes = serialize(value).unwrap();
    deserialize(&bytes).unwrap()
}

fn mapping(entries: &[(&str, Value)]) -> Value {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_null_and_undefined_roundtrip() {
    assert_eq!(roundtrip(&Value::Null), Value::Null);
    assert_eq!(roundtrip(&Value::Undefined), Value::Undefined);
}

#[test]
fn test_bool_roundtrip() {
    assert_eq!(roundtrip(&Value::from(true)), Value::Bool(true));
    assert_eq!(roundtrip(&Value::from(false)), Value::Bool(false));
}

#[test]
fn test_number_roundtrip() {
    for n in [
        0.0,
        -1.0,
        42.0,
        2_147_483_647.0,
        -2_147_483_648.0,
        2_147_483_648.0,
        -2_147_483_649.0,
        9_007_199_254_740_991.0,
        -9_007_199_254_740_991.0,
        9_007_199_254_740_992.0,
        3.14,
        -0.5,
        1e300,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::MIN_POSITIVE,
    ] {
        assert_eq!(roundtrip(&Value::from(n)), Value::Number(n), "value {}", n);
    }
}

#[test]
fn test_nan_roundtrip() {
    let decoded = roundtrip(&Value::from(f64::NAN));
    assert!(decoded.as_f64().unwrap().is_nan());
}

#[test]
fn test_negative_zero_keeps_sign() {
    let value = Value::from(-0.0);
    assert_eq!(value.type_tag(), TypeTag::Double);
    let decoded = roundtrip(&value).as_f64().unwrap();
    assert_eq!(decoded, 0.0);
    assert!(decoded.is_sign_negative());
}

#[test]
fn test_number_width_selection() {
    assert_eq!(Value::from(0).type_tag(), TypeTag::Int32);
    assert_eq!(Value::from(-1).type_tag(), TypeTag::Int32);
    assert_eq!(Value::from(i32::MAX).type_tag(), TypeTag::Int32);
    assert_eq!(Value::from(i32::MIN).type_tag(), TypeTag::Int32);
    assert_eq!(Value::from(2_147_483_648.0).type_tag(), TypeTag::SafeInt);
    assert_eq!(Value::from(-2_147_483_649.0).type_tag(), TypeTag::SafeInt);
    assert_eq!(
        Value::from(9_007_199_254_740_991.0).type_tag(),
        TypeTag::SafeInt
    );
    // 2^53 is past the safe range
    assert_eq!(
        Value::from(9_007_199_254_740_992.0).type_tag(),
        TypeTag::Double
    );
    assert_eq!(Value::from(3.14).type_tag(), TypeTag::Double);
    assert_eq!(Value::from(f64::NAN).type_tag(), TypeTag::Double);
    assert_eq!(Value::from(f64::INFINITY).type_tag(), TypeTag::Double);
}

#[test]
fn test_bigint_roundtrip_stays_bigint() {
    for n in [
        BigInt::from(0),
        BigInt::from(5),
        BigInt::from(-5),
        BigInt::from(9_007_199_254_740_991i64),
        BigInt::from(9_007_199_254_740_993i64),
        BigInt::from(i64::MAX),
        BigInt::from(i64::MIN),
        BigInt::from(4_294_967_295u32),
    ] {
        let value = Value::from(n.clone());
        assert_eq!(value.type_tag(), TypeTag::BigInt);
        assert_eq!(roundtrip(&value), Value::BigInt(n));
    }
}

#[test]
fn test_plain_number_stays_plain_number() {
    // same magnitude, different contract
    let small = roundtrip(&Value::from(7));
    assert_eq!(small, Value::Number(7.0));
    let wide = roundtrip(&Value::from(4_294_967_296.0));
    assert_eq!(wide, Value::Number(4_294_967_296.0));
    let big = roundtrip(&Value::from(BigInt::from(7)));
    assert_eq!(big, Value::BigInt(BigInt::from(7)));
}

#[test]
fn test_text_roundtrip() {
    assert_eq!(roundtrip(&Value::from("")), Value::from(""));
    assert_eq!(roundtrip(&Value::from("hello")), Value::from("hello"));
    assert_eq!(
        roundtrip(&Value::from("日本語 and émoji 🎉")),
        Value::from("日本語 and émoji 🎉")
    );
    let long = "x".repeat(10_000);
    assert_eq!(roundtrip(&Value::from(long.as_str())), Value::Text(long));
}

#[test]
fn test_bytes_roundtrip() {
    assert_eq!(
        roundtrip(&Value::Bytes(Bytes::new())),
        Value::Bytes(Bytes::new())
    );
    let raw = vec![0u8, 1, 2, 0xff, 0x80, 7];
    assert_eq!(roundtrip(&Value::from(raw.clone())), Value::from(raw));
}

#[test]
fn test_timestamp_roundtrip() {
    let epoch = DateTime::<Utc>::from_timestamp_millis(0).unwrap();
    assert_eq!(roundtrip(&Value::from(epoch)), Value::Timestamp(epoch));

    let recent = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
    assert_eq!(roundtrip(&Value::from(recent)), Value::Timestamp(recent));

    let before_epoch = DateTime::<Utc>::from_timestamp_millis(-86_400_500).unwrap();
    assert_eq!(
        roundtrip(&Value::from(before_epoch)),
        Value::Timestamp(before_epoch)
    );
}

#[test]
fn test_timestamp_drops_sub_millisecond_precision() {
    let precise = DateTime::<Utc>::from_timestamp(1_700_000_000, 123_456_789).unwrap();
    let expected = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
    assert_eq!(roundtrip(&Value::from(precise)), Value::Timestamp(expected));
}

#[test]
fn test_sequence_roundtrip() {
    assert_eq!(
        roundtrip(&Value::Sequence(vec![])),
        Value::Sequence(vec![])
    );

    let nested = Value::Sequence(vec![
        Value::from(1),
        Value::Sequence(vec![Value::from("a"), Value::Sequence(vec![Value::Null])]),
        Value::from(2.5),
        Value::Undefined,
    ]);
    assert_eq!(roundtrip(&nested), nested);
}

#[test]
fn test_mapping_roundtrip() {
    assert_eq!(
        roundtrip(&Value::Mapping(IndexMap::new())),
        Value::Mapping(IndexMap::new())
    );

    let value = mapping(&[
        ("id", Value::from(42)),
        ("name", Value::from("hello")),
        ("tags", Value::Sequence(vec![Value::from("x"), Value::from("y")])),
        ("blob", Value::from(vec![1u8, 2, 3])),
        ("big", Value::from(BigInt::from(-9))),
        ("nested", mapping(&[("deep", Value::Null)])),
    ]);
    assert_eq!(roundtrip(&value), value);
}

#[test]
fn test_mapping_preserves_key_order() {
    let value = mapping(&[
        ("a", Value::from(1)),
        ("b", Value::from(2)),
        ("c", Value::from(3)),
    ]);
    let decoded = roundtrip(&value);
    let keys: Vec<&str> = decoded
        .as_mapping()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["a", "b", "c"]);

    let reversed = mapping(&[
        ("c", Value::from(3)),
        ("b", Value::from(2)),
        ("a", Value::from(1)),
    ]);
    let decoded = roundtrip(&reversed);
    let keys: Vec<&str> = decoded
        .as_mapping()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["c", "b", "a"]);
}

#[test]
fn test_trailing_bytes_are_ignored() {
    let mut data = serialize(&Value::from(1)).unwrap().to_vec();
    data.extend_from_slice(&[0xde, 0xad]);
    assert_eq!(deserialize(&data).unwrap(), Value::from(1));
}
