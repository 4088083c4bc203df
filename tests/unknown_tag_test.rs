use dynval_encoder::{
    decode_value, decode_value_with, deserialize, deserialize_with, Config, EncoderError,
    UnknownTagPolicy, Value,
};

#[test]
fn test_unknown_tag_decodes_as_undefined() {
    assert_eq!(deserialize(&[12]).unwrap(), Value::Undefined);
    // 200 as a two-byte varint
    assert_eq!(deserialize(&[0xc8, 0x01]).unwrap(), Value::Undefined);
}

#[test]
fn test_unknown_tag_reads_no_payload() {
    let data = [12u8, 3, 42];
    let mut reader = &data[..];
    assert_eq!(decode_value(&mut reader).unwrap(), Value::Undefined);
    assert_eq!(reader, &[3, 42]);
    assert_eq!(decode_value(&mut reader).unwrap(), Value::from(42));
}

#[test]
fn test_unknown_tag_inside_sequence() {
    // the stray tag takes one slot and the stream carries on
    let data = [10u8, 2, 12, 3, 5];
    assert_eq!(
        deserialize(&data).unwrap(),
        Value::Sequence(vec![Value::Undefined, Value::from(5)])
    );
}

#[test]
fn test_reject_policy() {
    let config = Config::default().unknown_tags(UnknownTagPolicy::Reject);
    assert!(matches!(
        deserialize_with(&[12], &config),
        Err(EncoderError::UnknownTag(12))
    ));

    let data = [10u8, 2, 3, 1, 99];
    let mut reader = &data[..];
    assert!(matches!(
        decode_value_with(&mut reader, &config),
        Err(EncoderError::UnknownTag(99))
    ));

    // known tags are unaffected
    assert_eq!(
        deserialize_with(&[3, 7], &config).unwrap(),
        Value::from(7)
    );
}

#[test]
fn test_default_policy_is_lenient() {
    assert_eq!(
        Config::default().unknown_tag_policy(),
        UnknownTagPolicy::Lenient
    );
}
