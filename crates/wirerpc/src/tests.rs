use crate::*;
use std::collections::HashMap;
use wirepack::{Decoder, Encoder};

/// Encodes `value`, then decodes it with its own kind and checks both agree.
fn assert_roundtrip(value: Value) {
    let mut enc = Encoder::new();
    encode_value(&mut enc, &value).expect("encoding failed");
    let bytes = enc.into_bytes().expect("scopes open");

    let mut dec = Decoder::new(&bytes);
    let decoded = decode_value(&mut dec, &value.kind()).expect("decoding failed");
    dec.finish().expect("trailing bytes");
    assert_eq!(value, decoded);
}

fn encoded(value: &Value) -> Vec<u8> {
    let mut enc = Encoder::new();
    encode_value(&mut enc, value).unwrap();
    enc.into_bytes().unwrap()
}

// ============================================================================
//  CODEC
// ============================================================================

#[test]
fn test_scalar_roundtrips() {
    assert_roundtrip(Value::Null);
    assert_roundtrip(Value::Bool(true));
    assert_roundtrip(Value::Int(-7));
    assert_roundtrip(Value::Long(1 << 40));
    assert_roundtrip(Value::Float(0.25));
    assert_roundtrip(Value::Double(-1e300));
    assert_roundtrip(Value::String("features".into()));
    assert_roundtrip(Value::Ref(ObjectId::new("o17")));
}

#[test]
fn test_randomized_roundtrips() {
    for _ in 0..64 {
        let ints: Vec<Value> = (0..rand::random::<u8>() % 16)
            .map(|_| Value::Long(rand::random::<i64>()))
            .collect();
        assert_roundtrip(Value::Array(ints));

        let doubles: Vec<Value> = (0..rand::random::<u8>() % 16)
            .map(|_| Value::Double(rand::random::<f64>()))
            .collect();
        assert_roundtrip(Value::Array(doubles));
    }
}

#[test]
fn test_composite_roundtrips() {
    assert_roundtrip(Value::Array(vec![]));
    assert_roundtrip(Value::Array(vec![
        Value::Ref(ObjectId::new("a")),
        Value::Ref(ObjectId::new("b")),
    ]));

    let dims: HashMap<String, Value> = [("v1", 3), ("v2", 5)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::Int(v)))
        .collect();
    assert_roundtrip(Value::Map(dims));

    // Mixed element kinds decode as `any`.
    assert_roundtrip(Value::Array(vec![Value::Int(1), Value::String("x".into())]));
}

#[test]
fn test_kind_of() {
    assert_eq!(Value::Array(vec![Value::Int(1)]).kind(), Kind::array(Kind::Int));
    assert_eq!(Value::Array(vec![]).kind(), Kind::array(Kind::Any));
    assert_eq!(
        Value::Array(vec![Value::Int(1), Value::Long(1)]).kind(),
        Kind::array(Kind::Any)
    );
    assert_eq!(Kind::map(Kind::array(Kind::Double)).to_string(), "map<string, array<double>>");
}

#[test]
fn test_no_widening() {
    let bytes = encoded(&Value::Int(5));
    let err = decode_value(&mut Decoder::new(&bytes), &Kind::Long).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { expected: Kind::Long, found: "i32".into() });
}

#[test]
fn test_nested_mismatch_is_reported() {
    let bytes = encoded(&Value::Array(vec![Value::Double(1.0), Value::String("x".into())]));
    let err = decode_value(&mut Decoder::new(&bytes), &Kind::array(Kind::Double)).unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { expected: Kind::Double, .. }));
}

#[test]
fn test_any_accepts_everything() -> anyhow::Result<()> {
    let value = Value::Map(HashMap::from([
        ("n".to_string(), Value::Long(3)),
        ("xs".to_string(), Value::Array(vec![Value::Bool(false)])),
    ]));
    let bytes = encoded(&value);
    let decoded = decode_value(&mut Decoder::new(&bytes), &Kind::Any)?;
    assert_eq!(decoded, value);
    Ok(())
}

#[test]
fn test_duplicate_map_keys_rejected() -> anyhow::Result<()> {
    let mut enc = Encoder::new();
    enc.map(|enc| {
        enc.entry("k", |enc| enc.i32(1))?;
        enc.entry("k", |enc| enc.i32(2))
    })?;
    let bytes = enc.into_bytes()?;

    let err = decode_value(&mut Decoder::new(&bytes), &Kind::map(Kind::Int)).unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
    Ok(())
}

#[test]
fn test_recursion_limit() {
    let mut value = Value::Int(0);
    for _ in 0..=MAX_RECURSION_DEPTH + 1 {
        value = Value::Array(vec![value]);
    }
    let mut enc = Encoder::new();
    assert_eq!(encode_value(&mut enc, &value).unwrap_err(), Error::RecursionLimitExceeded);
}

// ============================================================================
//  FRAMES
// ============================================================================

#[test]
fn test_call_frame() -> anyhow::Result<()> {
    let target = Target::Class("com.example.Thing".into());
    let args = [Value::String("uid_1".into()), Value::Bool(true)];
    let bytes = CallEncoder::new(9, &target, CONSTRUCTOR, &args).to_bytes()?;

    let mut dec = Decoder::new(&bytes);
    let RpcFrame::Call(call) = RpcFrame::decode(&mut dec)? else {
        panic!("expected a call frame");
    };
    assert_eq!(call.seq, 9);
    assert_eq!(call.target, target);
    assert_eq!(call.method, "<init>");
    assert_eq!(call.decode_args()?, args.to_vec());
    Ok(())
}

#[test]
fn test_reply_ok_frame() -> anyhow::Result<()> {
    let value = Value::Ref(ObjectId::new("42"));
    let bytes = ReplyOkEncoder::new(3, &value).to_bytes()?;

    let mut dec = Decoder::new(&bytes);
    let RpcFrame::Reply(reply) = RpcFrame::decode(&mut dec)? else {
        panic!("expected a reply frame");
    };
    assert_eq!(reply.seq, 3);
    let mut body = reply.status.expect("ok reply");
    assert_eq!(decode_value(&mut body, &Kind::Ref)?, value);
    Ok(())
}

#[test]
fn test_reply_err_frames() -> anyhow::Result<()> {
    let faults = [
        Fault::Exception {
            type_name: "java.lang.IllegalArgumentException".into(),
            message: "k must be positive".into(),
        },
        Fault::ObjectNotFound(ObjectId::new("gone")),
    ];

    for fault in faults {
        let bytes = ReplyErrEncoder::new(4, &fault).to_bytes()?;
        let mut dec = Decoder::new(&bytes);
        let RpcFrame::Reply(reply) = RpcFrame::decode(&mut dec)? else {
            panic!("expected a reply frame");
        };
        assert_eq!(reply.seq, 4);
        assert_eq!(reply.status.err(), Some(fault));
    }
    Ok(())
}

#[test]
fn test_unknown_fields_are_skipped() -> anyhow::Result<()> {
    let mut enc = Encoder::new();
    enc.entry("Reply", |enc| {
        enc.ok(|enc| {
            enc.map(|enc| {
                enc.entry("trace", |enc| enc.list(|enc| enc.str("hop")))?;
                enc.entry("seq", |enc| enc.i64(11))?;
                enc.entry("value", |enc| enc.f64(0.5))
            })
        })
    })?;
    let bytes = enc.into_bytes()?;

    let mut dec = Decoder::new(&bytes);
    let RpcFrame::Reply(reply) = RpcFrame::decode(&mut dec)? else {
        panic!("expected a reply frame");
    };
    assert_eq!(reply.seq, 11);
    assert_eq!(decode_value(&mut reply.status.expect("ok"), &Kind::Double)?, Value::Double(0.5));
    Ok(())
}

#[test]
fn test_missing_seq() -> anyhow::Result<()> {
    let mut enc = Encoder::new();
    enc.entry("Reply", |enc| enc.ok(|enc| enc.map(|enc| enc.entry("value", |enc| enc.null()))))?;
    let bytes = enc.into_bytes()?;

    let err = RpcFrame::decode(&mut Decoder::new(&bytes)).err().expect("should fail");
    assert_eq!(err, Error::MissingField("seq"));
    assert_eq!(decode_seq(&bytes).unwrap_err(), Error::MissingField("seq"));
    Ok(())
}

#[test]
fn test_unknown_top_level_frame() -> anyhow::Result<()> {
    let mut enc = Encoder::new();
    enc.entry("Ping", |enc| enc.null())?;
    let bytes = enc.into_bytes()?;
    let err = RpcFrame::decode(&mut Decoder::new(&bytes)).err().expect("should fail");
    assert!(matches!(err, Error::UnknownVariant(_)));
    Ok(())
}

#[test]
fn test_decode_seq() -> anyhow::Result<()> {
    let target = Target::Object(ObjectId::new("x"));
    let call = CallEncoder::new(77, &target, "getK", &[]).to_bytes()?;
    assert_eq!(decode_seq(&call)?, 77);

    let fault = Fault::ObjectNotFound(ObjectId::new("x"));
    let reply = ReplyErrEncoder::new(78, &fault).to_bytes()?;
    assert_eq!(decode_seq(&reply)?, 78);
    Ok(())
}
