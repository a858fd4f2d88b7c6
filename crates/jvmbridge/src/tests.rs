//! Tests for the channel, references and resolver against the loopback runtime.

use std::collections::HashMap;
use std::sync::Arc;

use wirerpc::Kind;
use wirerpc::ObjectId;
use wirerpc::ReplyOkEncoder;
use wirerpc::Target;
use wirerpc::Value;

use crate::config::BridgeConfig;
use crate::convert::FromWire;
use crate::convert::IntoParam;
use crate::convert::IntoWire;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::loopback::ClassSpec;
use crate::loopback::LoopbackRuntime;
use crate::proxy::MLReader;
use crate::proxy::READER;
use crate::proxy::RemoteClass;
use crate::proxy::RemoteObject;
use crate::reference::ObjectRef;
use crate::resolve::resolve;
use crate::resolve::resolve_exact;
use crate::resolve::Capability;
use crate::resolve::CapabilityTable;
use crate::session::Session;
use crate::transport;
use crate::transport::Transport;
use crate::transport::TransportError;

crate::remote_class! {
    /// Test estimator with one parameter of each shape.
    pub struct Scaler("test.ml.Scaler");
    params {
        set_factor / get_factor = "Factor": f64,
        set_cols / get_cols = "Cols": Vec<String>,
        set_dims / get_dims = "Dims": HashMap<String, i32>,
        set_seed / get_seed = "Seed": i64,
    }
    objects {
        set_inner / get_inner = "Inner": AnyStage,
    }
}

crate::remote_class! {
    pub struct ScalerModel("test.ml.ScalerModel");
}

crate::remote_class! {
    pub struct Unlisted("test.ml.Unlisted");
}

crate::capability! {
    pub enum AnyStage("stage") {
        Scaler,
        ScalerModel,
    }
}

fn loopback() -> Arc<LoopbackRuntime> {
    Arc::new(
        LoopbackRuntime::new()
            .with_class(
                Scaler::CLASS_NAME,
                ClassSpec::new()
                    .with_default("factor", Value::Double(1.0))
                    .fits(ScalerModel::CLASS_NAME),
            )
            .with_class(ScalerModel::CLASS_NAME, ClassSpec::new().transforms())
            .with_class(Unlisted::CLASS_NAME, ClassSpec::new()),
    )
}

fn session(runtime: &Arc<LoopbackRuntime>) -> Session {
    Session::from_shared(runtime.clone()).expect("runtime")
}

/// Answers every call with whatever the handler returns.
struct Scripted<F>(F);

#[async_trait::async_trait]
impl<F> Transport for Scripted<F>
where
    F: Fn(&[u8]) -> transport::Result<Vec<u8>> + Send + Sync + 'static,
{
    async fn call(&self, payload: &[u8]) -> transport::Result<Vec<u8>> {
        (self.0)(payload)
    }
}

// ============================================================================
//  OBJECT REFERENCES
// ============================================================================

#[test]
fn test_constructions_are_independent() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let a = Scaler::new(&session)?;
    let b = Scaler::new(&session)?;
    assert_ne!(a, b);
    assert_ne!(a.uid()?, b.uid()?);
    assert!(a.uid()?.starts_with("Scaler_"));
    assert_eq!(a.get_factor()?, 1.0);
    assert_eq!(b.get_factor()?, 1.0);
    Ok(())
}

#[test]
fn test_construct_with_uid() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let scaler = Scaler::with_uid(&session, "scaler_fixed")?;
    assert_eq!(scaler.uid()?, "scaler_fixed");
    Ok(())
}

#[test]
fn test_unknown_class_is_a_remote_fault() {
    let runtime = loopback();
    let session = session(&runtime);
    let err = ObjectRef::construct(&session, "test.ml.Missing", &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(matches!(err, Error::Remote { ref type_name, .. } if type_name == "java.lang.ClassNotFoundException"));
}

#[test]
fn test_remote_class_name_is_cached() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let scaler = Scaler::new(&session)?;

    let before = runtime.object_count();
    assert_eq!(scaler.remote_class_name()?, Scaler::CLASS_NAME);
    assert_eq!(runtime.object_count(), before + 1);

    // Clones share the cache.
    let clone = scaler.clone();
    assert_eq!(clone.remote_class_name()?, Scaler::CLASS_NAME);
    assert_eq!(runtime.object_count(), before + 1);
    Ok(())
}

#[test]
fn test_stale_reference() {
    let runtime = loopback();
    let session = session(&runtime);
    let ghost = ObjectRef::from_id(&session, ObjectId::new("o999"));
    let err = ghost.invoke("uid", &[], &Kind::String).unwrap_err();
    assert_eq!(err, Error::StaleReference(ObjectId::new("o999")));
    assert_eq!(err.kind(), ErrorKind::Channel);
}

#[test]
fn test_identity_is_scoped_to_the_session() -> anyhow::Result<()> {
    let first = session(&loopback());
    let second = session(&loopback());

    let a = Scaler::new(&first)?;
    let b = Scaler::new(&second)?;
    assert_eq!(a.reference().id(), b.reference().id());
    assert_ne!(a, b);

    let same = ObjectRef::from_id(&first.clone(), a.reference().id().clone());
    assert_eq!(&same, a.reference());
    Ok(())
}

// ============================================================================
//  CHANNEL
// ============================================================================

#[test]
fn test_closed_session_is_a_channel_fault() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let scaler = Scaler::new(&session)?;

    session.close();
    let err = scaler.get_factor().unwrap_err();
    assert_eq!(err, Error::Transport(TransportError::Closed));
    assert_eq!(err.kind(), ErrorKind::Channel);
    Ok(())
}

#[test]
fn test_remote_shutdown_is_a_channel_fault() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let scaler = Scaler::new(&session)?.set_factor(2.0)?;

    runtime.shutdown();
    let err = scaler.get_factor().unwrap_err();
    assert!(matches!(err, Error::Transport(TransportError::ConnectionLost(_))));
    assert_eq!(err.kind(), ErrorKind::Channel);
    Ok(())
}

#[test]
fn test_reply_kind_is_checked() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let scaler = Scaler::new(&session)?.set_factor(0.5)?;

    let err = scaler.reference().invoke("getFactor", &[], &Kind::Long).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { expected: Kind::Long, found: "f64".into() });
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    Ok(())
}

#[test]
fn test_sequence_mismatch() -> anyhow::Result<()> {
    let session = Session::new(Scripted(|payload: &[u8]| {
        let seq = wirerpc::decode_seq(payload).map_err(|e| TransportError::Io(e.to_string()))?;
        ReplyOkEncoder::new(seq + 1, &Value::Null)
            .to_bytes()
            .map_err(|e| TransportError::Io(e.to_string()))
    }))?;

    let err = session.invoke_static("x.Y", "ping", &[], &Kind::Null).unwrap_err();
    assert!(matches!(err, Error::Protocol(wirerpc::Error::ProtocolViolation(_))));
    Ok(())
}

#[test]
fn test_call_frame_as_reply() -> anyhow::Result<()> {
    // Echoing the call back is a protocol violation.
    let session = Session::new(Scripted(|payload: &[u8]| Ok::<_, TransportError>(payload.to_vec())))?;
    let err = session.invoke(&Target::Class("x.Y".into()), "ping", &[], &Kind::Null).unwrap_err();
    assert!(matches!(err, Error::Protocol(wirerpc::Error::ProtocolViolation(_))));
    Ok(())
}

#[test]
fn test_garbage_reply() -> anyhow::Result<()> {
    let session = Session::new(Scripted(|_: &[u8]| Ok::<_, TransportError>(vec![0xEE, 0x00])))?;
    let err = session.invoke_static("x.Y", "ping", &[], &Kind::Null).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Channel);
    Ok(())
}

#[test]
fn test_shared_session_across_threads() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let session = session.clone();
            std::thread::spawn(move || -> crate::Result<f64> {
                let scaler = Scaler::new(&session)?.set_factor(i as f64)?;
                scaler.get_factor()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let factor = handle.join().expect("thread panicked")?;
        assert_eq!(factor, i as f64);
    }
    Ok(())
}

// ============================================================================
//  GENERATED ACCESSORS
// ============================================================================

#[test]
fn test_setters_chain_and_round_trip() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let dims = HashMap::from([("a".to_string(), 3), ("b".to_string(), 7)]);
    let scaler = Scaler::new(&session)?
        .set_factor(0.25)?
        .set_cols(vec!["x".to_string(), "y".to_string()])?
        .set_dims(dims.clone())?
        .set_seed(1 << 40)?;

    assert_eq!(scaler.get_factor()?, 0.25);
    assert_eq!(scaler.get_cols()?, vec!["x", "y"]);
    assert_eq!(scaler.get_dims()?, dims);
    assert_eq!(scaler.get_seed()?, 1 << 40);
    Ok(())
}

#[test]
fn test_unset_parameter_without_default() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let err = Scaler::new(&session)?.get_cols().unwrap_err();
    assert!(matches!(err, Error::Remote { ref type_name, .. } if type_name == "java.util.NoSuchElementException"));
    Ok(())
}

#[test]
fn test_save_and_load() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let original = Scaler::new(&session)?.set_factor(0.5)?;
    original.save("/tmp/scaler")?;
    assert!(runtime.has_saved("/tmp/scaler"));

    let loaded = Scaler::load(&session, "/tmp/scaler")?;
    assert_ne!(loaded, original);
    assert_eq!(loaded.get_factor()?, 0.5);
    assert_eq!(loaded.uid()?, original.uid()?);

    // A second plain save refuses to clobber; the writer can overwrite.
    let err = original.save("/tmp/scaler").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Remote);
    original.set_factor(0.75)?.write()?.overwrite()?.save("/tmp/scaler")?;
    assert_eq!(Scaler::load(&session, "/tmp/scaler")?.get_factor()?, 0.75);
    Ok(())
}

#[test]
fn test_reader_loads_the_saved_class() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let original = Scaler::new(&session)?.set_factor(0.125)?;
    original.save("/tmp/read-scaler")?;

    let reader = Scaler::read(&session)?;
    assert_eq!(reader.remote_class_name()?, MLReader::CLASS_NAME);
    let loaded: Scaler = reader.load("/tmp/read-scaler")?;
    assert_eq!(loaded.get_factor()?, 0.125);
    assert_eq!(loaded.uid()?, original.uid()?);

    // Asking for another type than the reader restores is caught locally.
    match reader.load::<ScalerModel>("/tmp/read-scaler") {
        Err(Error::UnsupportedRemoteType { capability, class_name }) => {
            assert_eq!(capability, READER);
            assert_eq!(class_name, Scaler::CLASS_NAME);
        }
        other => panic!("expected an unsupported type, got {:?}", other),
    }

    // A reader for another class refuses the path on the remote side.
    let err = ScalerModel::read(&session)?.load::<ScalerModel>("/tmp/read-scaler").unwrap_err();
    assert!(matches!(err, Error::Remote { ref type_name, .. } if type_name == "java.lang.IllegalArgumentException"));
    Ok(())
}

#[test]
fn test_load_missing_path() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let err = Scaler::load(&session, "/nowhere").unwrap_err();
    assert!(matches!(err, Error::Remote { ref type_name, .. } if type_name == "java.io.IOException"));
    Ok(())
}

// ============================================================================
//  RESOLVER
// ============================================================================

#[test]
fn test_object_getter_rewraps_by_capability() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);

    let inner = ScalerModel::new(&session)?;
    let outer = Scaler::new(&session)?.set_inner(&inner)?;
    match outer.get_inner()? {
        AnyStage::ScalerModel(model) => assert_eq!(model, inner),
        other => panic!("resolved to the wrong proxy: {:?}", other),
    }

    let stray = Unlisted::new(&session)?;
    let err = outer.set_inner(&stray)?.get_inner().unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedRemoteType {
            capability: AnyStage::CAPABILITY,
            class_name: Unlisted::CLASS_NAME.to_string(),
        }
    );
    assert_eq!(err.kind(), ErrorKind::UnsupportedRemoteType);
    Ok(())
}

#[test]
fn test_unknown_resolution_keeps_the_reference() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let stray = Unlisted::new(&session)?;

    match AnyStage::resolve(stray.reference().clone())? {
        crate::resolve::Resolution::Unknown { capability, class_name, object } => {
            assert_eq!(capability.name(), "stage");
            assert_eq!(class_name, Unlisted::CLASS_NAME);
            assert_eq!(&object, stray.reference());
        }
        known => panic!("should not resolve: {:?}", known),
    }
    Ok(())
}

#[test]
fn test_tables_are_scoped() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let model = ScalerModel::new(&session)?;

    let models: CapabilityTable<ScalerModel> = CapabilityTable::new(Capability::new("model")).with::<ScalerModel>();
    let scalers: CapabilityTable<Scaler> = CapabilityTable::new(Capability::new("scaler")).with::<Scaler>();

    assert!(resolve(&models, model.reference().clone())?.is_known());
    assert!(!resolve(&scalers, model.reference().clone())?.is_known());
    Ok(())
}

#[test]
fn test_first_registration_wins() -> anyhow::Result<()> {
    fn first(object: ObjectRef) -> (u8, ObjectRef) {
        (1, object)
    }
    fn second(object: ObjectRef) -> (u8, ObjectRef) {
        (2, object)
    }

    let table = CapabilityTable::<(u8, ObjectRef)>::new(Capability::new("pair"))
        .register("a.B", first)
        .register("a.B", second)
        .register("a.C", second);

    assert_eq!(table.len(), 2);
    assert_eq!(table.class_names().collect::<Vec<_>>(), vec!["a.B", "a.C"]);

    let session = Session::new(Scripted(|_: &[u8]| Err::<Vec<u8>, _>(TransportError::Closed)))?;
    let object = ObjectRef::from_id(&session, ObjectId::new("o1"));
    let ctor = table.lookup("a.B").expect("registered");
    assert_eq!(ctor(object).0, 1);
    assert!(table.lookup("a.D").is_none());
    Ok(())
}

#[test]
fn test_resolve_exact() -> anyhow::Result<()> {
    let runtime = loopback();
    let session = session(&runtime);
    let model = ScalerModel::new(&session)?;
    let capability = Capability::new("model");

    let same: ScalerModel = resolve_exact(capability, model.reference().clone())?;
    assert_eq!(same, model);

    let err = resolve_exact::<Scaler>(capability, model.reference().clone()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedRemoteType);
    Ok(())
}

#[test]
fn test_catalog_table_is_built_once() {
    let first = AnyStage::table() as *const _;
    let second = AnyStage::table() as *const _;
    assert_eq!(first, second);
    assert_eq!(AnyStage::table().len(), 2);
}

// ============================================================================
//  CONVERSIONS & CONFIG
// ============================================================================

#[test]
fn test_conversions_are_strict() {
    assert_eq!(i64::from_wire(7i64.into_wire()), Ok(7));
    let err = i64::from_wire(Value::Int(7)).unwrap_err();
    assert_eq!(err, Error::TypeMismatch { expected: Kind::Long, found: "int".into() });

    let nested = vec![vec![1.0f64], vec![]].into_wire();
    assert_eq!(Vec::<Vec<f64>>::from_wire(nested), Ok(vec![vec![1.0], vec![]]));
    assert_eq!(<HashMap<String, bool>>::kind(), Kind::map(Kind::Bool));
    assert_eq!(<()>::from_wire(Value::Null), Ok(()));
}

#[test]
fn test_param_literals_take_the_parameter_type() {
    assert_eq!(IntoParam::<i64>::into_param(1 << 40), 1_099_511_627_776);
    assert_eq!(IntoParam::<f64>::into_param(0.5), 0.5);
    assert_eq!(IntoParam::<String>::into_param("features"), "features");
    assert_eq!(IntoParam::<Vec<String>>::into_param(vec!["a".to_string()]), vec!["a"]);
}

#[test]
fn test_config_overlay() -> anyhow::Result<()> {
    let env = HashMap::from([("JVMBRIDGE_HOST", "10.0.0.5"), ("JVMBRIDGE_PORT", "6000")]);
    let config = BridgeConfig::default().overlay(|key| env.get(key).map(|v| v.to_string()))?;
    assert_eq!(config.addr(), "10.0.0.5:6000");
    assert_eq!(config.max_frame_len, crate::config::DEFAULT_MAX_FRAME_LEN);

    let untouched = BridgeConfig::default().overlay(|_| None)?;
    assert_eq!(untouched, BridgeConfig::default());

    let err = BridgeConfig::default()
        .overlay(|key| (key == "JVMBRIDGE_PORT").then(|| "http".to_string()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    Ok(())
}
