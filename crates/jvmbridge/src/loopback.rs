//! # Loopback Runtime
//!
//! An in-process stand-in for the remote JVM. It speaks the same frames as
//! the real backend and keeps just enough state to behave like it: an object
//! registry, per-class parameter defaults, a path-keyed store for `save` and
//! `load` (directly or through a `read()` reader), and `fit`/`transform` that
//! hand out new objects.
//!
//! Classes must be registered before they can be constructed. Parameters are
//! stored under the remote name with its first letter lowercased
//! (`setInputCol` writes `inputCol`).

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::net::TcpListener;

use wirepack::Decoder;
use wirerpc::Fault;
use wirerpc::ObjectId;
use wirerpc::ReplyErrEncoder;
use wirerpc::ReplyOkEncoder;
use wirerpc::RpcFrame;
use wirerpc::Target;
use wirerpc::Value;
use wirerpc::CONSTRUCTOR;

use crate::proxy::MLReader;
use crate::proxy::MLWriter;
use crate::proxy::RemoteClass;
use crate::tcp::read_frame;
use crate::tcp::write_frame;
use crate::transport;
use crate::transport::Transport;
use crate::transport::TransportError;

/// Class reported for the objects returned by `getClass`.
pub const CLASS_CLASS: &str = "java.lang.Class";
/// Class of the datasets produced by `transform`; registered by default.
pub const DATASET_CLASS: &str = "org.apache.spark.sql.Dataset";

const CLASS_NOT_FOUND: &str = "java.lang.ClassNotFoundException";
const NO_SUCH_METHOD: &str = "java.lang.NoSuchMethodException";
const NO_SUCH_ELEMENT: &str = "java.util.NoSuchElementException";
const ILLEGAL_ARGUMENT: &str = "java.lang.IllegalArgumentException";
const IO_EXCEPTION: &str = "java.io.IOException";

/// How the loopback runtime treats instances of one class.
#[derive(Debug, Clone, Default)]
pub struct ClassSpec {
    defaults: HashMap<String, Value>,
    model: Option<String>,
    transforms: bool,
}

impl ClassSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value `get<Param>` returns until the parameter is set.
    pub fn with_default(mut self, param: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(param.into(), value);
        self
    }

    /// `fit` produces an instance of `model_class`.
    pub fn fits(mut self, model_class: impl Into<String>) -> Self {
        self.model = Some(model_class.into());
        self
    }

    /// `transform` is supported.
    pub fn transforms(mut self) -> Self {
        self.transforms = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Instance {
    class_name: String,
    state: State,
}

#[derive(Debug, Clone)]
enum State {
    Stage { uid: String, params: HashMap<String, Value> },
    Class { name: String },
    Writer { target: ObjectId, overwrite: bool },
    Reader { class_name: String },
}

#[derive(Debug, Clone)]
struct Saved {
    class_name: String,
    uid: String,
    params: HashMap<String, Value>,
}

type Outcome = std::result::Result<Value, Fault>;

fn exception(type_name: &str, message: impl Into<String>) -> Fault {
    Fault::Exception { type_name: type_name.to_string(), message: message.into() }
}

pub struct LoopbackRuntime {
    classes: DashMap<String, ClassSpec>,
    objects: DashMap<ObjectId, Instance>,
    storage: DashMap<String, Saved>,
    next_id: AtomicU64,
    down: AtomicBool,
}

impl Default for LoopbackRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackRuntime {
    pub fn new() -> Self {
        let runtime = Self {
            classes: DashMap::new(),
            objects: DashMap::new(),
            storage: DashMap::new(),
            next_id: AtomicU64::new(1),
            down: AtomicBool::new(false),
        };
        runtime.register_class(DATASET_CLASS, ClassSpec::new());
        runtime
    }

    /// Makes `class_name` constructible. Re-registering replaces the spec.
    pub fn register_class(&self, class_name: impl Into<String>, spec: ClassSpec) -> &Self {
        self.classes.insert(class_name.into(), spec);
        self
    }

    pub fn with_class(self, class_name: impl Into<String>, spec: ClassSpec) -> Self {
        self.register_class(class_name, spec);
        self
    }

    /// Number of live objects, including class and writer objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Whether something has been saved at `path`.
    pub fn has_saved(&self, path: &str) -> bool {
        self.storage.contains_key(path)
    }

    /// Simulates the remote process going away. Every later call fails.
    pub fn shutdown(&self) {
        self.down.store(true, Ordering::Release);
        self.objects.clear();
        tracing::info!("loopback runtime shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.down.load(Ordering::Acquire)
    }

    /// Answers one encoded Call frame with one encoded Reply frame.
    pub fn handle(&self, payload: &[u8]) -> wirerpc::Result<Vec<u8>> {
        let mut dec = Decoder::new(payload);
        let RpcFrame::Call(call) = RpcFrame::decode(&mut dec)? else {
            return Err(wirerpc::Error::ProtocolViolation("expected a Call frame".into()));
        };
        let args = call.decode_args()?;

        match self.dispatch(&call.target, call.method, args) {
            Ok(value) => ReplyOkEncoder::new(call.seq, &value).to_bytes(),
            Err(fault) => {
                tracing::debug!(seq = call.seq, target = %call.target, method = call.method, %fault, "fault");
                ReplyErrEncoder::new(call.seq, &fault).to_bytes()
            }
        }
    }

    /// Serves length-prefixed frames on every accepted connection until the
    /// listener fails.
    pub async fn serve(self: Arc<Self>, listener: TcpListener, max_frame_len: usize) -> std::io::Result<()> {
        loop {
            let (mut stream, peer) = listener.accept().await?;
            let runtime = Arc::clone(&self);
            tokio::spawn(async move {
                loop {
                    let request = match read_frame(&mut stream, max_frame_len).await {
                        Ok(request) => request,
                        Err(e) => {
                            tracing::debug!(%peer, error = %e, "connection ended");
                            break;
                        }
                    };
                    if runtime.is_shut_down() {
                        break;
                    }
                    let reply = match runtime.handle(&request) {
                        Ok(reply) => reply,
                        Err(e) => {
                            tracing::warn!(%peer, error = %e, "undecodable request");
                            break;
                        }
                    };
                    if let Err(e) = write_frame(&mut stream, &reply, max_frame_len).await {
                        tracing::warn!(%peer, error = %e, "write failed");
                        break;
                    }
                }
            });
        }
    }

    fn dispatch(&self, target: &Target, method: &str, args: Vec<Value>) -> Outcome {
        match target {
            Target::Class(class_name) => self.call_static(class_name, method, args),
            Target::Object(id) => self.call_instance(id, method, args),
        }
    }

    fn alloc(&self, class_name: &str, state: State) -> Value {
        let id = ObjectId::new(format!("o{}", self.next_id.fetch_add(1, Ordering::Relaxed)));
        self.objects.insert(id.clone(), Instance { class_name: class_name.to_string(), state });
        Value::Ref(id)
    }

    fn alloc_stage(&self, class_name: &str, uid: String, params: HashMap<String, Value>) -> Value {
        self.alloc(class_name, State::Stage { uid, params })
    }

    fn spec(&self, class_name: &str) -> Result<ClassSpec, Fault> {
        self.classes
            .get(class_name)
            .map(|spec| spec.clone())
            .ok_or_else(|| exception(CLASS_NOT_FOUND, class_name))
    }

    fn call_static(&self, class_name: &str, method: &str, args: Vec<Value>) -> Outcome {
        self.spec(class_name)?;
        match method {
            CONSTRUCTOR => {
                let uid = match args.as_slice() {
                    [] => random_uid(class_name),
                    [Value::String(uid)] => uid.clone(),
                    _ => return Err(exception(ILLEGAL_ARGUMENT, "constructor takes an optional uid")),
                };
                Ok(self.alloc_stage(class_name, uid, HashMap::new()))
            }
            "load" => self.restore(class_name, single_string(&args, "load")?),
            "read" => Ok(self.alloc(MLReader::CLASS_NAME, State::Reader { class_name: class_name.to_string() })),
            _ => Err(exception(NO_SUCH_METHOD, format!("{}.{}", class_name, method))),
        }
    }

    /// Rebuilds a saved stage, which must have been saved as `class_name`.
    fn restore(&self, class_name: &str, path: String) -> Outcome {
        let saved = self
            .storage
            .get(&path)
            .map(|saved| saved.clone())
            .ok_or_else(|| exception(IO_EXCEPTION, format!("Input path does not exist: {}", path)))?;
        if saved.class_name != class_name {
            return Err(exception(
                ILLEGAL_ARGUMENT,
                format!("Expected class name {} but found class name {}", class_name, saved.class_name),
            ));
        }
        Ok(self.alloc_stage(class_name, saved.uid, saved.params))
    }

    fn call_instance(&self, id: &ObjectId, method: &str, args: Vec<Value>) -> Outcome {
        let instance = self
            .objects
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| Fault::ObjectNotFound(id.clone()))?;

        if method == "getClass" {
            let name = instance.class_name.clone();
            return Ok(self.alloc(CLASS_CLASS, State::Class { name }));
        }

        match instance.state {
            State::Class { name } => match method {
                "getTypeName" | "getName" => Ok(Value::String(name)),
                _ => Err(exception(NO_SUCH_METHOD, format!("{}.{}", CLASS_CLASS, method))),
            },
            State::Writer { target, overwrite } => match method {
                "overwrite" => {
                    if let Some(mut entry) = self.objects.get_mut(id) {
                        entry.state = State::Writer { target, overwrite: true };
                    }
                    Ok(Value::Ref(id.clone()))
                }
                "save" => {
                    let path = single_string(&args, "save")?;
                    self.persist(&target, path, overwrite)
                }
                _ => Err(exception(NO_SUCH_METHOD, format!("{}.{}", MLWriter::CLASS_NAME, method))),
            },
            State::Reader { class_name } => match method {
                "load" => self.restore(&class_name, single_string(&args, "load")?),
                _ => Err(exception(NO_SUCH_METHOD, format!("{}.{}", MLReader::CLASS_NAME, method))),
            },
            State::Stage { uid, params } => {
                self.call_stage(id, &instance.class_name, uid, params, method, args)
            }
        }
    }

    fn call_stage(
        &self,
        id: &ObjectId,
        class_name: &str,
        uid: String,
        params: HashMap<String, Value>,
        method: &str,
        args: Vec<Value>,
    ) -> Outcome {
        let spec = self.spec(class_name)?;
        let no_such_method = || exception(NO_SUCH_METHOD, format!("{}.{}", class_name, method));

        match method {
            "uid" => Ok(Value::String(uid)),
            "save" => {
                let path = single_string(&args, "save")?;
                self.persist(id, path, false)
            }
            "write" => Ok(self.alloc(MLWriter::CLASS_NAME, State::Writer { target: id.clone(), overwrite: false })),
            "fit" => {
                let model_class = spec.model.ok_or_else(no_such_method)?;
                self.dataset_arg(&args)?;
                self.spec(&model_class)?;
                Ok(self.alloc_stage(&model_class, random_uid(&model_class), params))
            }
            "transform" => {
                if !spec.transforms {
                    return Err(no_such_method());
                }
                self.dataset_arg(&args)?;
                Ok(self.alloc_stage(DATASET_CLASS, random_uid(DATASET_CLASS), HashMap::new()))
            }
            _ => {
                if let Some(param) = method.strip_prefix("set").filter(|p| !p.is_empty()) {
                    let [value] = <[Value; 1]>::try_from(args)
                        .map_err(|_| exception(ILLEGAL_ARGUMENT, format!("{} takes one argument", method)))?;
                    if let Some(mut entry) = self.objects.get_mut(id) {
                        if let State::Stage { params, .. } = &mut entry.state {
                            params.insert(param_name(param), value);
                        }
                    }
                    return Ok(Value::Ref(id.clone()));
                }
                if let Some(param) = method.strip_prefix("get").filter(|p| !p.is_empty()) {
                    let name = param_name(param);
                    return params
                        .get(&name)
                        .or_else(|| spec.defaults.get(&name))
                        .cloned()
                        .ok_or_else(|| {
                            exception(NO_SUCH_ELEMENT, format!("Failed to find a default value for {}", name))
                        });
                }
                Err(no_such_method())
            }
        }
    }

    fn dataset_arg(&self, args: &[Value]) -> Result<(), Fault> {
        let id = match args {
            [arg] => arg.as_object_id(),
            _ => None,
        }
        .ok_or_else(|| exception(ILLEGAL_ARGUMENT, "expected a single dataset argument"))?;
        if !self.objects.contains_key(id) {
            return Err(Fault::ObjectNotFound(id.clone()));
        }
        Ok(())
    }

    fn persist(&self, target: &ObjectId, path: String, overwrite: bool) -> Outcome {
        let instance = self
            .objects
            .get(target)
            .map(|entry| entry.clone())
            .ok_or_else(|| Fault::ObjectNotFound(target.clone()))?;
        let State::Stage { uid, params } = instance.state else {
            return Err(exception(ILLEGAL_ARGUMENT, "only stages can be saved"));
        };
        if !overwrite && self.storage.contains_key(&path) {
            return Err(exception(
                IO_EXCEPTION,
                format!("Path {} already exists. To overwrite it, use write().overwrite().save(path).", path),
            ));
        }
        self.storage.insert(path, Saved { class_name: instance.class_name, uid, params });
        Ok(Value::Null)
    }
}

#[async_trait::async_trait]
impl Transport for LoopbackRuntime {
    async fn call(&self, payload: &[u8]) -> transport::Result<Vec<u8>> {
        if self.is_shut_down() {
            return Err(TransportError::ConnectionLost("remote runtime has shut down".into()));
        }
        self.handle(payload).map_err(|e| TransportError::Io(e.to_string()))
    }
}

fn single_string(args: &[Value], method: &str) -> Result<String, Fault> {
    match args {
        [Value::String(s)] => Ok(s.clone()),
        _ => Err(exception(ILLEGAL_ARGUMENT, format!("{} takes a single path", method))),
    }
}

/// `InputCol` -> `inputCol`.
fn param_name(remote: &str) -> String {
    let mut chars = remote.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `<ShortClassName>_<12 hex digits>`, the shape the JVM side uses.
fn random_uid(class_name: &str) -> String {
    let short = class_name.rsplit('.').next().unwrap_or(class_name);
    format!("{}_{:012x}", short, rand::random::<u64>() & 0xffff_ffff_ffff)
}
