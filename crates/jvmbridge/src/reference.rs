//! # Object References
//!
//! A non-owning handle to an object that lives in the remote runtime.
//! Dropping a reference issues no remote call; the remote runtime decides
//! when the object goes away.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::OnceLock;

use wirerpc::Kind;
use wirerpc::ObjectId;
use wirerpc::Target;
use wirerpc::Value;
use wirerpc::CONSTRUCTOR;

use crate::convert::FromWire;
use crate::error::Error;
use crate::error::Result;
use crate::session::Session;

#[derive(Clone)]
pub struct ObjectRef {
    inner: Arc<RefInner>,
}

struct RefInner {
    id: ObjectId,
    session: Session,
    /// Fetched on first query; a remote object never changes class.
    class_name: OnceLock<String>,
}

impl ObjectRef {
    /// Wraps an id issued by `session`.
    pub fn from_id(session: &Session, id: ObjectId) -> Self {
        Self {
            inner: Arc::new(RefInner { id, session: session.clone(), class_name: OnceLock::new() }),
        }
    }

    /// Wraps a reply that must be an object reference.
    pub fn from_value(session: &Session, value: Value) -> Result<Self> {
        match value {
            Value::Ref(id) => Ok(Self::from_id(session, id)),
            other => Err(Error::TypeMismatch { expected: Kind::Ref, found: other.kind().to_string() }),
        }
    }

    /// Allocates a new remote instance of `class_name`.
    pub fn construct(session: &Session, class_name: &str, args: &[Value]) -> Result<Self> {
        let value = session.invoke_static(class_name, CONSTRUCTOR, args, &Kind::Ref)?;
        let object = Self::from_value(session, value)?;
        tracing::debug!(class_name, id = %object.id(), "constructed");
        Ok(object)
    }

    /// Allocates a new remote instance with a caller-chosen uid.
    pub fn construct_with_uid(session: &Session, class_name: &str, uid: &str) -> Result<Self> {
        Self::construct(session, class_name, &[Value::String(uid.to_string())])
    }

    pub fn id(&self) -> &ObjectId {
        &self.inner.id
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// The reference as a call argument.
    pub fn to_value(&self) -> Value {
        Value::Ref(self.inner.id.clone())
    }

    /// Invokes an instance method and decodes the reply as `expected`.
    pub fn invoke(&self, method: &str, args: &[Value], expected: &Kind) -> Result<Value> {
        let target = Target::Object(self.inner.id.clone());
        self.inner.session.invoke(&target, method, args, expected)
    }

    /// Invokes an instance method whose reply is decoded into `T`.
    pub fn call<T: FromWire>(&self, method: &str, args: &[Value]) -> Result<T> {
        T::from_wire(self.invoke(method, args, &T::kind())?)
    }

    /// Invokes an instance method that returns another remote object.
    pub fn invoke_ref(&self, method: &str, args: &[Value]) -> Result<ObjectRef> {
        let value = self.invoke(method, args, &Kind::Ref)?;
        Self::from_value(&self.inner.session, value)
    }

    /// The fully-qualified class name the remote runtime reports for this object.
    ///
    /// Two hops: `getClass()` returns a class object, whose `getTypeName()`
    /// is the name. Cached after the first success.
    pub fn remote_class_name(&self) -> Result<&str> {
        if let Some(name) = self.inner.class_name.get() {
            return Ok(name.as_str());
        }
        let class = self.invoke_ref("getClass", &[])?;
        let name: String = class.call("getTypeName", &[])?;
        tracing::debug!(id = %self.inner.id, class_name = %name, "queried remote class");
        Ok(self.inner.class_name.get_or_init(|| name).as_str())
    }
}

/// Ids are only unique within the session that issued them.
impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id && self.inner.session.same_session(&other.inner.session)
    }
}

impl Eq for ObjectRef {}

impl Hash for ObjectRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectRef").field(&self.inner.id).finish()
    }
}
