//! # Proxy Rewrap Resolver
//!
//! Turns an untyped [`ObjectRef`] returned by the remote runtime into the
//! right typed proxy.
//!
//! ## Philosophy
//!
//! - **Scoped Tables**: One remote class can satisfy several capabilities
//!   (a model is both a transformer and a pipeline stage). Each capability has
//!   its own table, and resolving against the wrong one is `Unknown`.
//! - **No Guessing**: A class name absent from the table is reported with its
//!   name and the original reference. It is never widened to a base proxy.
//! - **Built Once**: Tables are immutable after construction and are meant to
//!   live in a process-wide static.

use std::collections::HashMap;
use std::fmt;

use crate::error::Error;
use crate::error::Result;
use crate::proxy::RemoteClass;
use crate::reference::ObjectRef;

/// Names a family of proxies a returned object may be resolved into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability(&'static str);

impl Capability {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Builds the typed proxy for a resolved reference.
pub type Constructor<T> = fn(ObjectRef) -> T;

/// Ordered `(remote class name, constructor)` pairs for one capability.
pub struct CapabilityTable<T> {
    capability: Capability,
    entries: Vec<(&'static str, Constructor<T>)>,
    index: HashMap<&'static str, usize>,
}

impl<T> CapabilityTable<T> {
    pub fn new(capability: Capability) -> Self {
        Self { capability, entries: Vec::new(), index: HashMap::new() }
    }

    /// Adds a class. A name that is already present keeps its first constructor.
    pub fn register(mut self, class_name: &'static str, ctor: Constructor<T>) -> Self {
        if self.index.contains_key(class_name) {
            tracing::debug!(capability = %self.capability, class_name, "duplicate registration ignored");
            return self;
        }
        self.index.insert(class_name, self.entries.len());
        self.entries.push((class_name, ctor));
        self
    }

    /// Adds the proxy type `P`, wrapped into `T`.
    pub fn with<P>(self) -> Self
    where
        P: RemoteClass,
        T: From<P>,
    {
        self.register(P::CLASS_NAME, |object| T::from(P::from_ref(object)))
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn lookup(&self, class_name: &str) -> Option<Constructor<T>> {
        self.index.get(class_name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.index.contains_key(class_name)
    }

    /// Registered class names, in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> fmt::Debug for CapabilityTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityTable")
            .field("capability", &self.capability)
            .field("classes", &self.class_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Outcome of resolving a reference against one table.
#[derive(Debug)]
pub enum Resolution<T> {
    Known(T),
    /// The class is not registered for this capability.
    Unknown { capability: Capability, class_name: String, object: ObjectRef },
}

impl<T> Resolution<T> {
    pub fn is_known(&self) -> bool {
        matches!(self, Resolution::Known(_))
    }

    /// The typed proxy, or `UnsupportedRemoteType` for the unknown arm.
    pub fn into_result(self) -> Result<T> {
        match self {
            Resolution::Known(proxy) => Ok(proxy),
            Resolution::Unknown { capability, class_name, .. } => {
                Err(Error::UnsupportedRemoteType { capability, class_name })
            }
        }
    }
}

/// Queries the remote class of `object` and looks it up in `table`.
///
/// Channel failures during the query are returned as errors; an
/// unregistered class is `Resolution::Unknown`.
pub fn resolve<T>(table: &CapabilityTable<T>, object: ObjectRef) -> Result<Resolution<T>> {
    let class_name = object.remote_class_name()?.to_string();
    match table.lookup(&class_name) {
        Some(ctor) => {
            tracing::debug!(capability = %table.capability, %class_name, "resolved");
            Ok(Resolution::Known(ctor(object)))
        }
        None => {
            tracing::warn!(capability = %table.capability, %class_name, "no proxy registered");
            Ok(Resolution::Unknown { capability: table.capability, class_name, object })
        }
    }
}

/// Wraps `object` as `P` after checking its remote class is exactly `P::CLASS_NAME`.
pub fn resolve_exact<P: RemoteClass>(capability: Capability, object: ObjectRef) -> Result<P> {
    let class_name = object.remote_class_name()?;
    if class_name != P::CLASS_NAME {
        tracing::warn!(%capability, class_name, expected = P::CLASS_NAME, "unexpected remote class");
        return Err(Error::UnsupportedRemoteType { capability, class_name: class_name.to_string() });
    }
    Ok(P::from_ref(object))
}

/// Rebuilds a typed value from a returned reference.
///
/// Concrete proxies wrap directly; capability enums go through [`resolve`].
pub trait Rewrap: Sized {
    fn rewrap(object: ObjectRef) -> Result<Self>;
}

impl Rewrap for ObjectRef {
    fn rewrap(object: ObjectRef) -> Result<Self> {
        Ok(object)
    }
}
