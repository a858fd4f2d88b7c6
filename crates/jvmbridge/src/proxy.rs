//! # Typed Proxies
//!
//! A typed proxy is a local stand-in for one remote object: it wraps exactly
//! one [`ObjectRef`] and carries the fully-qualified remote class name it was
//! generated for.
//!
//! Proxies are declared with [`remote_class!`](crate::remote_class) from a
//! parameter schema. Each schema row is written once and expands into a
//! `set_*`/`get_*` pair that shares the remote parameter name and the value
//! type, so the two can not drift apart. Setters never mutate the proxy; they
//! return a new one around whatever reference the remote setter hands back.
//!
//! Families of proxies that a getter may return are declared with
//! [`capability!`](crate::capability), which builds the enum and its
//! resolution table.

use wirerpc::Value;

use crate::error::Result;
use crate::reference::ObjectRef;
use crate::resolve::Capability;
use crate::resolve::resolve_exact;

/// Capability reported when a reader loads a class other than the one asked for.
pub const READER: Capability = Capability::new("reader");

/// Anything backed by a remote object.
pub trait RemoteObject {
    fn reference(&self) -> &ObjectRef;

    /// The remote object's unique identifier.
    fn uid(&self) -> Result<String> {
        self.reference().call("uid", &[])
    }

    fn remote_class_name(&self) -> Result<&str> {
        self.reference().remote_class_name()
    }
}

impl RemoteObject for ObjectRef {
    fn reference(&self) -> &ObjectRef {
        self
    }
}

/// A proxy generated for one fixed remote class.
pub trait RemoteClass: RemoteObject + Sized {
    /// Fully-qualified remote class name, used to construct and to resolve.
    const CLASS_NAME: &'static str;

    /// Wraps a reference without checking its class.
    fn from_ref(object: ObjectRef) -> Self;
}

/// Declares a typed proxy for a remote class.
///
/// ```ignore
/// remote_class! {
///     /// Drops the given columns.
///     pub struct DropColumns("com.microsoft.azure.synapse.ml.stages.DropColumns");
///     params {
///         /// Names of the columns to drop
///         set_cols / get_cols = "Cols": Vec<String>,
///     }
///     objects {
///         set_model / get_model = "Model": AnyEstimator,
///     }
/// }
/// ```
///
/// `params` rows are values converted with `IntoWire`/`FromWire`. `objects`
/// rows take any `RemoteObject` and rebuild the getter's reply with `Rewrap`.
/// Prefix with `@handle` to get only the struct and its traits.
#[macro_export]
macro_rules! remote_class {
    (
        @handle
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($class:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis struct $name {
            object: $crate::ObjectRef,
        }

        impl $crate::proxy::RemoteObject for $name {
            fn reference(&self) -> &$crate::ObjectRef {
                &self.object
            }
        }

        impl $crate::proxy::RemoteClass for $name {
            const CLASS_NAME: &'static str = $class;

            fn from_ref(object: $crate::ObjectRef) -> Self {
                Self { object }
            }
        }

        impl $crate::resolve::Rewrap for $name {
            fn rewrap(object: $crate::ObjectRef) -> $crate::Result<Self> {
                Ok(Self { object })
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($class:literal);
        $(params {
            $(
                $(#[doc = $pdoc:literal])*
                $setter:ident / $getter:ident = $remote:literal : $pty:ty
            ),* $(,)?
        })?
        $(objects {
            $(
                $(#[doc = $odoc:literal])*
                $osetter:ident / $ogetter:ident = $oremote:literal : $oty:ty
            ),* $(,)?
        })?
    ) => {
        $crate::remote_class! {
            @handle
            $(#[$meta])*
            $vis struct $name($class);
        }

        impl $name {
            /// Allocates a new remote instance with a remote-generated uid.
            pub fn new(session: &$crate::Session) -> $crate::Result<Self> {
                let object = $crate::ObjectRef::construct(session, $class, &[])?;
                Ok(Self { object })
            }

            /// Allocates a new remote instance with the given uid.
            pub fn with_uid(session: &$crate::Session, uid: &str) -> $crate::Result<Self> {
                let object = $crate::ObjectRef::construct_with_uid(session, $class, uid)?;
                Ok(Self { object })
            }

            /// Loads a saved instance. The path is interpreted by the remote runtime.
            pub fn load(session: &$crate::Session, path: &str) -> $crate::Result<Self> {
                let value = session.invoke_static(
                    $class,
                    "load",
                    &[$crate::Value::String(path.to_string())],
                    &$crate::Kind::Ref,
                )?;
                let object = $crate::ObjectRef::from_value(session, value)?;
                Ok(Self { object })
            }

            /// A reader for instances of this class.
            pub fn read(session: &$crate::Session) -> $crate::Result<$crate::proxy::MLReader> {
                let value = session.invoke_static($class, "read", &[], &$crate::Kind::Ref)?;
                let object = $crate::ObjectRef::from_value(session, value)?;
                Ok(<$crate::proxy::MLReader as $crate::proxy::RemoteClass>::from_ref(object))
            }

            /// Saves this instance to `path`.
            pub fn save(&self, path: &str) -> $crate::Result<()> {
                self.object.call::<()>("save", &[$crate::Value::String(path.to_string())])
            }

            /// A writer for saving with options such as overwrite.
            pub fn write(&self) -> $crate::Result<$crate::proxy::MLWriter> {
                let object = self.object.invoke_ref("write", &[])?;
                Ok(<$crate::proxy::MLWriter as $crate::proxy::RemoteClass>::from_ref(object))
            }

            $($(
                $(#[doc = $pdoc])*
                pub fn $setter(&self, value: impl $crate::convert::IntoParam<$pty>) -> $crate::Result<Self> {
                    let value: $pty = $crate::convert::IntoParam::into_param(value);
                    let args = [$crate::convert::IntoWire::into_wire(value)];
                    let object = self.object.invoke_ref(concat!("set", $remote), &args)?;
                    Ok(Self { object })
                }

                $(#[doc = $pdoc])*
                pub fn $getter(&self) -> $crate::Result<$pty> {
                    self.object.call::<$pty>(concat!("get", $remote), &[])
                }
            )*)?

            $($(
                $(#[doc = $odoc])*
                pub fn $osetter(&self, value: &impl $crate::proxy::RemoteObject) -> $crate::Result<Self> {
                    let args = [$crate::proxy::RemoteObject::reference(value).to_value()];
                    let object = self.object.invoke_ref(concat!("set", $oremote), &args)?;
                    Ok(Self { object })
                }

                $(#[doc = $odoc])*
                pub fn $ogetter(&self) -> $crate::Result<$oty> {
                    let object = self.object.invoke_ref(concat!("get", $oremote), &[])?;
                    <$oty as $crate::resolve::Rewrap>::rewrap(object)
                }
            )*)?
        }
    };
}

/// Declares a capability: an enum over proxy types that a polymorphic getter
/// may return, plus the table it is resolved against.
///
/// ```ignore
/// capability! {
///     /// Anything that can transform a DataFrame.
///     pub enum AnyTransformer("transformer") {
///         DropColumns,
///         SelectColumns,
///     }
/// }
/// ```
///
/// Each variant wraps the proxy type of the same name. The table is built on
/// first use and shared for the rest of the process.
#[macro_export]
macro_rules! capability {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident($capability:literal) {
            $($variant:ident),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant($variant),)*
        }

        impl $name {
            pub const CAPABILITY: $crate::resolve::Capability = $crate::resolve::Capability::new($capability);

            /// A fresh table with every variant registered, in declaration order.
            pub fn build_table() -> $crate::resolve::CapabilityTable<$name> {
                $crate::resolve::CapabilityTable::new(Self::CAPABILITY)
                    $(.with::<$variant>())*
            }

            /// The process-wide table for this capability.
            pub fn table() -> &'static $crate::resolve::CapabilityTable<$name> {
                static TABLE: ::std::sync::LazyLock<$crate::resolve::CapabilityTable<$name>> =
                    ::std::sync::LazyLock::new($name::build_table);
                &TABLE
            }

            pub fn resolve(object: $crate::ObjectRef) -> $crate::Result<$crate::resolve::Resolution<$name>> {
                $crate::resolve::resolve(Self::table(), object)
            }

            /// The remote class name of the wrapped proxy.
            pub fn class_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$variant as $crate::proxy::RemoteClass>::CLASS_NAME,)*
                }
            }
        }

        impl $crate::proxy::RemoteObject for $name {
            fn reference(&self) -> &$crate::ObjectRef {
                match self {
                    $(Self::$variant(proxy) => $crate::proxy::RemoteObject::reference(proxy),)*
                }
            }
        }

        impl $crate::resolve::Rewrap for $name {
            fn rewrap(object: $crate::ObjectRef) -> $crate::Result<Self> {
                Self::resolve(object)?.into_result()
            }
        }

        $(
            impl From<$variant> for $name {
                fn from(proxy: $variant) -> Self {
                    Self::$variant(proxy)
                }
            }
        )*
    };
}

remote_class! {
    @handle
    /// Saves a remote stage, optionally replacing what is already at the path.
    pub struct MLWriter("org.apache.spark.ml.util.MLWriter");
}

impl MLWriter {
    /// Allows `save` to replace an existing path.
    pub fn overwrite(&self) -> Result<Self> {
        let object = self.object.invoke_ref("overwrite", &[])?;
        Ok(Self { object })
    }

    pub fn save(&self, path: &str) -> Result<()> {
        self.object.call::<()>("save", &[Value::String(path.to_string())])
    }
}

remote_class! {
    @handle
    /// Loads saved instances of the class it was obtained from.
    pub struct MLReader("org.apache.spark.ml.util.MLReader");
}

impl MLReader {
    /// Loads the instance saved at `path` as `P`, which must be exactly the
    /// class the remote side restored.
    pub fn load<P: RemoteClass>(&self, path: &str) -> Result<P> {
        let object = self.object.invoke_ref("load", &[Value::String(path.to_string())])?;
        resolve_exact::<P>(READER, object)
    }
}
