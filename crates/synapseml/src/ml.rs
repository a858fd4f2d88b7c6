//! # Pipeline Roles
//!
//! SynapseML stages play one of two roles in a pipeline. A [`Transformer`]
//! maps one [`DataFrame`] to another; an [`Estimator`] learns from a
//! `DataFrame` and produces a fitted model, which is itself a transformer.
//!
//! Both operations run entirely on the remote side. The host only sees the
//! references that come back, so `fit` checks that the remote model is the
//! exact class the estimator is declared to produce before handing out a
//! typed proxy.

use jvmbridge::Result;
use jvmbridge::proxy::RemoteClass;
use jvmbridge::proxy::RemoteObject;
use jvmbridge::resolve::Capability;
use jvmbridge::resolve::resolve_exact;

pub use jvmbridge::proxy::MLReader;
pub use jvmbridge::proxy::MLWriter;

/// Capability used when checking the model produced by `fit`.
pub const MODEL: Capability = Capability::new("model");

jvmbridge::remote_class! {
    @handle
    /// A remote Spark dataset. Only ever produced and consumed by the remote side.
    pub struct DataFrame("org.apache.spark.sql.Dataset");
}

/// A stage that maps a dataset to a new dataset.
pub trait Transformer: RemoteObject {
    fn transform(&self, dataset: &DataFrame) -> Result<DataFrame> {
        let object = self.reference().invoke_ref("transform", &[dataset.reference().to_value()])?;
        Ok(DataFrame::from_ref(object))
    }
}

/// A stage that is fitted on a dataset to produce `Self::Model`.
pub trait Estimator: RemoteObject {
    type Model: RemoteClass + Transformer;

    fn fit(&self, dataset: &DataFrame) -> Result<Self::Model> {
        let object = self.reference().invoke_ref("fit", &[dataset.reference().to_value()])?;
        tracing::debug!(model = <Self::Model as RemoteClass>::CLASS_NAME, id = %object.id(), "fitted");
        resolve_exact::<Self::Model>(MODEL, object)
    }
}

/// Marks each listed proxy as a [`Transformer`].
macro_rules! transformers {
    ($($name:ty),* $(,)?) => {
        $(impl $crate::ml::Transformer for $name {})*
    };
}

/// Pairs each listed estimator with the model it fits.
macro_rules! estimators {
    ($($name:ty => $model:ty),* $(,)?) => {
        $(
            impl $crate::ml::Estimator for $name {
                type Model = $model;
            }
        )*
    };
}

pub(crate) use estimators;
pub(crate) use transformers;
