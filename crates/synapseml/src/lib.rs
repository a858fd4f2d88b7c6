//! # SynapseML
//!
//! Typed proxies for SynapseML pipeline stages that live in a remote JVM.
//!
//! Every proxy here wraps one remote object and knows the fully-qualified
//! name of the class it stands for. Parameters are read and written with
//! `get_*`/`set_*` pairs; setters return a fresh proxy so calls chain.
//!
//! ```ignore
//! use synapseml::prelude::*;
//!
//! let session = Session::builder().from_env()?.connect()?;
//! let forest = IsolationForest::new(&session)?
//!     .set_num_estimators(100)?
//!     .set_contamination(0.02)?;
//! let model = forest.fit(&training)?;
//! let scored = model.transform(&testing)?;
//! ```
//!
//! Getters whose remote return type is a family of stages resolve the
//! reply against the [`catalog`] and produce an `Any*` enum. A class without
//! a proxy is reported as `UnsupportedRemoteType`, never guessed.

pub mod automl;
pub mod catalog;
pub mod isolationforest;
pub mod ml;
pub mod nn;
pub mod stages;
pub mod train;

pub use catalog::AnyEstimator;
pub use catalog::AnyStage;
pub use catalog::AnyTransformer;
pub use catalog::Catalog;
pub use catalog::catalog;
pub use ml::DataFrame;
pub use ml::Estimator;
pub use ml::MLReader;
pub use ml::MLWriter;
pub use ml::Transformer;

/// Everything needed to drive the proxies.
pub mod prelude {
    pub use jvmbridge::prelude::*;
    pub use jvmbridge::Session;

    pub use crate::automl::*;
    pub use crate::catalog::AnyEstimator;
    pub use crate::catalog::AnyStage;
    pub use crate::catalog::AnyTransformer;
    pub use crate::isolationforest::*;
    pub use crate::ml::DataFrame;
    pub use crate::ml::Estimator;
    pub use crate::ml::MLReader;
    pub use crate::ml::MLWriter;
    pub use crate::ml::Transformer;
    pub use crate::nn::*;
    pub use crate::stages::*;
    pub use crate::train::*;
}

#[cfg(test)]
mod tests;
