//! # Catalog
//!
//! The capability families that polymorphic getters resolve against.
//!
//! A remote class is listed in every family it belongs to: a fitted model is
//! both a transformer and a pipeline stage, an estimator is a stage but never
//! a transformer. Getters declared to return one family only ever resolve
//! against that family's table, so asking for a transformer where the remote
//! side holds an estimator is `UnsupportedRemoteType` rather than a proxy
//! with the wrong methods.
//!
//! ## Invariants
//!
//! - Every table is built on first use and shared for the rest of the process.
//! - Class names within one table are unique.

use std::collections::BTreeSet;

use jvmbridge::Result;
use jvmbridge::proxy::RemoteObject;
use jvmbridge::resolve::CapabilityTable;
use jvmbridge::resolve::Rewrap;

use crate::automl::BestModel;
use crate::isolationforest::IsolationForest;
use crate::isolationforest::IsolationForestModel;
use crate::ml::DataFrame;
use crate::ml::Transformer;
use crate::nn::KNN;
use crate::nn::KNNModel;
use crate::stages::ClassBalancer;
use crate::stages::ClassBalancerModel;
use crate::stages::DropColumns;
use crate::stages::EnsembleByKey;
use crate::stages::RenameColumn;
use crate::stages::Repartition;
use crate::stages::SelectColumns;
use crate::stages::TextPreprocessor;
use crate::stages::Timer;
use crate::stages::TimerModel;
use crate::train::TrainClassifier;
use crate::train::TrainRegressor;
use crate::train::TrainedClassifierModel;
use crate::train::TrainedRegressorModel;

jvmbridge::capability! {
    /// Any stage that maps a dataset to a dataset.
    pub enum AnyTransformer("transformer") {
        DropColumns,
        SelectColumns,
        RenameColumn,
        Repartition,
        TextPreprocessor,
        EnsembleByKey,
        ClassBalancerModel,
        TimerModel,
        TrainedClassifierModel,
        TrainedRegressorModel,
        BestModel,
        IsolationForestModel,
        KNNModel,
    }
}

jvmbridge::capability! {
    /// Any stage that is fitted to produce a model.
    pub enum AnyEstimator("estimator") {
        ClassBalancer,
        Timer,
        TrainClassifier,
        TrainRegressor,
        IsolationForest,
        KNN,
    }
}

jvmbridge::capability! {
    /// Any pipeline stage, fitted or not.
    pub enum AnyStage("pipeline-stage") {
        DropColumns,
        SelectColumns,
        RenameColumn,
        Repartition,
        TextPreprocessor,
        EnsembleByKey,
        ClassBalancer,
        ClassBalancerModel,
        Timer,
        TimerModel,
        TrainClassifier,
        TrainedClassifierModel,
        TrainRegressor,
        TrainedRegressorModel,
        BestModel,
        IsolationForest,
        IsolationForestModel,
        KNN,
        KNNModel,
    }
}

impl Transformer for AnyTransformer {}

impl AnyEstimator {
    /// Fits the wrapped estimator. The model is resolved against the
    /// transformer table since its exact class is only known remotely.
    pub fn fit(&self, dataset: &DataFrame) -> Result<AnyTransformer> {
        let object = self.reference().invoke_ref("fit", &[dataset.reference().to_value()])?;
        AnyTransformer::rewrap(object)
    }
}

/// Narrows a stage to the transformer family, if its class belongs there.
impl TryFrom<AnyStage> for AnyTransformer {
    type Error = AnyStage;

    fn try_from(stage: AnyStage) -> std::result::Result<Self, AnyStage> {
        match AnyTransformer::table().lookup(stage.class_name()) {
            Some(ctor) => Ok(ctor(stage.reference().clone())),
            None => Err(stage),
        }
    }
}

/// Every capability table used by the generated proxies.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub transformers: &'static CapabilityTable<AnyTransformer>,
    pub estimators: &'static CapabilityTable<AnyEstimator>,
    pub stages: &'static CapabilityTable<AnyStage>,
}

impl Catalog {
    /// Every remote class with a proxy, once each, sorted.
    pub fn class_names(&self) -> BTreeSet<&'static str> {
        self.transformers
            .class_names()
            .chain(self.estimators.class_names())
            .chain(self.stages.class_names())
            .collect()
    }

    /// Whether `class_name` has a proxy in any family.
    pub fn contains(&self, class_name: &str) -> bool {
        self.transformers.contains(class_name)
            || self.estimators.contains(class_name)
            || self.stages.contains(class_name)
    }
}

/// The process-wide catalog.
pub fn catalog() -> Catalog {
    Catalog {
        transformers: AnyTransformer::table(),
        estimators: AnyEstimator::table(),
        stages: AnyStage::table(),
    }
}
