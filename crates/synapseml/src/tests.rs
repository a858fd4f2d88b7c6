//! Tests for the catalog tables and the family narrowing rules.

use std::sync::Arc;

use jvmbridge::loopback::ClassSpec;
use jvmbridge::loopback::LoopbackRuntime;
use jvmbridge::proxy::RemoteClass;
use jvmbridge::Session;

use crate::catalog::AnyEstimator;
use crate::catalog::AnyStage;
use crate::catalog::AnyTransformer;
use crate::catalog::catalog;
use crate::isolationforest::IsolationForest;
use crate::isolationforest::IsolationForestModel;
use crate::ml::DataFrame;
use crate::nn::KNN;
use crate::stages::DropColumns;
use crate::stages::Timer;

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_catalog_lists_every_proxy_once() {
    let catalog = catalog();
    assert_eq!(catalog.transformers.len(), 13);
    assert_eq!(catalog.estimators.len(), 6);
    assert_eq!(catalog.stages.len(), 19);
    assert_eq!(catalog.class_names().len(), 19);
    assert!(catalog.class_names().iter().all(|name| name.starts_with("com.microsoft.azure.synapse.ml.")));
}

#[test]
fn test_families_are_scoped() {
    let catalog = catalog();

    assert!(catalog.estimators.contains(IsolationForest::CLASS_NAME));
    assert!(!catalog.transformers.contains(IsolationForest::CLASS_NAME));

    assert!(catalog.transformers.contains(IsolationForestModel::CLASS_NAME));
    assert!(!catalog.estimators.contains(IsolationForestModel::CLASS_NAME));

    assert!(catalog.contains(IsolationForest::CLASS_NAME));
    assert!(catalog.contains(IsolationForestModel::CLASS_NAME));
    assert!(!catalog.contains(DataFrame::CLASS_NAME));
}

#[test]
fn test_every_listed_class_is_contained() {
    let catalog = catalog();
    for class_name in catalog
        .transformers
        .class_names()
        .chain(catalog.estimators.class_names())
        .chain(catalog.stages.class_names())
    {
        assert!(catalog.contains(class_name), "{} missing", class_name);
    }
    assert!(!catalog.contains("org.apache.spark.ml.classification.LogisticRegression"));
}

#[test]
fn test_catalog_tables_are_shared() {
    assert!(std::ptr::eq(catalog().stages, AnyStage::table()));
    assert!(std::ptr::eq(catalog().stages, catalog().stages));
    assert_eq!(AnyTransformer::CAPABILITY.name(), "transformer");
    assert_eq!(AnyEstimator::CAPABILITY.name(), "estimator");
    assert_eq!(AnyStage::CAPABILITY.name(), "pipeline-stage");
}

// ============================================================================
// Narrowing
// ============================================================================

fn session() -> Session {
    let runtime = LoopbackRuntime::new()
        .with_class(DropColumns::CLASS_NAME, ClassSpec::new().transforms())
        .with_class(KNN::CLASS_NAME, ClassSpec::new())
        .with_class(Timer::CLASS_NAME, ClassSpec::new());
    Session::from_shared(Arc::new(runtime)).expect("session")
}

#[test]
fn test_stage_narrows_to_transformer_by_class() -> anyhow::Result<()> {
    let session = session();

    let drop = DropColumns::new(&session)?;
    let narrowed = AnyTransformer::try_from(AnyStage::from(drop.clone()));
    assert_eq!(narrowed, Ok(AnyTransformer::DropColumns(drop)));

    let knn = AnyStage::from(KNN::new(&session)?);
    assert_eq!(AnyTransformer::try_from(knn.clone()), Err(knn));
    Ok(())
}

#[test]
fn test_class_name_follows_variant() -> anyhow::Result<()> {
    let session = session();
    let timer = AnyEstimator::from(Timer::new(&session)?);
    assert_eq!(timer.class_name(), Timer::CLASS_NAME);
    assert!(matches!(timer, AnyEstimator::Timer(_)));
    Ok(())
}
