//! Featurize-and-train wrappers from `com.microsoft.azure.synapse.ml.train`.
//!
//! `TrainClassifier` and `TrainRegressor` wrap an arbitrary Spark learner.
//! The learner is an object parameter, so its getter resolves through the
//! estimator table and reports `UnsupportedRemoteType` for learners no proxy
//! exists for.

use jvmbridge::Value;

use crate::catalog::AnyEstimator;
use crate::catalog::AnyTransformer;
use crate::ml::estimators;
use crate::ml::transformers;

jvmbridge::remote_class! {
    pub struct TrainClassifier("com.microsoft.azure.synapse.ml.train.TrainClassifier");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The name of the label column
        set_label_col / get_label_col = "LabelCol": String,
        /// Sorted label values on the labels column
        set_labels / get_labels = "Labels": Vec<String>,
        /// Number of features to hash to
        set_num_features / get_num_features = "NumFeatures": i32,
        /// Re-index the label column
        set_reindex_label / get_reindex_label = "ReindexLabel": bool,
    }
    objects {
        /// Classifier to run
        set_model / get_model = "Model": AnyEstimator,
    }
}

jvmbridge::remote_class! {
    pub struct TrainedClassifierModel("com.microsoft.azure.synapse.ml.train.TrainedClassifierModel");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The name of the label column
        set_label_col / get_label_col = "LabelCol": String,
        /// the levels
        set_levels / get_levels = "Levels": Vec<Value>,
    }
    objects {
        /// model produced by training
        set_model / get_model = "Model": AnyTransformer,
    }
}

jvmbridge::remote_class! {
    pub struct TrainRegressor("com.microsoft.azure.synapse.ml.train.TrainRegressor");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The name of the label column
        set_label_col / get_label_col = "LabelCol": String,
        /// Number of features to hash to
        set_num_features / get_num_features = "NumFeatures": i32,
    }
    objects {
        /// Regressor to run
        set_model / get_model = "Model": AnyEstimator,
    }
}

jvmbridge::remote_class! {
    pub struct TrainedRegressorModel("com.microsoft.azure.synapse.ml.train.TrainedRegressorModel");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The name of the label column
        set_label_col / get_label_col = "LabelCol": String,
    }
    objects {
        /// model produced by training
        set_model / get_model = "Model": AnyTransformer,
    }
}

transformers! {
    TrainedClassifierModel,
    TrainedRegressorModel,
}

estimators! {
    TrainClassifier => TrainedClassifierModel,
    TrainRegressor => TrainedRegressorModel,
}
