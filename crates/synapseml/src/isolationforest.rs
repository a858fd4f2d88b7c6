//! Unsupervised outlier detection from `com.microsoft.azure.synapse.ml.isolationforest`.

use crate::catalog::AnyTransformer;
use crate::ml::estimators;
use crate::ml::transformers;

jvmbridge::remote_class! {
    /// Fits an ensemble of isolation trees and scores rows by how easily they are isolated.
    pub struct IsolationForest("com.microsoft.azure.synapse.ml.isolationforest.IsolationForest");
    params {
        /// If true, draw sample for each tree with replacement. If false, do not sample with replacement.
        set_bootstrap / get_bootstrap = "Bootstrap": bool,
        /// The fraction of outliers in the training data set. If this is set to 0.0, it speeds up the
        /// training and all predicted labels will be false.
        set_contamination / get_contamination = "Contamination": f64,
        /// The error allowed when calculating the threshold required to achieve the specified
        /// contamination fraction. 0.0 forces an exact calculation of the threshold.
        set_contamination_error / get_contamination_error = "ContaminationError": f64,
        /// The feature vector.
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The number of features used to train each tree. Between 0.0 and 1.0 it is a fraction,
        /// above 1.0 a count.
        set_max_features / get_max_features = "MaxFeatures": f64,
        /// The number of samples used to train each tree. Between 0.0 and 1.0 it is a fraction,
        /// above 1.0 a count.
        set_max_samples / get_max_samples = "MaxSamples": f64,
        /// The number of trees in the ensemble.
        set_num_estimators / get_num_estimators = "NumEstimators": i32,
        /// The predicted label.
        set_prediction_col / get_prediction_col = "PredictionCol": String,
        /// The seed used for the random number generator.
        set_random_seed / get_random_seed = "RandomSeed": i64,
        /// The outlier score.
        set_score_col / get_score_col = "ScoreCol": String,
    }
}

jvmbridge::remote_class! {
    pub struct IsolationForestModel("com.microsoft.azure.synapse.ml.isolationforest.IsolationForestModel");
    params {
        /// If true, draw sample for each tree with replacement. If false, do not sample with replacement.
        set_bootstrap / get_bootstrap = "Bootstrap": bool,
        /// The fraction of outliers in the training data set. If this is set to 0.0, it speeds up the
        /// training and all predicted labels will be false.
        set_contamination / get_contamination = "Contamination": f64,
        /// The error allowed when calculating the threshold required to achieve the specified
        /// contamination fraction. 0.0 forces an exact calculation of the threshold.
        set_contamination_error / get_contamination_error = "ContaminationError": f64,
        /// The feature vector.
        set_features_col / get_features_col = "FeaturesCol": String,
        /// The number of features used to train each tree. Between 0.0 and 1.0 it is a fraction,
        /// above 1.0 a count.
        set_max_features / get_max_features = "MaxFeatures": f64,
        /// The number of samples used to train each tree. Between 0.0 and 1.0 it is a fraction,
        /// above 1.0 a count.
        set_max_samples / get_max_samples = "MaxSamples": f64,
        /// The number of trees in the ensemble.
        set_num_estimators / get_num_estimators = "NumEstimators": i32,
        /// The predicted label.
        set_prediction_col / get_prediction_col = "PredictionCol": String,
        /// The seed used for the random number generator.
        set_random_seed / get_random_seed = "RandomSeed": i64,
        /// The outlier score.
        set_score_col / get_score_col = "ScoreCol": String,
    }
    objects {
        /// The fitted isolation forest.
        set_inner_model / get_inner_model = "InnerModel": AnyTransformer,
    }
}

transformers!(IsolationForestModel);

estimators! {
    IsolationForest => IsolationForestModel,
}
