//! Model selection results from `com.microsoft.azure.synapse.ml.automl`.

use crate::catalog::AnyTransformer;
use crate::ml::DataFrame;
use crate::ml::transformers;

jvmbridge::remote_class! {
    /// The winner of a model search along with its evaluation datasets.
    pub struct BestModel("com.microsoft.azure.synapse.ml.automl.BestModel");
    objects {
        /// all model metrics
        set_all_model_metrics / get_all_model_metrics = "AllModelMetrics": DataFrame,
        /// the best model found
        set_best_model / get_best_model = "BestModel": AnyTransformer,
        /// the metrics from the best model
        set_best_model_metrics / get_best_model_metrics = "BestModelMetrics": DataFrame,
        /// the roc curve of the best model
        set_roc_curve / get_roc_curve = "RocCurve": DataFrame,
        /// dataset scored by best model
        set_scored_dataset / get_scored_dataset = "ScoredDataset": DataFrame,
    }
}

transformers!(BestModel);
