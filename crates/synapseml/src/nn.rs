//! Nearest-neighbour search from `com.microsoft.azure.synapse.ml.nn`.

use jvmbridge::ObjectRef;

use crate::ml::estimators;
use crate::ml::transformers;

jvmbridge::remote_class! {
    /// Builds a ball tree over a feature column for k-nearest-neighbour queries.
    pub struct KNN("com.microsoft.azure.synapse.ml.nn.KNN");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// number of matches to return
        set_k / get_k = "K": i32,
        /// max size of the leaves of the tree
        set_leaf_size / get_leaf_size = "LeafSize": i32,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
        /// column holding values for each feature (key) that will be returned when queried
        set_values_col / get_values_col = "ValuesCol": String,
    }
}

jvmbridge::remote_class! {
    pub struct KNNModel("com.microsoft.azure.synapse.ml.nn.KNNModel");
    params {
        /// The name of the features column
        set_features_col / get_features_col = "FeaturesCol": String,
        /// number of matches to return
        set_k / get_k = "K": i32,
        /// max size of the leaves of the tree
        set_leaf_size / get_leaf_size = "LeafSize": i32,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
        /// column holding values for each feature (key) that will be returned when queried
        set_values_col / get_values_col = "ValuesCol": String,
    }
    objects {
        // The tree has no proxy of its own; it only travels back into `set_ball_tree`.
        /// the ballTree model used for performing queries
        set_ball_tree / get_ball_tree = "BallTree": ObjectRef,
    }
}

transformers!(KNNModel);

estimators! {
    KNN => KNNModel,
}
