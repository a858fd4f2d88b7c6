//! Column-level pipeline stages from `com.microsoft.azure.synapse.ml.stages`.

use std::collections::HashMap;

use crate::catalog::AnyStage;
use crate::catalog::AnyTransformer;
use crate::ml::DataFrame;
use crate::ml::estimators;
use crate::ml::transformers;

jvmbridge::remote_class! {
    /// Drops the named columns from a dataset.
    pub struct DropColumns("com.microsoft.azure.synapse.ml.stages.DropColumns");
    params {
        /// Comma separated list of column names
        set_cols / get_cols = "Cols": Vec<String>,
    }
}

jvmbridge::remote_class! {
    /// Keeps only the named columns of a dataset.
    pub struct SelectColumns("com.microsoft.azure.synapse.ml.stages.SelectColumns");
    params {
        /// Comma separated list of selected column names
        set_cols / get_cols = "Cols": Vec<String>,
    }
}

jvmbridge::remote_class! {
    pub struct RenameColumn("com.microsoft.azure.synapse.ml.stages.RenameColumn");
    params {
        /// The name of the input column
        set_input_col / get_input_col = "InputCol": String,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
    }
}

jvmbridge::remote_class! {
    /// Repartitions a dataset into `n` partitions.
    pub struct Repartition("com.microsoft.azure.synapse.ml.stages.Repartition");
    params {
        /// Whether to disable repartitioning (so that one can turn it off for evaluation)
        set_disable / get_disable = "Disable": bool,
        /// Number of partitions
        set_n / get_n = "N": i32,
    }
}

jvmbridge::remote_class! {
    /// Normalizes text and applies substring replacements.
    pub struct TextPreprocessor("com.microsoft.azure.synapse.ml.stages.TextPreprocessor");
    params {
        /// The name of the input column
        set_input_col / get_input_col = "InputCol": String,
        /// Map of substring match to replacement
        set_map / get_map = "Map": HashMap<String, String>,
        /// Name of normalization function to apply
        set_norm_func / get_norm_func = "NormFunc": String,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
    }
}

jvmbridge::remote_class! {
    /// Groups rows by key and combines their scores.
    pub struct EnsembleByKey("com.microsoft.azure.synapse.ml.stages.EnsembleByKey");
    params {
        /// Names of the result of each col
        set_col_names / get_col_names = "ColNames": Vec<String>,
        /// Whether to collapse all items in group to one entry
        set_collapse_group / get_collapse_group = "CollapseGroup": bool,
        /// Cols to ensemble
        set_cols / get_cols = "Cols": Vec<String>,
        /// Keys to group by
        set_keys / get_keys = "Keys": Vec<String>,
        /// How to ensemble the scores, ex: mean
        set_strategy / get_strategy = "Strategy": String,
        /// the dimensions of any vector columns, used to avoid materialization
        set_vector_dims / get_vector_dims = "VectorDims": HashMap<String, i32>,
    }
}

jvmbridge::remote_class! {
    /// Computes per-class weights that balance a label column.
    pub struct ClassBalancer("com.microsoft.azure.synapse.ml.stages.ClassBalancer");
    params {
        /// Whether to broadcast the class to weight mapping to the worker
        set_broadcast_join / get_broadcast_join = "BroadcastJoin": bool,
        /// The name of the input column
        set_input_col / get_input_col = "InputCol": String,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
    }
}

jvmbridge::remote_class! {
    pub struct ClassBalancerModel("com.microsoft.azure.synapse.ml.stages.ClassBalancerModel");
    params {
        /// whether to broadcast join
        set_broadcast_join / get_broadcast_join = "BroadcastJoin": bool,
        /// The name of the input column
        set_input_col / get_input_col = "InputCol": String,
        /// The name of the output column
        set_output_col / get_output_col = "OutputCol": String,
    }
    objects {
        /// the dataframe of weights
        set_weights / get_weights = "Weights": DataFrame,
    }
}

jvmbridge::remote_class! {
    /// Times the fit of the wrapped stage.
    pub struct Timer("com.microsoft.azure.synapse.ml.stages.Timer");
    params {
        /// Whether to disable timing (so that one can turn it off for evaluation)
        set_disable_materialization / get_disable_materialization = "DisableMaterialization": bool,
        /// Whether to output the time to the scala console
        set_log_to_scala / get_log_to_scala = "LogToScala": bool,
    }
    objects {
        /// The stage to time
        set_stage / get_stage = "Stage": AnyStage,
    }
}

jvmbridge::remote_class! {
    pub struct TimerModel("com.microsoft.azure.synapse.ml.stages.TimerModel");
    params {
        /// Whether to disable timing (so that one can turn it off for evaluation)
        set_disable_materialization / get_disable_materialization = "DisableMaterialization": bool,
        /// Whether to output the time to the scala console
        set_log_to_scala / get_log_to_scala = "LogToScala": bool,
    }
    objects {
        /// The stage to time
        set_stage / get_stage = "Stage": AnyStage,
        /// inner model to time
        set_transformer / get_transformer = "Transformer": AnyTransformer,
    }
}

transformers! {
    DropColumns,
    SelectColumns,
    RenameColumn,
    Repartition,
    TextPreprocessor,
    EnsembleByKey,
    ClassBalancerModel,
    TimerModel,
}

estimators! {
    ClassBalancer => ClassBalancerModel,
    Timer => TimerModel,
}
