mod align;
mod builder;
mod encoder;
mod error;
#[allow(clippy::module_inception)]
mod expert;
mod table;
mod tree;
mod utils;

pub use align::align;
pub use builder::{train, ExpertBuilder};
pub use encoder::{encode, FeatureSchema};
pub use error::ExpertError;
pub use expert::Expert;
pub use table::{ClientRecord, TrainingTable};
pub use tree::{CategoricalClassifier, DecisionTree};
pub use utils::MISSING_CATEGORY;

pub(crate) use utils::normalize_case_id;

/// Information about the trained state of an expert
#[derive(Debug, Clone, PartialEq)]
pub struct ExpertInfo {
    /// Case the expert answers for
    pub case_id: String,
    /// Column the expert predicts
    pub target_column: String,
    /// Columns the expert reads from a client record
    pub input_columns: Vec<String>,
    /// Width of the feature schema
    pub num_features: usize,
    /// Labels the expert can predict, sorted
    pub class_labels: Vec<String>,
}
