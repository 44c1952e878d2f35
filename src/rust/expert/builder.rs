use std::collections::BTreeSet;

use log::{error, info};

use super::encoder::encode;
use super::error::ExpertError;
use super::expert::Expert;
use super::table::TrainingTable;
use super::tree::{CategoricalClassifier, DecisionTree};
use crate::TreeConfig;

/// Trains an expert predicting `target_column` from every other column of `table`.
///
/// The expert's case id is the target column name. Use [`ExpertBuilder`] to
/// choose a case id, tree limits or a different classifier.
///
/// # Errors
/// - `Training` if the table is empty or the target has fewer than two labels
/// - `Schema` if the target column does not exist
pub fn train(table: &TrainingTable, target_column: &str) -> Result<Expert, ExpertError> {
    ExpertBuilder::new()
        .case_id(target_column)?
        .target(target_column)?
        .build(table)
}

/// A builder for training an [`Expert`] with a fluent interface.
#[derive(Debug, Default)]
pub struct ExpertBuilder {
    case_id: Option<String>,
    target_column: Option<String>,
    tree_config: TreeConfig,
    classifier: Option<Box<dyn CategoricalClassifier>>,
}

impl ExpertBuilder {
    /// Creates a new builder that trains a default [`DecisionTree`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the case identifier the expert answers for
    ///
    /// # Example
    /// ```
    /// use expert_panel::ExpertBuilder;
    ///
    /// assert!(ExpertBuilder::new().case_id("Case 1").is_ok());
    /// assert!(ExpertBuilder::new().case_id("  ").is_err());
    /// ```
    pub fn case_id(mut self, case_id: impl Into<String>) -> Result<Self, ExpertError> {
        let case_id = case_id.into().trim().to_string();
        if case_id.is_empty() {
            return Err(ExpertError::Validation("Case id cannot be empty".into()));
        }
        self.case_id = Some(case_id);
        Ok(self)
    }

    /// Sets the column the expert learns to predict
    pub fn target(mut self, target_column: impl Into<String>) -> Result<Self, ExpertError> {
        let target_column = target_column.into().trim().to_string();
        if target_column.is_empty() {
            return Err(ExpertError::Validation("Target column cannot be empty".into()));
        }
        self.target_column = Some(target_column);
        Ok(self)
    }

    /// Sets the growth limits of the default decision tree
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.tree_config = config;
        self
    }

    /// Replaces the default decision tree with another classifier
    pub fn with_classifier(mut self, classifier: Box<dyn CategoricalClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Encodes `table`, fits the classifier and binds it to the schema.
    ///
    /// # Returns
    /// * `Result<Expert, ExpertError>` - The trained expert, or an error if:
    ///   - No target column was set (`Validation`)
    ///   - The table has no rows (`Training`)
    ///   - The target column is missing from the table (`Schema`)
    ///   - The target column holds fewer than two distinct labels (`Training`)
    ///   - The classifier fails to fit
    pub fn build(self, table: &TrainingTable) -> Result<Expert, ExpertError> {
        let target_column = self
            .target_column
            .ok_or_else(|| ExpertError::Validation("Target column must be set".into()))?;
        let case_id = self.case_id.unwrap_or_else(|| target_column.clone());

        if table.is_empty() {
            return Err(ExpertError::Training(format!(
                "Case '{}': training table is empty",
                case_id
            )));
        }

        let (features, schema) = encode(table, &target_column)?;
        let labels: Vec<String> = table
            .column_values(&target_column)
            .ok_or_else(|| ExpertError::Schema(format!("Target column '{}' not found", target_column)))?
            .into_iter()
            .map(str::to_string)
            .collect();

        let distinct: BTreeSet<&str> = labels.iter().map(String::as_str).collect();
        if distinct.len() < 2 {
            return Err(ExpertError::Training(format!(
                "Case '{}': target column '{}' needs at least 2 distinct labels, found {}",
                case_id,
                target_column,
                distinct.len()
            )));
        }

        let mut model: Box<dyn CategoricalClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Box::new(DecisionTree::new(self.tree_config)),
        };
        model.fit(features.view(), &labels).map_err(|e| {
            error!("Failed to fit classifier for case '{}': {}", case_id, e);
            e
        })?;

        let input_columns = table
            .columns()
            .iter()
            .filter(|c| **c != target_column)
            .cloned()
            .collect();

        info!(
            "Trained expert '{}' on {} rows: {} features, {} labels",
            case_id,
            table.len(),
            schema.len(),
            distinct.len()
        );

        Ok(Expert::new(case_id, target_column, input_columns, schema, model))
    }
}
