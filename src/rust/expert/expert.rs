use log::debug;

use super::align::align;
use super::encoder::FeatureSchema;
use super::error::ExpertError;
use super::table::ClientRecord;
use super::tree::CategoricalClassifier;
use super::ExpertInfo;

/// A trained classifier bound to the feature schema it was trained on.
///
/// The model is never exposed without its schema: the only way to query it is
/// [`Expert::predict`], which aligns the incoming record first.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use expert_panel::{train, ClientRecord, TrainingTable};
///
/// let table = TrainingTable::from_records(vec![
///     vec![("HORARIO", "MANHA"), ("MES", "JANEIRO"), ("PRODUTO", "SIM")],
///     vec![("HORARIO", "TARDE"), ("MES", "FEVEREIRO"), ("PRODUTO", "NAO")],
/// ])?;
/// let expert = train(&table, "PRODUTO")?;
///
/// let record = ClientRecord::new()
///     .with_value("HORARIO", "MANHA")
///     .with_value("MES", "JANEIRO");
/// assert_eq!(expert.predict(&record)?, "SIM");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Expert {
    case_id: String,
    target_column: String,
    input_columns: Vec<String>,
    schema: FeatureSchema,
    model: Box<dyn CategoricalClassifier>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Expert>();
    }
};

impl Expert {
    /// Creates a new ExpertBuilder for fluent construction
    pub fn builder() -> super::builder::ExpertBuilder {
        super::builder::ExpertBuilder::new()
    }

    pub(crate) fn new(
        case_id: String,
        target_column: String,
        input_columns: Vec<String>,
        schema: FeatureSchema,
        model: Box<dyn CategoricalClassifier>,
    ) -> Self {
        Self {
            case_id,
            target_column,
            input_columns,
            schema,
            model,
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    /// Columns a client record is expected to provide, in training order.
    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Returns information about the expert's trained state
    pub fn info(&self) -> ExpertInfo {
        ExpertInfo {
            case_id: self.case_id.clone(),
            target_column: self.target_column.clone(),
            input_columns: self.input_columns.clone(),
            num_features: self.schema.len(),
            class_labels: self.model.classes().to_vec(),
        }
    }

    /// Predicts the target label for a record.
    ///
    /// # Errors
    /// - `Schema` if the model was fitted on a different width than the schema
    /// - Any error the classifier reports
    pub fn predict(&self, record: &ClientRecord) -> Result<String, ExpertError> {
        let aligned = align(record, &self.schema);
        if let Some(width) = self.model.n_features() {
            if width != aligned.len() {
                return Err(ExpertError::Schema(format!(
                    "Expert '{}' was fitted on {} features but its schema has {}",
                    self.case_id,
                    width,
                    aligned.len()
                )));
            }
        }

        let label = self.model.predict(aligned.view())?;
        debug!("Expert '{}' predicted '{}'", self.case_id, label);
        Ok(label)
    }
}
