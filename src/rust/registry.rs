use std::collections::BTreeMap;

use log::{error, info, warn};

use crate::expert::{Expert, ExpertBuilder, ExpertError, TrainingTable};
use crate::orchestrator::analysis_name;
use crate::TreeConfig;

/// A case to train: its identifier and the column its expert predicts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDefinition {
    pub case_id: String,
    pub target_column: String,
}

impl CaseDefinition {
    pub fn new(case_id: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into().trim().to_string(),
            target_column: target_column.into().trim().to_string(),
        }
    }
}

/// The trained experts, keyed by case id.
///
/// Built once by [`RegistryBuilder`] and read-only afterwards, so it can be
/// shared across threads behind an `Arc`. Cases that failed to load or train
/// are absent from the registry and listed by [`ExpertRegistry::failures`].
#[derive(Debug, Default)]
pub struct ExpertRegistry {
    experts: BTreeMap<String, Expert>,
    failures: BTreeMap<String, ExpertError>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<ExpertRegistry>();
    }
};

impl ExpertRegistry {
    /// Creates a new RegistryBuilder for fluent construction
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry with no experts.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.experts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }

    pub fn get(&self, case_id: &str) -> Option<&Expert> {
        self.experts.get(case_id)
    }

    pub fn contains(&self, case_id: &str) -> bool {
        self.experts.contains_key(case_id)
    }

    pub fn case_ids(&self) -> impl Iterator<Item = &str> {
        self.experts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expert)> {
        self.experts.iter().map(|(id, expert)| (id.as_str(), expert))
    }

    /// Cases that could not be trained, with the reason.
    pub fn failures(&self) -> &BTreeMap<String, ExpertError> {
        &self.failures
    }

    /// Union of the experts' input columns, in first-seen order.
    pub fn input_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for expert in self.experts.values() {
            for column in expert.input_columns() {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        columns
    }
}

enum PendingCase {
    Ready(TrainingTable),
    Unavailable(ExpertError),
}

/// A builder that trains one expert per added case.
#[derive(Default)]
pub struct RegistryBuilder {
    cases: Vec<(CaseDefinition, PendingCase)>,
    tree_config: TreeConfig,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tree limits used for every case
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.tree_config = config;
        self
    }

    /// Adds a case together with its training table.
    ///
    /// # Errors
    /// - `Validation` if the case id or target column is empty
    /// - `Validation` if an added case reports under the same analysis name,
    ///   e.g. "Case 1" and "Case_1"
    pub fn add_case(mut self, case: CaseDefinition, table: TrainingTable) -> Result<Self, ExpertError> {
        self.validate_case(&case)?;
        self.cases.push((case, PendingCase::Ready(table)));
        Ok(self)
    }

    /// Adds a case whose table could not be obtained. It is recorded as a
    /// failure when the registry is built.
    pub fn add_unavailable_case(
        mut self,
        case: CaseDefinition,
        err: ExpertError,
    ) -> Result<Self, ExpertError> {
        self.validate_case(&case)?;
        self.cases.push((case, PendingCase::Unavailable(err)));
        Ok(self)
    }

    fn validate_case(&self, case: &CaseDefinition) -> Result<(), ExpertError> {
        if case.case_id.is_empty() {
            return Err(ExpertError::Validation("Case id cannot be empty".into()));
        }
        if case.target_column.is_empty() {
            return Err(ExpertError::Validation(format!(
                "Case '{}' must name a target column",
                case.case_id
            )));
        }
        let name = analysis_name(&case.case_id);
        let clash = self
            .cases
            .iter()
            .find(|(c, _)| analysis_name(&c.case_id) == name);
        if let Some((existing, _)) = clash {
            return Err(ExpertError::Validation(format!(
                "Case '{}' clashes with case '{}' (both report as '{}')",
                case.case_id, existing.case_id, name
            )));
        }
        Ok(())
    }

    /// Trains every case and returns the registry.
    ///
    /// A case that fails is logged and recorded in
    /// [`ExpertRegistry::failures`]; the remaining cases still train.
    pub fn build(self) -> ExpertRegistry {
        let mut registry = ExpertRegistry::default();

        for (case, pending) in self.cases {
            info!("Training expert for case '{}' (target '{}')", case.case_id, case.target_column);
            let result = match pending {
                PendingCase::Ready(table) => ExpertBuilder::new()
                    .case_id(case.case_id.as_str())
                    .and_then(|b| b.target(case.target_column.as_str()))
                    .and_then(|b| b.with_config(self.tree_config.clone()).build(&table)),
                PendingCase::Unavailable(err) => Err(err),
            };

            match result {
                Ok(expert) => {
                    registry.experts.insert(case.case_id, expert);
                }
                Err(e) => {
                    error!("Case '{}' could not be trained: {}", case.case_id, e);
                    registry.failures.insert(case.case_id, e);
                }
            }
        }

        if registry.is_empty() {
            warn!("No expert could be trained");
        } else {
            info!(
                "Registry ready: {} expert(s), {} failed case(s)",
                registry.len(),
                registry.failures.len()
            );
        }
        registry
    }
}
