//! Trains one categorical classifier ("expert") per case and evaluates a new
//! record against every expert.
//!
//! Each expert is a decision tree fitted on the one-hot encoding of a training
//! table. The encoding's feature schema is frozen at training time and travels
//! with the model, so a record seen later is always re-encoded onto exactly the
//! columns its expert knows.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use expert_panel::{analyze, CaseDefinition, ClientRecord, ExpertRegistry, TrainingTable};
//!
//! let table = TrainingTable::from_records(vec![
//!     vec![("HORARIO", "MANHA"), ("MES", "JANEIRO"), ("PRODUTO", "SIM")],
//!     vec![("HORARIO", "TARDE"), ("MES", "FEVEREIRO"), ("PRODUTO", "NAO")],
//! ])?;
//!
//! let registry = ExpertRegistry::builder()
//!     .add_case(CaseDefinition::new("Case 1", "PRODUTO"), table)?
//!     .build();
//!
//! let record = ClientRecord::new()
//!     .with_value("HORARIO", "MANHA")
//!     .with_value("MES", "JANEIRO");
//! let report = analyze(&record, &registry);
//! assert_eq!(report.get("Analise_Case_1"), Some("SIM"));
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A built registry is read-only and can be shared across threads using `Arc`:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use expert_panel::{analyze, CaseDefinition, ClientRecord, ExpertRegistry, TrainingTable};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let table = TrainingTable::from_records(vec![
//!     vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM")],
//!     vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO")],
//! ])?;
//! let registry = Arc::new(ExpertRegistry::builder()
//!     .add_case(CaseDefinition::new("Case 1", "PRODUTO"), table)?
//!     .build());
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let registry = Arc::clone(&registry);
//!     handles.push(thread::spawn(move || {
//!         let record = ClientRecord::new().with_value("HORARIO", "TARDE");
//!         assert_eq!(analyze(&record, &registry).len(), 1);
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

mod config;
pub mod expert;
pub mod orchestrator;
pub mod registry;
pub mod source;

pub use config::TreeConfig;
pub use expert::{
    align, encode, train, CategoricalClassifier, ClientRecord, DecisionTree, Expert, ExpertBuilder,
    ExpertError, ExpertInfo, FeatureSchema, TrainingTable, MISSING_CATEGORY,
};
pub use orchestrator::{analysis_name, analyze, Report};
pub use registry::{CaseDefinition, ExpertRegistry, RegistryBuilder};
pub use source::{fetch_csv, load_csv_file, parse_csv, sheet_export_url, TableSource};

pub fn init_logger() {
    env_logger::init();
}
