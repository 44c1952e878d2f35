use std::collections::BTreeMap;
use std::io::Write;

use log::{debug, error, info};
use serde::Serialize;

use crate::expert::{normalize_case_id, ClientRecord, ExpertError};
use crate::registry::ExpertRegistry;

const ANALYSIS_PREFIX: &str = "Analise_";

/// Name a case's verdict is reported under: `Analise_` followed by the case
/// id with spaces replaced by underscores.
pub fn analysis_name(case_id: &str) -> String {
    format!("{}{}", ANALYSIS_PREFIX, normalize_case_id(case_id))
}

/// The verdict of every expert for one record, keyed by analysis name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    entries: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct ReportRow<'a> {
    analysis: &'a str,
    label: &'a str,
}

impl Report {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// An empty report means no analysis was possible.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, analysis: &str) -> Option<&str> {
        self.entries.get(analysis).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Writes the report as CSV with an `analysis,label` header.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExpertError> {
        let mut writer = csv::Writer::from_writer(writer);
        for (analysis, label) in self.iter() {
            writer.serialize(ReportRow { analysis, label })?;
        }
        writer.flush()?;
        Ok(())
    }

    fn insert(&mut self, analysis: String, label: String) {
        self.entries.insert(analysis, label);
    }
}

/// Runs `record` through every expert of `registry`.
///
/// Each case is analyzed independently. A case whose prediction fails is
/// logged and left out of the report. An empty registry yields an empty report.
///
/// # Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use expert_panel::{analyze, CaseDefinition, ClientRecord, ExpertRegistry, TrainingTable};
///
/// let table = TrainingTable::from_records(vec![
///     vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM")],
///     vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO")],
/// ])?;
/// let registry = ExpertRegistry::builder()
///     .add_case(CaseDefinition::new("Case 1", "PRODUTO"), table)?
///     .build();
///
/// let report = analyze(&ClientRecord::new().with_value("HORARIO", "TARDE"), &registry);
/// assert_eq!(report.get("Analise_Case_1"), Some("NAO"));
/// # Ok(())
/// # }
/// ```
pub fn analyze(record: &ClientRecord, registry: &ExpertRegistry) -> Report {
    let mut report = Report::default();
    info!("Analyzing record against {} expert(s)", registry.len());

    for (case_id, expert) in registry.iter() {
        match expert.predict(record) {
            Ok(label) => {
                let name = analysis_name(case_id);
                debug!("{} -> {}", name, label);
                report.insert(name, label);
            }
            Err(e) => {
                error!("Case '{}' could not analyze the record: {}", case_id, e);
            }
        }
    }

    report
}
