use ndarray::Array1;

use super::encoder::FeatureSchema;
use super::table::ClientRecord;
use super::utils::{feature_name, fill_missing};

/// Re-encodes `record` onto the exact column order of `schema`.
///
/// Each (column, value) pair of the record is named with the same one-hot
/// rule used at training time and looked up in the schema. Features the
/// record does not exercise are `0.0`; pairs the schema never saw are
/// dropped without affecting the others. The result always has
/// `schema.len()` components, each `0.0` or `1.0`.
///
/// # Example
/// ```
/// use expert_panel::{align, encode, ClientRecord, TrainingTable};
///
/// let table = TrainingTable::from_records(vec![
///     vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM")],
///     vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO")],
/// ]).unwrap();
/// let (_, schema) = encode(&table, "PRODUTO").unwrap();
///
/// let record = ClientRecord::new().with_value("HORARIO", "NOITE");
/// assert_eq!(align(&record, &schema).to_vec(), vec![0.0, 0.0]);
/// ```
pub fn align(record: &ClientRecord, schema: &FeatureSchema) -> Array1<f64> {
    let mut aligned = Array1::zeros(schema.len());
    for (column, value) in record.iter() {
        if let Some(i) = schema.index_of(&feature_name(column, fill_missing(Some(value)))) {
            aligned[i] = 1.0;
        }
    }
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expert::{encode, TrainingTable, MISSING_CATEGORY};

    fn schema() -> FeatureSchema {
        let table = TrainingTable::from_records(vec![
            vec![("HORARIO", "MANHA"), ("MES", "JANEIRO"), ("PRODUTO", "SIM")],
            vec![("HORARIO", "TARDE"), ("MES", "FEVEREIRO"), ("PRODUTO", "NAO")],
            vec![("HORARIO", "TARDE"), ("MES", ""), ("PRODUTO", "NAO")],
        ])
        .unwrap();
        encode(&table, "PRODUTO").unwrap().1
    }

    #[test]
    fn test_align_known_record() {
        let record = ClientRecord::new()
            .with_value("HORARIO", "MANHA")
            .with_value("MES", "JANEIRO");
        assert_eq!(align(&record, &schema()).to_vec(), vec![1.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_drops_unknown_categories() {
        let record = ClientRecord::new()
            .with_value("HORARIO", "TARDE")
            .with_value("MES", "DEZEMBRO")
            .with_value("SEXO", "F");
        let aligned = align(&record, &schema());
        assert_eq!(aligned.len(), 5);
        assert_eq!(aligned.to_vec(), vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_blank_value_matches_missing_category() {
        let schema = schema();
        assert!(schema.contains(&format!("MES_{}", MISSING_CATEGORY)));

        let record = ClientRecord::new().with_value("HORARIO", "TARDE").with_value("MES", "");
        assert_eq!(align(&record, &schema).to_vec(), vec![0.0, 1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_align_empty_record() {
        let aligned = align(&ClientRecord::new(), &schema());
        assert_eq!(aligned.len(), 5);
        assert!(aligned.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_align_is_idempotent() {
        let schema = schema();
        let record = ClientRecord::new().with_value("MES", "FEVEREIRO");
        assert_eq!(align(&record, &schema), align(&record, &schema));
    }

    #[test]
    fn test_align_keeps_matches_beside_clashing_extra_columns() {
        let table = TrainingTable::from_records(vec![
            vec![("HORARIO", "MANHA"), ("A_B", "X"), ("PRODUTO", "SIM")],
            vec![("HORARIO", "TARDE"), ("A_B", "Y"), ("PRODUTO", "NAO")],
        ])
        .unwrap();
        let (_, schema) = encode(&table, "PRODUTO").unwrap();

        // "A_B"/"C" and "A"/"B_C" both name the unseen feature "A_B_C"
        let record = ClientRecord::new()
            .with_value("HORARIO", "TARDE")
            .with_value("A_B", "C")
            .with_value("A", "B_C");
        assert_eq!(align(&record, &schema).to_vec(), vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_align_ignores_blank_column_names() {
        let record = ClientRecord::new()
            .with_value("HORARIO", "TARDE")
            .with_value(" ", "x");
        let aligned = align(&record, &schema());
        assert_eq!(aligned.to_vec(), vec![0.0, 1.0, 0.0, 0.0, 0.0]);
    }
}
