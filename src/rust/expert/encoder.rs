use std::collections::HashMap;

use ndarray::Array2;

use super::error::ExpertError;
use super::table::TrainingTable;
use super::utils::feature_name;

/// The ordered list of one-hot feature names a model was trained on.
///
/// Each name is `"{column}_{value}"` for a (column, category) pair observed in
/// the training table. Once produced by [`encode`] a schema never changes; it
/// is the only way to rebuild a compatible vector for an unseen record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    fn from_names(names: Vec<String>) -> Result<Self, ExpertError> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(ExpertError::Schema(format!(
                    "Feature '{}' is produced by more than one column/value pair",
                    name
                )));
            }
        }
        Ok(Self { names, index })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.index.get(feature).copied()
    }

    pub fn contains(&self, feature: &str) -> bool {
        self.index.contains_key(feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// One-hot encodes every column of `table` except `excluded_column`.
///
/// Missing cells are encoded as the sentinel category. Features are ordered by
/// table column, then by the order in which each value first appears.
///
/// # Errors
/// - `Schema` if `excluded_column` is not a column of the table
/// - `Schema` if two column/value pairs collapse into the same feature name
///
/// # Example
/// ```
/// use expert_panel::{encode, TrainingTable};
///
/// let table = TrainingTable::from_records(vec![
///     vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM")],
///     vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO")],
/// ]).unwrap();
/// let (matrix, schema) = encode(&table, "PRODUTO").unwrap();
/// assert_eq!(schema.names(), &["HORARIO_MANHA".to_string(), "HORARIO_TARDE".to_string()]);
/// assert_eq!(matrix.shape(), &[2, 2]);
/// ```
pub fn encode(
    table: &TrainingTable,
    excluded_column: &str,
) -> Result<(Array2<f64>, FeatureSchema), ExpertError> {
    if !table.has_column(excluded_column) {
        return Err(ExpertError::Schema(format!(
            "Target column '{}' not found in table",
            excluded_column
        )));
    }

    // (column index, value) for every feature, in schema order
    let mut pairs: Vec<(usize, &str)> = Vec::new();
    for (col, column) in table.columns().iter().enumerate() {
        if column == excluded_column {
            continue;
        }
        let start = pairs.len();
        for row in 0..table.len() {
            let value = table.value(row, col);
            if !pairs[start..].iter().any(|(_, v)| *v == value) {
                pairs.push((col, value));
            }
        }
    }

    let names = pairs
        .iter()
        .map(|&(col, value)| feature_name(&table.columns()[col], value))
        .collect();
    let schema = FeatureSchema::from_names(names)?;

    let mut matrix = Array2::zeros((table.len(), schema.len()));
    for row in 0..table.len() {
        for (feature, &(col, value)) in pairs.iter().enumerate() {
            if table.value(row, col) == value {
                matrix[[row, feature]] = 1.0;
            }
        }
    }

    Ok((matrix, schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> TrainingTable {
        TrainingTable::from_records(vec![
            vec![("HORARIO", "MANHA"), ("MES", "JANEIRO"), ("PRODUTO", "SIM")],
            vec![("HORARIO", "TARDE"), ("MES", "FEVEREIRO"), ("PRODUTO", "NAO")],
            vec![("HORARIO", "MANHA"), ("MES", "MARCO"), ("PRODUTO", "NAO")],
        ])
        .unwrap()
    }

    #[test]
    fn test_first_seen_ordering() -> Result<(), ExpertError> {
        let (_, schema) = encode(&sample_table(), "PRODUTO")?;
        assert_eq!(
            schema.names(),
            &[
                "HORARIO_MANHA".to_string(),
                "HORARIO_TARDE".to_string(),
                "MES_JANEIRO".to_string(),
                "MES_FEVEREIRO".to_string(),
                "MES_MARCO".to_string(),
            ]
        );
        assert_eq!(schema.index_of("MES_FEVEREIRO"), Some(3));
        assert!(!schema.contains("PRODUTO_SIM"));
        Ok(())
    }

    #[test]
    fn test_matrix_rows_are_one_hot() -> Result<(), ExpertError> {
        let (matrix, schema) = encode(&sample_table(), "PRODUTO")?;
        assert_eq!(matrix.shape(), &[3, schema.len()]);
        for row in matrix.rows() {
            // one active feature per input column
            assert_eq!(row.sum(), 2.0);
        }
        assert_eq!(matrix.row(2).to_vec(), vec![1.0, 0.0, 0.0, 0.0, 1.0]);
        Ok(())
    }

    #[test]
    fn test_missing_target_column() {
        let result = encode(&sample_table(), "IDADE");
        assert!(matches!(result, Err(ExpertError::Schema(_))));
    }

    #[test]
    fn test_ambiguous_feature_names() {
        let table = TrainingTable::from_records(vec![vec![
            ("A_B", "C"),
            ("A", "B_C"),
            ("Y", "1"),
        ]])
        .unwrap();
        assert!(matches!(encode(&table, "Y"), Err(ExpertError::Schema(_))));
    }
}
