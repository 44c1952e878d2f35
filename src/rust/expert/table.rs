use std::collections::HashSet;

use super::error::ExpertError;
use super::utils::fill_missing;

/// An ordered, rectangular table of categorical cells.
///
/// Every row has exactly one cell per column. Cells may be missing; a blank
/// string is treated the same as an absent cell, and both are read back as
/// [`MISSING_CATEGORY`](super::MISSING_CATEGORY) by [`TrainingTable::value`].
///
/// ```
/// use expert_panel::TrainingTable;
///
/// let table = TrainingTable::from_records(vec![
///     vec![("HORARIO", "MANHA"), ("PRODUTO", "SIM")],
///     vec![("HORARIO", "TARDE"), ("PRODUTO", "NAO")],
/// ]).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.columns(), &["HORARIO".to_string(), "PRODUTO".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl TrainingTable {
    /// Creates an empty table with the given column names.
    ///
    /// Fails with a `Schema` error if a column name is empty or repeated.
    pub fn new<I, S>(columns: I) -> Result<Self, ExpertError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.into().trim().to_string())
            .collect();

        let mut seen = HashSet::new();
        for column in &columns {
            if column.is_empty() {
                return Err(ExpertError::Schema("Column names cannot be empty".into()));
            }
            if !seen.insert(column.as_str()) {
                return Err(ExpertError::Schema(format!("Duplicate column '{}'", column)));
            }
        }

        Ok(Self { columns, rows: Vec::new() })
    }

    /// Builds a table from records given as `(column, value)` pairs.
    ///
    /// The first record fixes the column order. Every following record must
    /// carry the same set of columns, in any order. Empty values are missing.
    pub fn from_records<R, K, V>(records: impl IntoIterator<Item = R>) -> Result<Self, ExpertError>
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let records: Vec<Vec<(String, String)>> = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(k, v)| (k.into().trim().to_string(), v.into()))
                    .collect()
            })
            .collect();

        let first = records
            .first()
            .ok_or_else(|| ExpertError::Schema("At least one record is required".into()))?;
        let mut table = Self::new(first.iter().map(|(k, _)| k.clone()))?;

        for (i, pairs) in records.into_iter().enumerate() {
            if pairs.len() != table.columns.len() {
                return Err(ExpertError::Schema(format!(
                    "Record {} has {} columns, expected {}",
                    i + 1,
                    pairs.len(),
                    table.columns.len()
                )));
            }

            let mut row = vec![None; table.columns.len()];
            for (column, value) in pairs {
                let idx = table.column_index(&column).ok_or_else(|| {
                    ExpertError::Schema(format!("Record {} has unknown column '{}'", i + 1, column))
                })?;
                if row[idx].is_some() {
                    return Err(ExpertError::Schema(format!(
                        "Record {} repeats column '{}'",
                        i + 1,
                        column
                    )));
                }
                row[idx] = Some(value);
            }
            table.push_row(row)?;
        }

        Ok(table)
    }

    /// Appends a row. Blank strings are stored as missing cells.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), ExpertError> {
        if row.len() != self.columns.len() {
            return Err(ExpertError::Schema(format!(
                "Row {} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        let row = row
            .into_iter()
            .map(|cell| cell.filter(|v| !v.trim().is_empty()))
            .collect();
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Returns the raw cell, `None` when it is missing.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    /// Returns the cell with missing values replaced by the sentinel category.
    pub fn value(&self, row: usize, column: usize) -> &str {
        fill_missing(self.cell(row, column))
    }

    /// Returns every value of a column, missing cells filled.
    pub fn column_values(&self, column: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(column)?;
        Some((0..self.rows.len()).map(|row| self.value(row, idx)).collect())
    }
}

/// A single record to analyze: input column name to raw value.
///
/// Insertion order is kept. Setting a column twice replaces its value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRecord {
    values: Vec<(String, String)>,
}

impl ClientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into().trim().to_string();
        let value = value.into();
        match self.values.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.values.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for ClientRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = ClientRecord::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expert::MISSING_CATEGORY;

    #[test]
    fn test_from_records_keeps_first_column_order() -> Result<(), ExpertError> {
        let table = TrainingTable::from_records(vec![
            vec![("B", "1"), ("A", "2")],
            vec![("A", "3"), ("B", "4")],
        ])?;
        assert_eq!(table.columns(), &["B".to_string(), "A".to_string()]);
        assert_eq!(table.cell(1, 0), Some("4"));
        assert_eq!(table.cell(1, 1), Some("3"));
        Ok(())
    }

    #[test]
    fn test_mismatched_records_are_rejected() {
        let result = TrainingTable::from_records(vec![
            vec![("A", "1"), ("B", "2")],
            vec![("A", "1"), ("C", "2")],
        ]);
        assert!(matches!(result, Err(ExpertError::Schema(_))));

        let result = TrainingTable::from_records(vec![
            vec![("A", "1"), ("B", "2")],
            vec![("A", "1")],
        ]);
        assert!(matches!(result, Err(ExpertError::Schema(_))));
    }

    #[test]
    fn test_column_validation() {
        assert!(matches!(TrainingTable::new(vec!["A", "A"]), Err(ExpertError::Schema(_))));
        assert!(matches!(TrainingTable::new(vec!["A", " "]), Err(ExpertError::Schema(_))));
    }

    #[test]
    fn test_blank_cells_are_missing() -> Result<(), ExpertError> {
        let mut table = TrainingTable::new(vec!["TEMPERATURA"])?;
        table.push_row(vec![Some("  ".to_string())])?;
        table.push_row(vec![None])?;
        table.push_row(vec![Some("FRIO".to_string())])?;

        assert_eq!(table.cell(0, 0), None);
        assert_eq!(table.value(0, 0), MISSING_CATEGORY);
        assert_eq!(
            table.column_values("TEMPERATURA"),
            Some(vec![MISSING_CATEGORY, MISSING_CATEGORY, "FRIO"])
        );
        assert!(table.push_row(vec![None, None]).is_err());
        Ok(())
    }

    #[test]
    fn test_client_record_replaces_values() {
        let mut record = ClientRecord::new().with_value("HORARIO", "MANHA");
        record.set("HORARIO", "TARDE");
        record.set("MES", "JANEIRO");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("HORARIO"), Some("TARDE"));
        assert!(record.contains("MES"));
        assert!(!record.contains("PRODUTO"));
    }

    #[test]
    fn test_client_record_from_pairs() {
        let record: ClientRecord = vec![("HORARIO", "MANHA"), (" MES ", ""), ("HORARIO", "NOITE")]
            .into_iter()
            .collect();
        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("HORARIO", "NOITE"), ("MES", "")]
        );
    }
}
