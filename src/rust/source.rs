use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;

use crate::expert::{ExpertError, TrainingTable};

/// Where a training table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// A CSV file on disk
    File(PathBuf),
    /// A CSV document over HTTP(S); Google Sheets share links are accepted
    Url(String),
}

impl TableSource {
    /// Interprets `location` as a URL when it starts with `http://` or
    /// `https://`, and as a file path otherwise.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            TableSource::Url(location.to_string())
        } else {
            TableSource::File(PathBuf::from(location))
        }
    }

    /// Loads and parses the table.
    ///
    /// # Errors
    /// - `DataSource` if the file cannot be read, the request fails or returns
    ///   a non-success status, or the content is not a well-formed CSV table
    pub async fn load(&self) -> Result<TrainingTable, ExpertError> {
        match self {
            TableSource::File(path) => load_csv_file(path).await,
            TableSource::Url(url) => fetch_csv(url).await,
        }
    }
}

impl fmt::Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::File(path) => write!(f, "{}", path.display()),
            TableSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Rewrites a Google Sheets share link into its CSV export link. Other URLs
/// are returned unchanged.
///
/// ```
/// use expert_panel::sheet_export_url;
///
/// assert_eq!(
///     sheet_export_url("https://docs.google.com/spreadsheets/d/abc/edit?usp=sharing"),
///     "https://docs.google.com/spreadsheets/d/abc/export?format=csv"
/// );
/// ```
pub fn sheet_export_url(url: &str) -> String {
    if !url.contains("docs.google.com/spreadsheets/") {
        return url.to_string();
    }
    match url.rfind("/edit") {
        Some(pos) => format!("{}/export?format=csv", &url[..pos]),
        None => url.to_string(),
    }
}

/// Parses CSV content whose first row holds the column names.
///
/// Cells that are empty after trimming are read as missing.
pub fn parse_csv<R: Read>(reader: R) -> Result<TrainingTable, ExpertError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ExpertError::DataSource("CSV content has no header row".into()));
    }
    let mut table = TrainingTable::new(headers.iter())
        .map_err(|e| ExpertError::DataSource(format!("Invalid CSV header: {}", e)))?;

    for record in reader.records() {
        let record = record?;
        table
            .push_row(record.iter().map(|cell| Some(cell.to_string())).collect())
            .map_err(|e| ExpertError::DataSource(e.to_string()))?;
    }

    Ok(table)
}

/// Reads a CSV table from disk.
pub async fn load_csv_file(path: impl AsRef<Path>) -> Result<TrainingTable, ExpertError> {
    let path = path.as_ref();
    info!("Loading training table from {:?}", path);
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ExpertError::DataSource(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let table = parse_csv(bytes.as_slice())?;
    info!("Loaded {} rows x {} columns", table.len(), table.columns().len());
    Ok(table)
}

/// Downloads a CSV table, converting Google Sheets share links first.
pub async fn fetch_csv(url: &str) -> Result<TrainingTable, ExpertError> {
    let url = sheet_export_url(url);
    info!("Downloading training table from {}", url);
    let response = reqwest::get(&url).await?.error_for_status()?;
    info!("Download response status: {}", response.status());
    let bytes = response.bytes().await?;
    info!("Downloaded {} bytes", bytes.len());
    let table = parse_csv(&bytes[..])?;
    info!("Loaded {} rows x {} columns", table.len(), table.columns().len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            TableSource::parse("https://example.com/cases.csv"),
            TableSource::Url("https://example.com/cases.csv".into())
        );
        assert_eq!(
            TableSource::parse(" data/cases.csv "),
            TableSource::File(PathBuf::from("data/cases.csv"))
        );
    }

    #[test]
    fn test_sheet_export_url() {
        assert_eq!(
            sheet_export_url("https://docs.google.com/spreadsheets/d/abc/edit#gid=0"),
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv"
        );
        assert_eq!(
            sheet_export_url("https://example.com/edit/cases.csv"),
            "https://example.com/edit/cases.csv"
        );
    }

    #[test]
    fn test_parse_csv() -> Result<(), ExpertError> {
        let data = "HORARIO, MES ,PRODUTO\nMANHA,JANEIRO,SIM\nTARDE,,NAO\n";
        let table = parse_csv(data.as_bytes())?;
        assert_eq!(
            table.columns(),
            &["HORARIO".to_string(), "MES".to_string(), "PRODUTO".to_string()]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 1), None);
        Ok(())
    }

    #[test]
    fn test_parse_ragged_csv() {
        let data = "A,B\n1,2\n3\n";
        assert!(matches!(parse_csv(data.as_bytes()), Err(ExpertError::DataSource(_))));
    }
}
