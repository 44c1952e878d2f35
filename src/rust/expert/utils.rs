/// Category every missing cell is materialized as before encoding.
pub const MISSING_CATEGORY: &str = "Nao_Informado";

/// Maps an absent or blank cell to [`MISSING_CATEGORY`], leaving real values untouched.
pub(crate) fn fill_missing(cell: Option<&str>) -> &str {
    match cell {
        Some(value) if !value.trim().is_empty() => value,
        _ => MISSING_CATEGORY,
    }
}

pub(crate) fn feature_name(column: &str, value: &str) -> String {
    format!("{}_{}", column, value)
}

pub(crate) fn normalize_case_id(case_id: &str) -> String {
    case_id.replace(' ', "_")
}
