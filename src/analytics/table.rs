//! Patient table - CSV loading and schema validation
//!
//! The table is columnar and immutable once built. Every numeric cell is
//! stored as `Option<f64>`; empty cells and the usual NA spellings (`NA`,
//! `NaN`, `null`, `N/A`, ...) are `None` and are skipped by all aggregates.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;

/// Diagnosis flag column (0 = no dementia, 1 = dementia)
pub const DIAGNOSIS: &str = "Diagnosis";

/// Columns that the dashboard views read directly
pub const REQUIRED_COLUMNS: &[&str] = &[
    DIAGNOSIS,
    "Age",
    "Gender",
    "BMI",
    "EducationLevel",
    "Smoking",
    "AlcoholConsumption",
    "PhysicalActivity",
    "MMSE",
    "MemoryComplaints",
    "BehavioralProblems",
    "Confusion",
    "Disorientation",
    "Forgetfulness",
    "DifficultyCompletingTasks",
    "ADL",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataset has no column `{0}`")]
    MissingColumn(String),

    #[error("column `{0}` is not numeric")]
    NotNumeric(String),

    #[error("row {row}: diagnosis must be an integer, got `{value}`")]
    InvalidDiagnosis { row: usize, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every cell is an integer literal
    Integer,
    /// Every non-empty cell is a number
    Float,
    /// Anything else; values are not retained
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    values: Vec<Option<f64>>,
}

impl Column {
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Label for a value of this column, formatted the way the dataset
    /// spells it (`2` for integer columns, `2.0` for float columns).
    pub fn format_value(&self, value: f64) -> String {
        match self.kind {
            ColumnKind::Integer => format!("{}", value as i64),
            _ if value.fract() == 0.0 && value.is_finite() => format!("{:.1}", value),
            _ => format!("{}", value),
        }
    }
}

/// In-memory patient table.
#[derive(Debug, Clone)]
pub struct PatientTable {
    columns: Vec<Column>,
    rows: usize,
    /// Row indices per diagnosis value, ascending by diagnosis
    groups: Vec<(i64, Vec<usize>)>,
}

impl PatientTable {
    /// Load and validate a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse and validate CSV from any reader
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for result in reader.records() {
            let record = result?;
            for (i, cell) in record.iter().enumerate().take(headers.len()) {
                raw[i].push(cell.to_string());
            }
        }

        let rows = raw.first().map(Vec::len).unwrap_or(0);
        let columns = headers
            .iter()
            .zip(raw)
            .map(|(name, cells)| build_column(name, &cells))
            .collect();

        let mut table = Self { columns, rows, groups: Vec::new() };
        table.validate()?;
        table.groups = table.group_by_diagnosis()?;

        tracing::debug!(
            "Patient table loaded: {} rows, {} columns, {} diagnosis groups",
            table.rows,
            table.columns.len(),
            table.groups.len()
        );

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric column by name; errors if absent or non-numeric
    pub fn numeric(&self, name: &str) -> Result<&Column, DatasetError> {
        let column = self
            .column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        if !column.kind.is_numeric() {
            return Err(DatasetError::NotNumeric(name.to_string()));
        }
        Ok(column)
    }

    /// Diagnosis groups as `(diagnosis, row indices)`, ascending
    pub fn groups(&self) -> &[(i64, Vec<usize>)] {
        &self.groups
    }

    /// Non-missing values of `column` restricted to `rows`
    pub fn present_values(&self, column: &Column, rows: &[usize]) -> Vec<f64> {
        rows.iter()
            .filter_map(|&r| column.values.get(r).copied().flatten())
            .collect()
    }

    fn validate(&self) -> Result<(), DatasetError> {
        for name in REQUIRED_COLUMNS {
            self.numeric(name)?;
        }
        Ok(())
    }

    fn group_by_diagnosis(&self) -> Result<Vec<(i64, Vec<usize>)>, DatasetError> {
        let diagnosis = self.numeric(DIAGNOSIS)?;
        let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();

        for (row, value) in diagnosis.values.iter().enumerate() {
            let code = match value {
                Some(v) if v.fract() == 0.0 => *v as i64,
                other => {
                    return Err(DatasetError::InvalidDiagnosis {
                        row,
                        value: other.map(|v| v.to_string()).unwrap_or_default(),
                    })
                }
            };
            groups.entry(code).or_default().push(row);
        }

        Ok(groups.into_iter().collect())
    }
}

/// Cell spellings read as a missing value
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell)
}

fn build_column(name: &str, cells: &[String]) -> Column {
    let all_integer = !cells.is_empty() && cells.iter().all(|c| c.parse::<i64>().is_ok());
    if all_integer {
        let values = cells.iter().map(|c| c.parse::<i64>().ok().map(|v| v as f64)).collect();
        return Column { name: name.to_string(), kind: ColumnKind::Integer, values };
    }

    // Non-finite numbers (`inf`, a `nan` spelling not in the token list) are missing too
    let parsed: Option<Vec<Option<f64>>> = cells
        .iter()
        .map(|c| {
            if is_missing(c) {
                Some(None)
            } else {
                c.parse::<f64>().ok().map(|v| v.is_finite().then_some(v))
            }
        })
        .collect();

    match parsed {
        Some(values) => Column { name: name.to_string(), kind: ColumnKind::Float, values },
        None => Column {
            name: name.to_string(),
            kind: ColumnKind::Text,
            values: vec![None; cells.len()],
        },
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADER: &str = "PatientID,Age,Gender,EducationLevel,BMI,Smoking,AlcoholConsumption,\
PhysicalActivity,MMSE,MemoryComplaints,BehavioralProblems,Confusion,Disorientation,\
PersonalityChanges,DifficultyCompletingTasks,Forgetfulness,ADL,Diagnosis,DoctorInCharge";

    pub(crate) fn sample_csv() -> String {
        let rows = [
            "4751,73,0,2,22.9,0,13.3,6.3,21.4,0,0,0,0,0,1,0,1.7,0,XXXConfid",
            "4752,89,0,0,26.8,0,4.5,7.6,20.6,0,0,0,0,0,0,1,2.5,0,XXXConfid",
            "4753,73,0,1,17.8,0,19.6,7.8,7.4,0,0,0,1,0,1,0,7.1,0,XXXConfid",
            "4754,74,1,1,33.8,1,12.2,8.4,13.0,0,1,0,0,0,0,0,6.5,0,XXXConfid",
            "4755,89,0,0,20.7,0,18.5,6.3,4.0,0,0,0,0,1,1,0,0.0,0,XXXConfid",
            "4756,86,1,1,30.6,0,16.2,0.6,21.5,0,0,0,1,0,0,1,9.0,1,XXXConfid",
            "4757,68,0,2,38.4,1,15.5,9.2,5.0,1,0,1,0,0,0,0,3.1,1,XXXConfid",
            "4758,75,1,1,18.0,0,12.9,0.2,6.0,1,1,0,1,1,1,1,2.0,1,XXXConfid",
        ];
        format!("{}\n{}\n", HEADER, rows.join("\n"))
    }

    pub(crate) fn sample_table() -> PatientTable {
        PatientTable::from_reader(sample_csv().as_bytes()).unwrap()
    }

    #[test]
    fn test_column_kinds() {
        let table = sample_table();
        assert_eq!(table.len(), 8);
        assert_eq!(table.column("Age").unwrap().kind, ColumnKind::Integer);
        assert_eq!(table.column("BMI").unwrap().kind, ColumnKind::Float);
        assert_eq!(table.column("DoctorInCharge").unwrap().kind, ColumnKind::Text);
    }

    #[test]
    fn test_groups_are_ascending() {
        let table = sample_table();
        let groups = table.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, 0);
        assert_eq!(groups[0].1, vec![0, 1, 2, 3, 4]);
        assert_eq!(groups[1].0, 1);
        assert_eq!(groups[1].1.len(), 3);
    }

    #[test]
    fn test_empty_cells_are_missing() {
        let csv = format!(
            "{}\n1,70,1,1,,0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,0,X\n2,80,0,1,25.0,0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,1,X\n",
            HEADER
        );
        let table = PatientTable::from_reader(csv.as_bytes()).unwrap();
        let bmi = table.column("BMI").unwrap();
        assert_eq!(bmi.kind, ColumnKind::Float);
        assert_eq!(bmi.values(), &[None, Some(25.0)]);
    }

    #[test]
    fn test_na_tokens_are_missing() {
        for token in ["NA", "NaN", "null", "N/A"] {
            let csv = format!(
                "{}\n1,70,1,1,{},0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,0,X\n2,80,0,1,25.0,0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,1,X\n",
                HEADER, token
            );
            let table = PatientTable::from_reader(csv.as_bytes()).unwrap();
            let bmi = table.numeric("BMI").unwrap();
            assert_eq!(bmi.kind, ColumnKind::Float, "{}", token);
            assert_eq!(bmi.values(), &[None, Some(25.0)], "{}", token);
        }
    }

    #[test]
    fn test_nan_cell_does_not_poison_group_stats() {
        let csv = format!(
            "{}\n1,70,1,1,NaN,0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,0,X\n2,80,0,1,20.0,0,1.0,1.0,1.0,0,0,0,0,0,0,0,1.0,0,X\n",
            HEADER
        );
        let table = PatientTable::from_reader(csv.as_bytes()).unwrap();
        let bmi = table.numeric("BMI").unwrap();
        let values = table.present_values(bmi, &table.groups()[0].1);
        assert_eq!(values, vec![20.0]);
    }

    #[test]
    fn test_non_finite_number_is_missing() {
        let csv = sample_csv().replacen(",22.9,", ",inf,", 1);
        let table = PatientTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.column("BMI").unwrap().values()[0], None);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PatientTable::from_path(dir.path().join("absent.csv"));
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }

    #[test]
    fn test_missing_required_column() {
        let result = PatientTable::from_reader("Diagnosis,Age\n0,70\n".as_bytes());
        match result {
            Err(DatasetError::MissingColumn(name)) => assert_eq!(name, "Gender"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_non_integer_diagnosis() {
        let csv = sample_csv().replacen(",0,XXXConfid", ",0.5,XXXConfid", 1);
        let result = PatientTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::InvalidDiagnosis { row: 0, .. })));
    }

    #[test]
    fn test_reject_text_in_required_column() {
        let csv = sample_csv().replacen("4751,73,", "4751,old,", 1);
        let result = PatientTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::NotNumeric(name)) if name == "Age"));
    }

    #[test]
    fn test_format_value() {
        let table = sample_table();
        assert_eq!(table.column("EducationLevel").unwrap().format_value(2.0), "2");
        assert_eq!(table.column("BMI").unwrap().format_value(3.0), "3.0");
        assert_eq!(table.column("BMI").unwrap().format_value(22.9), "22.9");
    }
}
