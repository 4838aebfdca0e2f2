//! Dashboard view models
//!
//! One record type per analytics endpoint. Maps keyed by diagnosis group
//! serialize their keys as the integer code in string form (`"0"`, `"1"`).

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Values keyed by diagnosis code, kept in ascending code order.
#[derive(Debug, Clone, PartialEq)]
pub struct ByDiagnosis<T>(pub Vec<(i64, T)>);

impl<T> ByDiagnosis<T> {
    pub fn get(&self, diagnosis: i64) -> Option<&T> {
        self.0.iter().find(|(k, _)| *k == diagnosis).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Serialize> Serialize for ByDiagnosis<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, value) in &self.0 {
            map.serialize_entry(&code.to_string(), value)?;
        }
        map.end()
    }
}

/// Values keyed by field name, in a fixed field order.
#[derive(Debug, Clone, PartialEq)]
pub struct ByField<T>(pub Vec<(&'static str, T)>);

impl<T> ByField<T> {
    pub fn get(&self, field: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| *k == field).map(|(_, v)| v)
    }
}

impl<T: Serialize> Serialize for ByField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, value) in &self.0 {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// `GET /api/summary`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub diagnosis_counts: ByDiagnosis<usize>,
    pub percent_alzheimer: f64,
    pub mean_age: f64,
    pub gender_male: f64,
    pub gender_female: f64,
}

/// `GET /api/diagnosis_counts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisCounts {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

/// `GET /api/age_distribution`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDistribution {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

/// Full spread of one numeric column within a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// `GET /api/bmi_stats`
pub type BmiStats = ByDiagnosis<SpreadStats>;

/// `GET /api/education_vs_diagnosis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationVsDiagnosis {
    pub labels: Vec<String>,
    pub no_dementia: Vec<usize>,
    pub dementia: Vec<usize>,
}

/// `GET /api/smoking_by_diag` and `GET /api/activity_by_diag`
pub type GroupMeans = ByDiagnosis<f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlcoholSummary {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub mean: f64,
}

/// `GET /api/alcohol_stats`
pub type AlcoholStats = ByDiagnosis<AlcoholSummary>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuartileSummary {
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

/// `GET /api/cognitive_stats`
pub type CognitiveStats = ByDiagnosis<ByField<QuartileSummary>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDataset {
    pub label: String,
    pub data: Vec<f64>,
}

/// `GET /api/radar_data`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarData {
    pub labels: Vec<String>,
    pub datasets: Vec<RadarDataset>,
}

/// `GET /api/correlation_diagnosis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationDiagnosis {
    pub features: Vec<String>,
    pub values: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagnosis_keys_are_strings_in_order() {
        let counts = ByDiagnosis(vec![(0, 5usize), (1, 3usize)]);
        let value = serde_json::to_value(&counts).unwrap();
        assert_eq!(value, json!({"0": 5, "1": 3}));

        let text = serde_json::to_string(&counts).unwrap();
        assert_eq!(text, r#"{"0":5,"1":3}"#);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let means: GroupMeans = ByDiagnosis(vec![(0, f64::NAN)]);
        assert_eq!(serde_json::to_string(&means).unwrap(), r#"{"0":null}"#);
    }

    #[test]
    fn test_by_field_order_is_preserved() {
        let fields = ByField(vec![("MMSE", 1.0), ("ADL", 2.0)]);
        assert_eq!(serde_json::to_string(&fields).unwrap(), r#"{"MMSE":1.0,"ADL":2.0}"#);
        assert_eq!(fields.get("ADL"), Some(&2.0));
    }
}
