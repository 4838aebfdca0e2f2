//! Prediction model

use serde::{Deserialize, Serialize};

/// Classifier output classes, in model output index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DementiaClass {
    MildDemented,
    ModerateDemented,
    NonDemented,
    VeryMildDemented,
}

impl DementiaClass {
    pub const ALL: [DementiaClass; 4] = [
        DementiaClass::MildDemented,
        DementiaClass::ModerateDemented,
        DementiaClass::NonDemented,
        DementiaClass::VeryMildDemented,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DementiaClass::MildDemented => "MildDemented",
            DementiaClass::ModerateDemented => "ModerateDemented",
            DementiaClass::NonDemented => "NonDemented",
            DementiaClass::VeryMildDemented => "VeryMildDemented",
        }
    }
}

impl std::fmt::Display for DementiaClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_class: DementiaClass,
    /// Confidence of `predicted_class`, 0-100, two decimals
    pub probability: f64,
    pub scores: Vec<f32>,
    pub inference_time_us: u64,
}

/// `POST /api/predict` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub filename: String,
    pub predicted_class: DementiaClass,
    pub probability: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_order() {
        assert_eq!(DementiaClass::from_index(0), Some(DementiaClass::MildDemented));
        assert_eq!(DementiaClass::from_index(2), Some(DementiaClass::NonDemented));
        assert_eq!(DementiaClass::from_index(4), None);
    }

    #[test]
    fn test_class_serializes_as_label() {
        let json = serde_json::to_string(&DementiaClass::VeryMildDemented).unwrap();
        assert_eq!(json, "\"VeryMildDemented\"");
        assert_eq!(DementiaClass::ModerateDemented.to_string(), "ModerateDemented");
    }
}
