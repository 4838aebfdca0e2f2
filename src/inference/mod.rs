//! Inference Module - MRI scan classification
//!
//! Decode → resize/normalize → classifier → argmax label.

pub mod engine;
pub mod preprocess;

pub use engine::{Classifier, InferenceError, OnnxClassifier};
pub use preprocess::{TensorLayout, INPUT_SIZE};

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::analytics::stats::round_to;
use crate::models::{DementiaClass, Prediction};

/// Engine status for `/api/model/status`
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    pub model_name: String,
    pub input_size: u32,
    pub input_layout: TensorLayout,
    pub classes: Vec<&'static str>,
    pub inference_count: u64,
    pub avg_latency_ms: f32,
}

/// Shared predictor: owns the classifier and its latency counters
pub struct Predictor {
    classifier: Box<dyn Classifier>,
    layout: TensorLayout,
    input_size: u32,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Predictor {
    pub fn new(classifier: Box<dyn Classifier>, layout: TensorLayout) -> Self {
        Self {
            classifier,
            layout,
            input_size: INPUT_SIZE,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Classify raw image bytes. Blocking; run off the async executor.
    pub fn predict(&self, bytes: &[u8]) -> Result<Prediction, InferenceError> {
        let start_time = std::time::Instant::now();

        let image = preprocess::decode_image(bytes)?;
        let tensor = preprocess::to_tensor(&image, self.input_size, self.layout);
        let scores = self.classifier.classify(tensor)?;

        let (index, confidence) = argmax(&scores)?;
        let predicted_class = DementiaClass::from_index(index).ok_or(InferenceError::OutputShape {
            expected: DementiaClass::ALL.len(),
            actual: scores.len(),
        })?;

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        Ok(Prediction {
            predicted_class,
            probability: round_to(confidence as f64 * 100.0, 2),
            scores,
            inference_time_us,
        })
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_name: self.classifier.name(),
            input_size: self.input_size,
            input_layout: self.layout,
            classes: DementiaClass::ALL.iter().map(|c| c.as_str()).collect(),
            inference_count: count,
            avg_latency_ms: avg,
        }
    }

    pub fn model_name(&self) -> String {
        self.classifier.name()
    }
}

/// Index and value of the highest score; first index wins ties
fn argmax(scores: &[f32]) -> Result<(usize, f32), InferenceError> {
    if scores.len() != DementiaClass::ALL.len() {
        return Err(InferenceError::OutputShape {
            expected: DementiaClass::ALL.len(),
            actual: scores.len(),
        });
    }

    let mut best = (0, scores[0]);
    for (i, &score) in scores.iter().enumerate().skip(1) {
        if score > best.1 {
            best = (i, score);
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::preprocess::tests::png_bytes;
    use image::RgbImage;
    use ndarray::Array4;

    struct FixedClassifier(Vec<f32>);

    impl Classifier for FixedClassifier {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn classify(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            if input.shape() != [1, 224, 224, 3] {
                return Err(InferenceError::Tensor(format!("bad shape {:?}", input.shape())));
            }
            Ok(self.0.clone())
        }
    }

    fn black_png() -> Vec<u8> {
        png_bytes(RgbImage::new(224, 224))
    }

    #[test]
    fn test_predict_maps_argmax_to_label() {
        let predictor = Predictor::new(
            Box::new(FixedClassifier(vec![0.05, 0.1, 0.8123, 0.0377])),
            TensorLayout::Nhwc,
        );
        let prediction = predictor.predict(&black_png()).unwrap();

        assert_eq!(prediction.predicted_class, DementiaClass::NonDemented);
        assert_eq!(prediction.probability, 81.23);
        assert_eq!(prediction.scores, vec![0.05, 0.1, 0.8123, 0.0377]);
    }

    #[test]
    fn test_argmax_tie_takes_first() {
        assert_eq!(argmax(&[0.25, 0.25, 0.25, 0.25]).unwrap(), (0, 0.25));
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]).unwrap().0, 1);
    }

    #[test]
    fn test_wrong_output_size_is_error() {
        let predictor = Predictor::new(Box::new(FixedClassifier(vec![0.5, 0.5])), TensorLayout::Nhwc);
        let result = predictor.predict(&black_png());
        assert!(matches!(
            result,
            Err(InferenceError::OutputShape { expected: 4, actual: 2 })
        ));
    }

    #[test]
    fn test_decode_error_propagates() {
        let predictor = Predictor::new(
            Box::new(FixedClassifier(vec![1.0, 0.0, 0.0, 0.0])),
            TensorLayout::Nhwc,
        );
        assert!(matches!(predictor.predict(b"garbage"), Err(InferenceError::Decode(_))));
        assert_eq!(predictor.status().inference_count, 0);
    }

    #[test]
    fn test_status_counts_inferences() {
        let predictor = Predictor::new(
            Box::new(FixedClassifier(vec![0.0, 1.0, 0.0, 0.0])),
            TensorLayout::Nhwc,
        );
        predictor.predict(&black_png()).unwrap();
        predictor.predict(&black_png()).unwrap();

        let status = predictor.status();
        assert_eq!(status.inference_count, 2);
        assert_eq!(status.model_name, "fixed");
        assert_eq!(status.classes.len(), 4);
        assert_eq!(status.input_size, 224);
    }
}
