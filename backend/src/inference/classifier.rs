use shared::{PredictionResult, CIFAR10_CLASSES};
use std::sync::Arc;

use super::model::ScoreModel;
use super::preprocess::PreprocessedTensor;
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub result: PredictionResult,
    /// Softmax distribution, indexed like `CIFAR10_CLASSES`.
    pub probabilities: Vec<f32>,
}

#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn ScoreModel>,
}

impl Classifier {
    pub fn new(model: Arc<dyn ScoreModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> String {
        self.model.describe()
    }

    pub fn classify(&self, input: &PreprocessedTensor) -> Result<Classification, PipelineError> {
        let scores = self.model.forward(input)?;

        if scores.len() != CIFAR10_CLASSES.len() {
            return Err(PipelineError::Inference(format!(
                "Expected {} class scores, model returned {}",
                CIFAR10_CLASSES.len(),
                scores.len()
            )));
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(PipelineError::Inference(
                "Model returned non-finite scores".to_string(),
            ));
        }

        let probabilities = softmax(&scores);
        let (index, max_probability) = argmax(&probabilities);

        Ok(Classification {
            result: PredictionResult {
                label: CIFAR10_CLASSES[index].to_string(),
                confidence: (max_probability * 100.0).clamp(0.0, 100.0),
            },
            probabilities,
        })
    }
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max_score = scores.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_sum: f32 = scores.iter().map(|&x| (x - max_score).exp()).sum();
    scores
        .iter()
        .map(|&x| (x - max_score).exp() / exp_sum)
        .collect()
}

/// Index and value of the largest element; ties go to the lowest index.
pub fn argmax(values: &[f32]) -> (usize, f32) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 { (i, v) } else { best }
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::inference::preprocess::{preprocess, tests::solid_red_png};

    /// Returns fixed scores regardless of input.
    pub struct FixedScores(pub Vec<f32>);

    impl ScoreModel for FixedScores {
        fn forward(&self, _input: &PreprocessedTensor) -> Result<Vec<f32>, PipelineError> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixed-scores".to_string()
        }
    }

    /// Deterministic stand-in whose scores depend on the mean of each channel.
    pub struct ChannelMeans;

    impl ScoreModel for ChannelMeans {
        fn forward(&self, input: &PreprocessedTensor) -> Result<Vec<f32>, PipelineError> {
            let mut sums = [0.0f32; 3];
            for pixel in input.as_slice().chunks_exact(3) {
                for c in 0..3 {
                    sums[c] += pixel[c];
                }
            }
            let n = (input.as_slice().len() / 3) as f32;
            Ok((0..10)
                .map(|i| sums[i % 3] / n * (i as f32 + 1.0))
                .collect())
        }

        fn describe(&self) -> String {
            "channel-means".to_string()
        }
    }

    fn classifier(model: impl ScoreModel + 'static) -> Classifier {
        Classifier::new(Arc::new(model))
    }

    #[test]
    fn test_softmax_is_a_distribution() {
        let cases: [&[f32]; 4] = [
            &[1.0, 2.0, 3.0],
            &[0.0; 10],
            &[-50.0, 0.0, 50.0, 3.5, -2.25, 7.0, 1.0, 0.0, 9.0, -9.0],
            &[1000.0, 999.0, -1000.0],
        ];
        for scores in cases {
            let probs = softmax(scores);
            let sum: f32 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sum was {}", sum);
            assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_softmax_known_values() {
        let probs = softmax(&[0.0, 0.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);

        let probs = softmax(&[1.0, 2.0, 3.0]);
        let expected = [0.09003057, 0.24472847, 0.66524096];
        for (p, e) in probs.iter().zip(expected) {
            assert!((p - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_argmax_ties_pick_first() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]).0, 1);

        let c = classifier(FixedScores(vec![2.0; 10]));
        let tensor = preprocess(&solid_red_png(8, 8)).unwrap();
        let classification = c.classify(&tensor).unwrap();
        assert_eq!(classification.result.label, "airplane");
        assert!((classification.result.confidence - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_label_and_confidence() {
        let mut scores = vec![0.0; 10];
        scores[3] = 5.0;
        let c = classifier(FixedScores(scores.clone()));
        let tensor = preprocess(&solid_red_png(8, 8)).unwrap();
        let classification = c.classify(&tensor).unwrap();

        assert_eq!(classification.result.label, "cat");
        let expected = 100.0 * softmax(&scores)[3];
        assert!((classification.result.confidence - expected).abs() < 1e-4);
        assert!((0.0..=100.0).contains(&classification.result.confidence));
        assert_eq!(classification.probabilities.len(), 10);
    }

    #[test]
    fn test_inference_is_deterministic() {
        let c = classifier(ChannelMeans);
        let tensor = preprocess(&solid_red_png(64, 64)).unwrap();
        let first = c.classify(&tensor).unwrap();
        for _ in 0..5 {
            assert_eq!(c.classify(&tensor).unwrap(), first);
        }
    }

    #[test]
    fn test_wrong_score_count_is_an_inference_error() {
        let c = classifier(FixedScores(vec![1.0; 1000]));
        let tensor = preprocess(&solid_red_png(8, 8)).unwrap();
        assert!(matches!(c.classify(&tensor), Err(PipelineError::Inference(_))));
    }

    #[test]
    fn test_non_finite_scores_are_rejected() {
        let mut scores = vec![0.0; 10];
        scores[4] = f32::NAN;
        let c = classifier(FixedScores(scores));
        let tensor = preprocess(&solid_red_png(8, 8)).unwrap();
        assert!(matches!(c.classify(&tensor), Err(PipelineError::Inference(_))));
    }
}
