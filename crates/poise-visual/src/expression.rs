//! Expression - seven-way emotion distribution from facial geometry
//!
//! Each emotion gets a linear score over the facial features, clamped to
//! [0, 1]. The clamped scores are normalized into a distribution and the
//! dominant emotion is picked in canonical order.

use std::fmt;

use poise_core::{Emotion, LandmarkSet, NOT_DETECTED};

use crate::FaceFeatures;

/// Emotion distribution - one weight per emotion, in canonical order
///
/// Weights sum to 1.0 when a face produced any signal, and are all
/// zero otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmotionDistribution {
    weights: [f32; Emotion::COUNT],
}

impl EmotionDistribution {
    /// All-zero distribution (no face)
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build directly from weights in canonical order
    pub fn from_weights(weights: [f32; Emotion::COUNT]) -> Self {
        Self { weights }
    }

    /// Normalize non-negative scores so they sum to 1.0
    ///
    /// A zero total yields the all-zero distribution.
    pub fn normalize(scores: [f32; Emotion::COUNT]) -> Self {
        let total: f64 = scores.iter().map(|s| f64::from(*s)).sum();
        if total <= 0.0 {
            return Self::zero();
        }

        let mut weights = [0.0; Emotion::COUNT];
        for (weight, score) in weights.iter_mut().zip(scores.iter()) {
            *weight = (f64::from(*score) / total) as f32;
        }
        Self { weights }
    }

    /// Weight for one emotion
    #[inline]
    pub fn get(&self, emotion: Emotion) -> f32 {
        self.weights[emotion.index()]
    }

    /// Weights in canonical order
    pub fn weights(&self) -> &[f32; Emotion::COUNT] {
        &self.weights
    }

    /// (emotion, weight) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        Emotion::ALL.iter().map(move |e| (*e, self.weights[e.index()]))
    }

    pub fn total(&self) -> f32 {
        self.weights.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(|w| *w == 0.0)
    }

    /// Dominant emotion
    ///
    /// Scans in canonical order and only moves on a strictly greater
    /// weight, so exact ties go to the earlier emotion.
    pub fn dominant(&self) -> (Emotion, f32) {
        let mut best = (Emotion::ALL[0], self.weights[0]);
        for (emotion, weight) in self.iter().skip(1) {
            if weight > best.1 {
                best = (emotion, weight);
            }
        }
        best
    }

    /// Component-wise arithmetic mean, zero for an empty input
    pub fn mean<'a>(distributions: impl IntoIterator<Item = &'a EmotionDistribution>) -> Self {
        let mut sums = [0.0f64; Emotion::COUNT];
        let mut count = 0usize;
        for distribution in distributions {
            for (sum, weight) in sums.iter_mut().zip(distribution.weights.iter()) {
                *sum += f64::from(*weight);
            }
            count += 1;
        }

        if count == 0 {
            return Self::zero();
        }

        let mut weights = [0.0; Emotion::COUNT];
        for (weight, sum) in weights.iter_mut().zip(sums.iter()) {
            *weight = (sum / count as f64) as f32;
        }
        Self { weights }
    }
}

/// Expression label: a dominant emotion or nothing to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionLabel {
    Detected(Emotion),
    NotDetected,
}

impl ExpressionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionLabel::Detected(emotion) => emotion.as_str(),
            ExpressionLabel::NotDetected => NOT_DETECTED,
        }
    }
}

impl fmt::Display for ExpressionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expression classification result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionResult {
    pub label: ExpressionLabel,
    /// Weight of the dominant emotion [0.0 - 1.0]
    pub confidence: f32,
    pub emotions: EmotionDistribution,
}

impl ExpressionResult {
    /// Nothing to classify
    pub fn not_detected() -> Self {
        Self {
            label: ExpressionLabel::NotDetected,
            confidence: 0.0,
            emotions: EmotionDistribution::zero(),
        }
    }
}

/// Scores facial features into an emotion distribution
pub struct ExpressionClassifier;

impl ExpressionClassifier {
    /// Classify a face, `None` meaning no face in the frame
    pub fn classify(face: Option<&LandmarkSet>) -> ExpressionResult {
        match face.and_then(FaceFeatures::extract) {
            Some(features) => Self::classify_features(&features),
            None => ExpressionResult::not_detected(),
        }
    }

    /// Classify already-extracted features
    pub fn classify_features(features: &FaceFeatures) -> ExpressionResult {
        let emotions = EmotionDistribution::normalize(Self::scores(features));
        let (emotion, confidence) = emotions.dominant();

        ExpressionResult {
            label: ExpressionLabel::Detected(emotion),
            confidence,
            emotions,
        }
    }

    /// Per-emotion scores clamped to [0, 1], in canonical order
    pub fn scores(f: &FaceFeatures) -> [f32; Emotion::COUNT] {
        // Raised, curved mouth and lifted brows; squinting counts against
        let happy = f.mouth_curvature * 20.0 + f.mouth_opening * 10.0 + f.eyebrow_height * 5.0
            - f.eye_opening * 3.0;

        let sad = -f.mouth_curvature * 15.0 - f.eyebrow_height * 8.0 + f.eye_opening * 2.0;

        // Narrowed eyes, lowered brows, pressed lips, slanted brow
        let angry = -f.eye_opening * 8.0 - f.eyebrow_height * 6.0 - f.mouth_opening * 5.0
            + f.brow_slant * 10.0;

        let surprised = f.eye_opening * 8.0 + f.eyebrow_height * 10.0 + f.mouth_opening * 6.0;

        let fearful = f.eye_opening * 6.0
            + f.eyebrow_height * 8.0
            + f.mouth_opening * 3.0
            + f.nose_width * 5.0;

        // Flared nose, narrowed eyes, turned-down mouth, raised upper lip
        let disgusted = f.nose_width * 8.0 - f.eye_opening * 4.0 - f.mouth_curvature * 10.0
            + f.nose_lip_gap * 5.0;

        // Everything close to rest; 0.02 is a relaxed eye opening
        let neutral = 1.0
            - (f.mouth_curvature * 10.0).abs()
            - (f.eyebrow_height * 5.0).abs()
            - (f.eye_opening - 0.02).abs() * 20.0;

        [happy, sad, angry, surprised, fearful, disgusted, neutral].map(clamp_unit)
    }
}

/// Clamp into [0, 1]; NaN collapses to 0
#[inline]
fn clamp_unit(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
