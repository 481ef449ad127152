//! Weak classifiers
//!
//! A [`WeakClassifier`] is a single [`HaarFeature`] with a decision stump
//! on its value: a threshold and the direction ([`Parity`]) in which
//! values count as positive.
//!
//! Training sorts the feature values of both classes and sweeps every
//! distinct split point, keeping the first split with the fewest
//! misclassified samples.

use crate::error::HaarResult;
use crate::feature::HaarFeature;
use log::{debug, warn};
use violajones_core::{IntegralImage, Sample};

/// Which side of the threshold is classified positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Parity {
    /// `value < threshold` is positive
    #[default]
    LessThan,
    /// `value > threshold` is positive
    GreaterThan,
}

impl Parity {
    /// Boolean form of the direction, `true` for [`Parity::LessThan`].
    pub fn as_bool(self) -> bool {
        matches!(self, Parity::LessThan)
    }

    /// Apply the comparison.
    #[inline]
    pub fn accepts(self, value: f64, threshold: f64) -> bool {
        match self {
            Parity::LessThan => value < threshold,
            Parity::GreaterThan => value > threshold,
        }
    }
}

/// Outcome of fitting a decision stump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StumpFit {
    /// Selected threshold
    pub threshold: f64,
    /// Selected direction
    pub parity: Parity,
    /// Misclassified training samples
    pub errors: usize,
    /// Training samples seen
    pub total: usize,
}

impl StumpFit {
    /// Fraction of misclassified samples, 0 when there were none.
    pub fn error_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.errors as f64 / self.total as f64
        }
    }
}

/// Fit the threshold and parity that best separate two value sets.
///
/// Candidate thresholds are one below the minimum, the midpoint between
/// every pair of consecutive distinct values, and one above the maximum.
/// At each candidate `LessThan` is scored before `GreaterThan`; only a
/// strictly smaller error replaces the current best, so ties go to the
/// lowest threshold.
///
/// When one class is empty the fit labels every value as the other class
/// with zero error.
///
/// Values are compared as `f64`, which is exact below 2^53 in magnitude
/// (any 8 or 16 bpp window). Beyond that, neighbouring values that round
/// to the same `f64`, or have no `f64` strictly between them, offer no
/// split; the reported error count always matches [`Parity::accepts`].
pub fn fit_stump(positives: &[i64], negatives: &[i64]) -> StumpFit {
    let total = positives.len() + negatives.len();
    if total == 0 {
        warn!("fitting a stump without samples");
        return StumpFit {
            threshold: 0.0,
            parity: Parity::LessThan,
            errors: 0,
            total: 0,
        };
    }

    let mut labeled: Vec<(i64, bool)> = positives
        .iter()
        .map(|&v| (v, true))
        .chain(negatives.iter().map(|&v| (v, false)))
        .collect();
    labeled.sort_by_key(|&(v, _)| v);

    let pos_total = positives.len();
    let neg_total = negatives.len();

    // Errors when everything below the split is on one side
    let score = |pos_below: usize, neg_below: usize| {
        let less = (pos_total - pos_below) + neg_below;
        let greater = pos_below + (neg_total - neg_below);
        (less, greater)
    };

    let first = labeled[0].0 as f64;
    let first = first - outer_margin(first);
    let (less, greater) = score(0, 0);
    let mut best = if greater < less {
        (first, Parity::GreaterThan, greater)
    } else {
        (first, Parity::LessThan, less)
    };

    let mut pos_below = 0;
    let mut neg_below = 0;
    let mut i = 0;
    while i < labeled.len() {
        // Consume one run of equal values
        let value = labeled[i].0;
        while i < labeled.len() && labeled[i].0 == value {
            if labeled[i].1 {
                pos_below += 1;
            } else {
                neg_below += 1;
            }
            i += 1;
        }
        let value = value as f64;
        let threshold = match labeled.get(i) {
            Some(&(next, _)) => {
                let next = next as f64;
                let mid = (value + next) / 2.0;
                if !(value < mid && mid < next) {
                    continue;
                }
                mid
            }
            None => value + outer_margin(value),
        };
        let (less, greater) = score(pos_below, neg_below);
        if less < best.2 {
            best = (threshold, Parity::LessThan, less);
        }
        if greater < best.2 {
            best = (threshold, Parity::GreaterThan, greater);
        }
    }

    StumpFit {
        threshold: best.0,
        parity: best.1,
        errors: best.2,
        total,
    }
}

/// Distance from an extreme value to the threshold beyond it: 1, or one
/// unit in the last place once that is larger.
fn outer_margin(value: f64) -> f64 {
    (value.abs() * f64::EPSILON).max(1.0)
}

/// A Haar feature with a decision stump on its value.
#[derive(Debug, Clone, PartialEq)]
pub struct WeakClassifier {
    feature: HaarFeature,
    threshold: f64,
    parity: Parity,
    trained: bool,
}

impl WeakClassifier {
    /// An untrained classifier: threshold 0, [`Parity::LessThan`].
    pub fn new(feature: HaarFeature) -> Self {
        WeakClassifier {
            feature,
            threshold: 0.0,
            parity: Parity::LessThan,
            trained: false,
        }
    }

    /// The feature whose value is thresholded.
    pub fn feature(&self) -> &HaarFeature {
        &self.feature
    }

    /// Decision threshold, 0 until trained.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Which side of the threshold is positive.
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// True once [`train`](Self::train) has succeeded.
    pub fn is_trained(&self) -> bool {
        self.trained
    }

    /// Fit threshold and parity to labeled samples.
    ///
    /// The feature is evaluated on every sample and the values handed to
    /// [`fit_stump`]. Either set may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::WindowMismatch`](crate::HaarError::WindowMismatch)
    /// if a sample is not the size of the feature window. The classifier is
    /// left unchanged in that case.
    pub fn train(&mut self, positives: &[Sample], negatives: &[Sample]) -> HaarResult<StumpFit> {
        let pos_values = self.evaluate_all(positives)?;
        let neg_values = self.evaluate_all(negatives)?;
        let fit = fit_stump(&pos_values, &neg_values);

        self.threshold = fit.threshold;
        self.parity = fit.parity;
        self.trained = true;
        debug!(
            "trained on {}+{} samples: threshold {} {:?}, {} errors",
            pos_values.len(),
            neg_values.len(),
            fit.threshold,
            fit.parity,
            fit.errors
        );
        Ok(fit)
    }

    fn evaluate_all(&self, samples: &[Sample]) -> HaarResult<Vec<i64>> {
        samples
            .iter()
            .map(|s| self.feature.evaluate_sample(s))
            .collect()
    }

    /// Classify a feature value.
    #[inline]
    pub fn classify_value(&self, value: i64) -> bool {
        self.parity.accepts(value as f64, self.threshold)
    }

    /// Classify the window of `ii` at `origin`.
    pub fn predict(&self, ii: &IntegralImage, origin: (u32, u32)) -> HaarResult<bool> {
        Ok(self.classify_value(self.feature.evaluate(ii, origin)?))
    }

    /// Classify a cached sample.
    pub fn predict_sample(&self, sample: &Sample) -> HaarResult<bool> {
        Ok(self.classify_value(self.feature.evaluate_sample(sample)?))
    }
}
