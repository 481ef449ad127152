//! Weak classifier regression test
//!
//! Trains stumps on separable image windows in both directions, compares
//! the sweep against a brute-force threshold search on random values, and
//! checks that cached samples and live windows agree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use violajones_core::{Box, Error, IntegralImage, Sample};
use violajones_haar::{
    FeatureGenerator, FeatureKind, HaarError, HaarResult, Parity, WeakClassifier, fit_stump,
};
use violajones_test::RegParams;
use violajones_test::fixtures::{index_pix, split_pix};

fn window_sample(left: u8, right: u8) -> Sample {
    let pix = split_pix(4, 4, 2, left, right).expect("split fixture");
    let ii = IntegralImage::new(&pix).expect("integral");
    ii.vectorize_window(&Box::new_unchecked(0, 0, 4, 4))
        .expect("sample")
}

/// Left two columns positive, right two negative, full height.
fn halves_classifier() -> WeakClassifier {
    let generator = FeatureGenerator::new(4, 4, FeatureKind::TwoHorizontal).unwrap();
    let feature = generator
        .iter()
        .find(|f| {
            f.positive().get(0) == Some(&Box::new_unchecked(0, 0, 2, 4))
                && f.negative().get(0) == Some(&Box::new_unchecked(2, 0, 2, 4))
        })
        .expect("halves feature");
    WeakClassifier::new(feature)
}

fn rect_out_of_bounds<T>(result: HaarResult<T>) -> f64 {
    if matches!(result, Err(HaarError::Core(Error::RectOutOfBounds { .. }))) {
        1.0
    } else {
        0.0
    }
}

/// Misclassified values under a fitted stump.
fn recount(pos: &[i64], neg: &[i64], parity: Parity, threshold: f64) -> usize {
    pos.iter()
        .filter(|&&v| !parity.accepts(v as f64, threshold))
        .count()
        + neg
            .iter()
            .filter(|&&v| parity.accepts(v as f64, threshold))
            .count()
}

/// Fewest errors over every sample value used as a threshold.
fn brute_force_errors(pos: &[i64], neg: &[i64]) -> usize {
    let mut best = pos.len() + neg.len();
    for &t in pos.iter().chain(neg.iter()) {
        for parity in [Parity::LessThan, Parity::GreaterThan] {
            let t = t as f64;
            let errors = pos.iter().filter(|&&v| !parity.accepts(v as f64, t)).count()
                + neg.iter().filter(|&&v| parity.accepts(v as f64, t)).count();
            best = best.min(errors);
        }
    }
    best
}

#[test]
fn classifier_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("classifier");

    // --- Test 1: bright-left positives, bright-right negatives ---
    let positives: Vec<Sample> = [(200, 10), (180, 30), (150, 20)]
        .iter()
        .map(|&(l, r)| window_sample(l, r))
        .collect();
    let negatives: Vec<Sample> = [(10, 200), (40, 90), (60, 60)]
        .iter()
        .map(|&(l, r)| window_sample(l, r))
        .collect();
    let mut c = halves_classifier();
    let fit = c.train(&positives, &negatives).unwrap();
    rp.compare_values(0.0, fit.errors as f64, 0.0);
    rp.compare_values(1.0, if c.parity() == Parity::GreaterThan { 1.0 } else { 0.0 }, 0.0);
    let all_right = positives.iter().all(|s| c.predict_sample(s).unwrap())
        && negatives.iter().all(|s| !c.predict_sample(s).unwrap());
    rp.compare_values(1.0, if all_right { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: swapped classes flip the parity ---
    let mut swapped = halves_classifier();
    let fit = swapped.train(&negatives, &positives).unwrap();
    rp.compare_values(0.0, fit.errors as f64, 0.0);
    rp.compare_values(1.0, if swapped.parity() == Parity::LessThan { 1.0 } else { 0.0 }, 0.0);
    let all_right = negatives.iter().all(|s| swapped.predict_sample(s).unwrap())
        && positives.iter().all(|s| !swapped.predict_sample(s).unwrap());
    rp.compare_values(1.0, if all_right { 1.0 } else { 0.0 }, 0.0);

    // --- Test 3: sweep is never worse than brute force ---
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..200 {
        let npos = rng.random_range(0..12);
        let nneg = rng.random_range(0..12);
        let pos: Vec<i64> = (0..npos).map(|_| rng.random_range(-20..20)).collect();
        let neg: Vec<i64> = (0..nneg).map(|_| rng.random_range(-20..20)).collect();
        let fit = fit_stump(&pos, &neg);

        let actual = recount(&pos, &neg, fit.parity, fit.threshold);
        rp.compare_values(fit.errors as f64, actual as f64, 0.0);
        if fit.errors > brute_force_errors(&pos, &neg) {
            rp.compare_values(0.0, 1.0, 0.0);
        }
    }

    // --- Test 4: one empty class is not an error ---
    let mut c = halves_classifier();
    let fit = c.train(&positives, &[]).unwrap();
    rp.compare_values(0.0, fit.errors as f64, 0.0);
    let all_positive = positives.iter().all(|s| c.predict_sample(s).unwrap());
    rp.compare_values(1.0, if all_positive { 1.0 } else { 0.0 }, 0.0);
    let fit = c.train(&[], &negatives).unwrap();
    rp.compare_values(0.0, fit.errors as f64, 0.0);
    let all_negative = negatives.iter().all(|s| !c.predict_sample(s).unwrap());
    rp.compare_values(1.0, if all_negative { 1.0 } else { 0.0 }, 0.0);

    // --- Test 5: cached samples agree with live windows ---
    let ii = IntegralImage::new(&index_pix(9, 7).unwrap()).unwrap();
    let generator = FeatureGenerator::new(4, 3, FeatureKind::Checkerboard).unwrap();
    for feature in generator.iter().step_by(5) {
        for origin in [(0u32, 0u32), (2, 1), (5, 4)] {
            let rect = Box::new_unchecked(origin.0 as i32, origin.1 as i32, 4, 3);
            let sample = ii.vectorize_window(&rect).unwrap();
            let live = feature.evaluate(&ii, origin).unwrap();
            let cached = feature.evaluate_sample(&sample).unwrap();
            rp.compare_values(live as f64, cached as f64, 0.0);
        }
    }

    // --- Test 6: prediction outside the image is an error ---
    let c = halves_classifier();
    for origin in [
        (6, 0),
        (0, 4),
        (i32::MAX as u32 - 1, 0),
        (i32::MAX as u32, 0),
        (0, i32::MAX as u32 + 1),
        (u32::MAX, u32::MAX),
    ] {
        rp.compare_values(1.0, rect_out_of_bounds(c.feature().evaluate(&ii, origin)), 0.0);
        rp.compare_values(1.0, rect_out_of_bounds(c.predict(&ii, origin)), 0.0);
    }

    // --- Test 7: values too large for exact f64 midpoints ---
    let base = 1i64 << 60;
    // base and base + 1 share one f64; base + 4096 does not
    let (pos, neg) = ([base, base + 1], [base + 4096, base + 8192]);
    let fit = fit_stump(&pos, &neg);
    rp.compare_values(0.0, fit.errors as f64, 0.0);
    rp.compare_values(0.0, recount(&pos, &neg, fit.parity, fit.threshold) as f64, 0.0);
    // Values no f64 threshold can tell apart
    let (pos, neg) = ([base], [base + 1]);
    let fit = fit_stump(&pos, &neg);
    rp.compare_values(1.0, fit.errors as f64, 0.0);
    rp.compare_values(1.0, recount(&pos, &neg, fit.parity, fit.threshold) as f64, 0.0);
    let (pos, neg) = ([i64::MAX], [i64::MIN]);
    let fit = fit_stump(&pos, &neg);
    rp.compare_values(0.0, recount(&pos, &neg, fit.parity, fit.threshold) as f64, 0.0);

    assert!(rp.cleanup());
}
