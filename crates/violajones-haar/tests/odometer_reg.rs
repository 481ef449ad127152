//! Bounded odometer regression test

use std::collections::HashSet;
use violajones_haar::{Odometer, next_limits};
use violajones_test::RegParams;

#[test]
fn odometer_reg() {
    let mut rp = RegParams::new("odometer");

    // --- Test 1: one digit counts modulo bound + 1 ---
    let mut digits = [0usize];
    for i in 1..=303usize {
        next_limits(&mut digits, 100);
        rp.compare_values((i % 101) as f64, digits[0] as f64, 0.0);
    }

    // --- Test 2: full cycle length is (bound + 1)^k ---
    for (len, bound) in [(1, 4), (2, 3), (3, 5), (4, 1)] {
        let odo = Odometer::new(len, bound);
        let states: Vec<Vec<usize>> = odo.cycle().collect();
        let expected = (bound + 1).pow(len as u32);
        rp.compare_values(expected as f64, states.len() as f64, 0.0);
        let distinct: HashSet<&Vec<usize>> = states.iter().collect();
        rp.compare_values(expected as f64, distinct.len() as f64, 0.0);
    }

    // --- Test 3: carries propagate right to left ---
    let mut digits = [1usize, 2, 3];
    let mut seen = HashSet::new();
    for _ in 0..40 {
        next_limits(&mut digits, 5);
        seen.insert(digits);
    }
    // 40 steps from {1,2,3} land on {2,3,1} and never repeat
    rp.compare_values(1.0, if digits == [2, 3, 1] { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(40.0, seen.len() as f64, 0.0);

    // --- Test 4: wraparound from the last tuple ---
    let mut odo = Odometer::with_digits(vec![5, 5, 5], 5).unwrap();
    rp.compare_values(0.0, if odo.advance() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if odo.digits() == [0, 0, 0] { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup());
}
