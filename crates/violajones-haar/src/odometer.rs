//! Bounded odometer
//!
//! A counter over tuples of naturals in which every digit runs from 0 to
//! a shared bound. Incrementing past the bound resets the digit and
//! carries into the digit on its left, like the wheels of a car odometer.

use crate::error::{HaarError, HaarResult};

/// Advance `digits` to the next tuple.
///
/// The last digit is incremented; a digit that exceeds `bound` resets to
/// 0 and carries leftward. When the leftmost digit overflows, every digit
/// is 0 again. Repeated calls visit all `(bound + 1)^k` tuples and then
/// return to the start.
///
/// An empty tuple is left unchanged.
pub fn next_limits(digits: &mut [usize], bound: usize) {
    for digit in digits.iter_mut().rev() {
        if *digit < bound {
            *digit += 1;
            return;
        }
        *digit = 0;
    }
}

/// An owned odometer: the digits plus their bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Odometer {
    digits: Vec<usize>,
    bound: usize,
}

impl Odometer {
    /// An odometer of `len` digits, all zero.
    pub fn new(len: usize, bound: usize) -> Self {
        Odometer {
            digits: vec![0; len],
            bound,
        }
    }

    /// An odometer starting from the given digits.
    ///
    /// # Errors
    ///
    /// Returns [`HaarError::InvalidParameter`] if any digit exceeds `bound`.
    pub fn with_digits(digits: Vec<usize>, bound: usize) -> HaarResult<Self> {
        if let Some(&d) = digits.iter().find(|&&d| d > bound) {
            return Err(HaarError::InvalidParameter(format!(
                "odometer digit {} exceeds bound {}",
                d, bound
            )));
        }
        Ok(Odometer { digits, bound })
    }

    /// Current digits, most significant first.
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Largest value any digit takes.
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Step to the next tuple.
    ///
    /// Returns `false` when the step wrapped around to all zeros.
    pub fn advance(&mut self) -> bool {
        next_limits(&mut self.digits, self.bound);
        self.digits.iter().any(|&d| d != 0)
    }

    /// Skip to the first tuple that differs from the current one left of
    /// `index`.
    ///
    /// Digits from `index` on are treated as exhausted, so the step carries
    /// into digit `index - 1`. Returns `false` when that wraps around, which
    /// is always the case for `index == 0`.
    pub fn carry_from(&mut self, index: usize) -> bool {
        let start = index.min(self.digits.len());
        self.digits[start..].fill(self.bound);
        self.advance()
    }

    /// Number of distinct tuples, `(bound + 1)^len`, or `None` on overflow.
    pub fn cycle_len(&self) -> Option<usize> {
        let len = u32::try_from(self.digits.len()).ok()?;
        (self.bound.checked_add(1)?).checked_pow(len)
    }

    /// Set every digit back to zero.
    pub fn reset(&mut self) {
        self.digits.fill(0);
    }

    /// Iterate over one full cycle, starting with the current tuple.
    pub fn cycle(&self) -> Cycle {
        Cycle {
            start: self.digits.clone(),
            current: self.clone(),
            done: false,
        }
    }
}

/// One full turn of an [`Odometer`], see [`Odometer::cycle`].
#[derive(Debug, Clone)]
pub struct Cycle {
    start: Vec<usize>,
    current: Odometer,
    done: bool,
}

impl Iterator for Cycle {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let item = self.current.digits.clone();
        self.current.advance();
        self.done = self.current.digits == self.start;
        Some(item)
    }
}
