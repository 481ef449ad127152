//! Regression test parameters and operations

use violajones_core::Pix;

/// How comparisons are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Record failures (default)
    #[default]
    Compare,
    /// Print every comparison, never fail
    Display,
}

impl RegTestMode {
    /// Mode named by `REGTEST_MODE`, `Compare` if unset
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// State of one regression test run.
///
/// Every `compare_*` call advances [`index`](Self::index) by one so a
/// failure message names the check that failed.
pub struct RegParams {
    /// Test name without the `_reg` suffix
    pub test_name: String,
    index: usize,
    pub mode: RegTestMode,
    failures: Vec<String>,
}

impl RegParams {
    /// Start a test, reading the mode from `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        eprintln!("\n==== {}_reg ({:?}) ====", test_name, mode);
        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            failures: Vec::new(),
        }
    }

    /// Number of checks made so far.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    /// Record a failed check. Display mode only reports it.
    fn fail(&mut self, what: std::fmt::Arguments<'_>) -> bool {
        let msg = format!("{}_reg[{}]: {}", self.test_name, self.index, what);
        eprintln!("{}", msg);
        if self.display() {
            return true;
        }
        self.failures.push(msg);
        false
    }

    /// Check `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff > delta {
            return self.fail(format_args!(
                "expected {}, got {} (diff {} > {})",
                expected, actual, diff, delta
            ));
        }
        if self.display() {
            eprintln!("{}_reg[{}]: {}", self.test_name, self.index, actual);
        }
        true
    }

    /// Check that two images have the same size, depth and pixels.
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.index += 1;
        if !pix1.sizes_equal(pix2) {
            return self.fail(format_args!(
                "images differ in size or depth: {:?} {} bpp vs {:?} {} bpp",
                pix1.dimensions(),
                pix1.depth().bits(),
                pix2.dimensions(),
                pix2.depth().bits()
            ));
        }
        let (width, height) = pix1.dimensions();
        let mismatch = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .find(|&(x, y)| pix1.get_pixel(x, y) != pix2.get_pixel(x, y));
        match mismatch {
            Some((x, y)) => self.fail(format_args!("first pixel mismatch at ({}, {})", x, y)),
            None => true,
        }
    }

    /// Check that two byte strings are identical.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;
        if data1 == data2 {
            return true;
        }
        let first = data1.iter().zip(data2).position(|(a, b)| a != b);
        self.fail(format_args!(
            "byte strings differ (lengths {} and {}, first difference at {:?})",
            data1.len(),
            data2.len(),
            first
        ))
    }

    /// Print the summary; `true` if no check failed.
    pub fn cleanup(self) -> bool {
        if self.failures.is_empty() {
            eprintln!("SUCCESS: {}_reg ({} checks)", self.test_name, self.index);
        } else {
            eprintln!(
                "FAILURE: {}_reg ({} of {} checks)",
                self.test_name,
                self.failures.len(),
                self.index
            );
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        self.failures.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
