//! Regression test parameters and operations

use pixmill_core::ImageView;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Record failures quietly (default)
    #[default]
    Compare,
    /// Also print every comparison as it runs
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// This structure tracks the state of a regression test, including
/// the test name, current index, mode, and success status.
pub struct RegParams {
    /// Name of the test (e.g., "resize")
    pub test_name: String,
    /// Current test index (incremented before each test)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current test index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) -> bool {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
        false
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `actual` is within `delta` of `expected`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if self.display() {
            eprintln!(
                "  [{:02}] expected = {}, actual = {}",
                self.index, expected, actual
            );
        }

        if diff > delta || diff.is_nan() {
            let msg = format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Compare two images for identical format, size and pixels
    pub fn compare_images(&mut self, expected: ImageView<'_>, actual: ImageView<'_>) -> bool {
        self.index += 1;

        if expected.format() != actual.format()
            || expected.width() != actual.width()
            || expected.height() != actual.height()
        {
            let msg = format!(
                "Failure in {}_reg: image comparison for index {} - \
                 {}x{} {} vs {}x{} {}",
                self.test_name,
                self.index,
                expected.width(),
                expected.height(),
                expected.format(),
                actual.width(),
                actual.height(),
                actual.format()
            );
            return self.fail(msg);
        }

        for y in 0..expected.height() {
            if expected.row(y) != actual.row(y) {
                let msg = format!(
                    "Failure in {}_reg: image comparison for index {} - row {} differs",
                    self.test_name, self.index, y
                );
                return self.fail(msg);
            }
        }

        true
    }

    /// Compare two images by mean absolute sample difference
    ///
    /// Returns `true` if the images have the same geometry and their
    /// average channel difference is at most `max_diff`.
    pub fn compare_images_within(
        &mut self,
        expected: ImageView<'_>,
        actual: ImageView<'_>,
        max_diff: f64,
    ) -> bool {
        self.index += 1;
        match expected.avg_channel_diff(&actual) {
            Some(diff) if diff <= max_diff => {
                if self.display() {
                    eprintln!("  [{:02}] avg channel diff = {}", self.index, diff);
                }
                true
            }
            Some(diff) => {
                let msg = format!(
                    "Failure in {}_reg: image comparison for index {}\n\
                     avg channel diff = {} but allowed = {}",
                    self.test_name, self.index, diff, max_diff
                );
                self.fail(msg)
            }
            None => {
                let msg = format!(
                    "Failure in {}_reg: image comparison for index {} - geometry mismatch",
                    self.test_name, self.index
                );
                self.fail(msg)
            }
        }
    }

    /// Compare two byte arrays
    pub fn compare_bytes(&mut self, expected: &[u8], actual: &[u8]) -> bool {
        self.index += 1;

        if expected != actual {
            let msg = format!(
                "Failure in {}_reg: byte comparison for index {}\n\
                 expected = {:?}\n\
                 actual   = {:?}",
                self.test_name, self.index, expected, actual
            );
            self.fail(msg)
        } else {
            true
        }
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all tests passed, `false` if any failed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all tests have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
