//! Determinism verification.
//!
//! Runs a generation function several times and compares the outputs byte
//! for byte, reporting the first difference.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the reference output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the reference output.
    pub hash: String,
    /// The first difference, if any run diverged.
    pub diff_info: Option<DiffInfo>,
}

/// The first byte difference found between runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Byte from the first run, if it is that long.
    pub expected: Option<u8>,
    /// Byte from the differing run, if it is that long.
    pub actual: Option<u8>,
    /// Which run (0-indexed) diverged.
    pub run_index: usize,
    /// Up to 24 bytes of the reference output around the difference.
    pub context: String,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<u8>| match b {
            Some(b) => format!("0x{:02X}", b),
            None => "end of output".to_string(),
        };
        write!(
            f,
            "Difference at byte {}: expected {}, got {} (run {})\n  Context: {}",
            self.offset,
            show(self.expected),
            show(self.actual),
            self.run_index,
            self.context
        )
    }
}

impl DeterminismResult {
    /// Panics with a detailed message if the runs diverged.
    pub fn assert_deterministic(&self) {
        if let Some(ref diff) = self.diff_info {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Computes the BLAKE3 hash of some bytes as hex.
pub fn compute_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Runs `generate_fn` `runs` times and verifies all outputs are identical.
///
/// # Example
///
/// ```
/// use deepnote_tests::determinism::verify_determinism;
///
/// let result = verify_determinism(|| b"same every time".to_vec(), 3);
/// assert!(result.is_deterministic);
/// ```
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference = reference.as_ref();
    let hash = compute_hash(reference);

    for run_index in 1..runs {
        let output = generate_fn();
        if let Some(diff) = find_first_difference(reference, output.as_ref(), run_index) {
            return DeterminismResult {
                is_deterministic: false,
                runs,
                output_size: reference.len(),
                hash,
                diff_info: Some(diff),
            };
        }
    }

    DeterminismResult {
        is_deterministic: true,
        runs,
        output_size: reference.len(),
        hash,
        diff_info: None,
    }
}

/// Finds the first differing byte, treating a length mismatch as a
/// difference at the end of the shorter output.
pub fn find_first_difference(expected: &[u8], actual: &[u8], run_index: usize) -> Option<DiffInfo> {
    let offset = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    let start = offset.saturating_sub(12);
    let end = (offset + 12).min(expected.len());
    Some(DiffInfo {
        offset,
        expected: expected.get(offset).copied(),
        actual: actual.get(offset).copied(),
        run_index,
        context: String::from_utf8_lossy(&expected[start.min(end)..end]).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_identical_runs() {
        let result = verify_determinism(|| vec![1u8, 2, 3], 4);
        assert!(result.is_deterministic);
        assert_eq!(result.runs, 4);
        assert_eq!(result.output_size, 3);
        assert_eq!(result.hash, compute_hash(&[1, 2, 3]));
        result.assert_deterministic();
    }

    #[test]
    fn test_diverging_run_is_reported() {
        let counter = Cell::new(0u8);
        let result = verify_determinism(
            || {
                counter.set(counter.get() + 1);
                format!("graph-{}", counter.get())
            },
            3,
        );
        assert!(!result.is_deterministic);
        let diff = result.diff_info.unwrap();
        assert_eq!(diff.offset, 6);
        assert_eq!(diff.expected, Some(b'1'));
        assert_eq!(diff.actual, Some(b'2'));
        assert_eq!(diff.run_index, 1);
    }

    #[test]
    fn test_length_mismatch() {
        let diff = find_first_difference(b"abc", b"abcd", 2).unwrap();
        assert_eq!(diff.offset, 3);
        assert_eq!(diff.expected, None);
        assert_eq!(diff.actual, Some(b'd'));
        assert!(find_first_difference(b"abc", b"abc", 1).is_none());
    }
}
