//! Constants for recursion thresholds and process exit codes.

/// Default output area (`rows * cols`) at or below which multiplication is
/// delegated to the classical algorithm.
pub const DEFAULT_BASE_CASE_AREA: usize = 32 * 32;

/// Default dimension floor: if any of the three dimensions is at or below
/// this value the classical algorithm is used.
pub const DEFAULT_BASE_CASE_FLOOR: usize = 4;

/// Default quadrant area (`n2 * m2`) from which the independent-products
/// schedule runs its seven products on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64 * 64;

/// Default bit bound for randomly generated entries.
pub const DEFAULT_ENTRY_BITS: u64 = 64;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// A temporary matrix could not be allocated.
    pub const ERROR_ALLOCATION: i32 = 2;
    /// Results of different multipliers did not match during verification.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration or non-conformant operands.
    pub const ERROR_CONFIG: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_case_defaults() {
        assert_eq!(DEFAULT_BASE_CASE_AREA, 1024);
        assert_eq!(DEFAULT_BASE_CASE_FLOOR, 4);
    }

    #[test]
    fn exit_codes_distinct() {
        let codes = [
            exit_codes::SUCCESS,
            exit_codes::ERROR_GENERIC,
            exit_codes::ERROR_ALLOCATION,
            exit_codes::ERROR_MISMATCH,
            exit_codes::ERROR_CONFIG,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
