//! Error handling and exit codes.

use zmat_core::constants::exit_codes;
use zmat_core::MatError;

/// Process exit code for a multiplication error.
#[must_use]
pub fn exit_code(err: &MatError) -> i32 {
    match err {
        MatError::Allocation { .. } => exit_codes::ERROR_ALLOCATION,
        MatError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
        MatError::DimensionMismatch { .. }
        | MatError::OutputShape { .. }
        | MatError::InvalidData(_) => exit_codes::ERROR_CONFIG,
    }
}

/// Exit code for a top-level error, looking through to a [`MatError`] cause.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MatError>())
        .map_or(exit_codes::ERROR_GENERIC, exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes() {
        assert_eq!(exit_code(&MatError::Allocation { rows: 1, cols: 1 }), 2);
        assert_eq!(
            exit_code(&MatError::Mismatch {
                left: "winograd".into(),
                right: "classical".into()
            }),
            3
        );
        assert_eq!(exit_code(&MatError::InvalidData("ragged".into())), 4);
        assert_eq!(
            exit_code(&MatError::DimensionMismatch {
                a_rows: 1,
                a_cols: 2,
                b_rows: 3,
                b_cols: 4
            }),
            4
        );
    }

    #[test]
    fn anyhow_downcast() {
        let err = anyhow::Error::new(MatError::Allocation { rows: 2, cols: 2 }).context("running winograd");
        assert_eq!(exit_code_for(&err), 2);
        assert_eq!(exit_code_for(&anyhow::anyhow!("disk full")), 1);
    }
}
