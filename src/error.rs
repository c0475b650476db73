//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the scangate application.
///
/// - 0: Success (one-shot check completed, code is valid)
/// - 1: General error (unexpected failure, including lookup failures)
/// - 2: Invalid code (check completed normally, code not in the allow-list)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the operation completed and the code is valid.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Invalid: the lookup completed but the code is not in the allow-list.
    Invalid = 2,
    /// Interrupted: the run was interrupted by the user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "SG000",
            Self::GeneralError => "SG001",
            Self::Invalid => "SG002",
            Self::Interrupted => "SG130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "SG001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::GeneralError.as_i32(), 1);
        assert_eq!(ExitCode::Invalid.as_i32(), 2);
        assert_eq!(ExitCode::Interrupted.as_i32(), 130);
    }

    #[test]
    fn test_code_prefixes() {
        assert_eq!(ExitCode::Success.code_prefix(), "SG000");
        assert_eq!(ExitCode::Invalid.code_prefix(), "SG002");
    }

    #[test]
    fn test_structured_error_from_anyhow() {
        let err = anyhow::anyhow!("store unreachable");
        let structured = StructuredError::new(&err, ExitCode::GeneralError);

        assert_eq!(structured.code, "SG001");
        assert_eq!(structured.exit_code, 1);
        assert_eq!(structured.message, "store unreachable");
        assert!(!structured.interrupted);
    }

    #[test]
    fn test_structured_error_interrupted_flag() {
        let err = anyhow::anyhow!("interrupted");
        let structured = StructuredError::new(&err, ExitCode::Interrupted);
        assert!(structured.interrupted);
    }
}
