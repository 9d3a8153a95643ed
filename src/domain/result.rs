//! Result type alias for Signalveil

use super::errors::SignalveilError;

/// Result type alias used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, SignalveilError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::SignalveilError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(SignalveilError::Validation("invalid".to_string()));
        assert!(result.is_err());
    }
}
