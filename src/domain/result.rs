//! Result type alias for booker-export

use super::errors::BookerError;

/// Result type alias for booker-export operations
///
/// # Examples
///
/// ```
/// use booker_export::domain::result::Result;
/// use booker_export::domain::errors::BookerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BookerError::Request("No task specified".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BookerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{BookerError, RelocateError};

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(BookerError::Request("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> std::result::Result<i32, RelocateError> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
