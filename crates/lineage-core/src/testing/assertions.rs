//! Test assertion macros and helpers.
//!
//! Provides ergonomic assertion macros for common revision map testing patterns.

use crate::error::LineageError;
use crate::revision::Revision;

/// Assert that a result is Ok.
///
/// # Example
///
/// ```ignore
/// let result = map.get_revision("head");
/// assert_ok!(result);
/// assert_ok!(result, "single head should resolve");
/// ```
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match &$expr {
            Ok(_) => (),
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match &$expr {
            Ok(_) => (),
            Err(e) => panic!("assertion failed: {}: expected Ok, got Err({:?})", format_args!($($arg)+), e),
        }
    };
}

/// Assert that an error matches a specific variant.
///
/// # Example
///
/// ```ignore
/// let result = map.get_revision("head");
/// assert_err_variant!(result, LineageError::MultipleRevisions(_));
/// ```
#[macro_export]
macro_rules! assert_err_variant {
    ($expr:expr, $variant:pat) => {
        match &$expr {
            Err($variant) => (),
            Err(e) => panic!(
                "assertion failed: expected {}, got {:?}",
                stringify!($variant),
                e
            ),
            Ok(v) => panic!(
                "assertion failed: expected Err({}), got Ok({:?})",
                stringify!($variant),
                v
            ),
        }
    };
}

/// Assert the exact order a traversal produces.
///
/// # Example
///
/// ```ignore
/// assert_iteration!(map, "d", "a", ["d", "c", "b1", "b2", "a"]);
/// assert_iteration!(map, "head", "base", ["b", "a"], inclusive = false);
/// ```
#[macro_export]
macro_rules! assert_iteration {
    ($map:expr, $upper:expr, $lower:expr, $expected:expr) => {
        $crate::assert_iteration!($map, $upper, $lower, $expected, inclusive = true)
    };
    ($map:expr, $upper:expr, $lower:expr, $expected:expr, inclusive = $inclusive:expr) => {
        match $map.iterate_revisions($upper, $lower, $inclusive) {
            Ok(iter) => {
                let actual = $crate::testing::revision_ids(iter);
                let expected: Vec<String> = $expected.iter().map(|id| id.to_string()).collect();
                assert_eq!(actual, expected, "unexpected traversal order");
            }
            Err(e) => panic!("assertion failed: expected traversal, got Err({})", e),
        }
    };
}

/// Collect the ids of a sequence of revisions.
pub fn revision_ids<'a>(revisions: impl IntoIterator<Item = &'a Revision>) -> Vec<String> {
    revisions.into_iter().map(|rev| rev.id.clone()).collect()
}

/// Check if an error message contains a substring.
pub fn error_contains(error: &LineageError, substring: &str) -> bool {
    error.to_string().contains(substring)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_ok_macro() {
        let result: Result<i32, String> = Ok(42);
        assert_ok!(result);
    }

    #[test]
    #[should_panic(expected = "expected Ok")]
    fn test_assert_ok_macro_fails() {
        let result: Result<i32, String> = Err("error".to_string());
        assert_ok!(result);
    }

    #[test]
    fn test_assert_err_variant_macro() {
        let result: Result<(), LineageError> = Err(LineageError::NotFound("x".into()));
        assert_err_variant!(result, LineageError::NotFound(_));
    }

    #[test]
    #[should_panic(expected = "HeadOverlap")]
    fn test_assert_err_variant_macro_fails() {
        let result: Result<(), LineageError> = Err(LineageError::NotFound("x".into()));
        assert_err_variant!(result, LineageError::HeadOverlap(_));
    }

    #[test]
    fn test_error_contains() {
        let error = LineageError::HeadOverlap("fe1b1".to_string());
        assert!(error_contains(&error, "fe1b1"));
        assert!(error_contains(&error, "overlaps"));
        assert!(!error_contains(&error, "base revision"));
    }

    #[test]
    fn test_revision_ids() {
        let revisions = [Revision::base("a"), Revision::new("b", ["a"])];
        assert_eq!(revision_ids(&revisions), vec!["a", "b"]);
    }
}
