//! Custom assertions for scopekit testing.

use pretty_assertions::assert_eq;
use scopekit_core::ReleaseErrors;
use scopekit_core::types::CallToolResult;

use crate::recorder::ReleaseLog;

/// Assert that `log` holds exactly `expected`, in order.
///
/// # Panics
///
/// Panics with a diff if the entries differ.
#[track_caller]
pub fn assert_log(log: &ReleaseLog, expected: &[&str]) {
    let entries = log.entries();
    let actual: Vec<&str> = entries.iter().map(String::as_str).collect();
    assert_eq!(actual, expected, "unexpected lifecycle log");
}

/// Assert the labels of the failed releases, in release order.
///
/// # Panics
///
/// Panics with a diff if the labels differ.
#[track_caller]
pub fn assert_failed_labels(errors: &ReleaseErrors, expected: &[&str]) {
    let actual: Vec<&str> = errors.iter().map(|failure| failure.label.as_str()).collect();
    assert_eq!(actual, expected, "unexpected release failures");
}

/// Assert that a tool result is successful and contains `expected_text`.
///
/// # Panics
///
/// Panics if the result is an error or doesn't contain the expected text.
#[track_caller]
pub fn assert_tool_success(result: &CallToolResult, expected_text: &str) {
    assert!(
        !result.is_error(),
        "Expected successful tool result, but got error: {}",
        result.text_content()
    );
    let text = result.text_content();
    assert!(
        text.contains(expected_text),
        "Expected tool result to contain '{expected_text}', but got '{text}'"
    );
}

/// Assert that a tool result is an error containing `expected_message`.
///
/// # Panics
///
/// Panics if the result is successful or doesn't contain the message.
#[track_caller]
pub fn assert_tool_error(result: &CallToolResult, expected_message: &str) {
    assert!(
        result.is_error(),
        "Expected error tool result, but got success"
    );
    let text = result.text_content();
    assert!(
        text.contains(expected_message),
        "Expected error message to contain '{expected_message}', but got '{text}'"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::{failing_release, tracked};
    use scopekit_core::ResourceStack;

    #[test]
    fn test_tool_assertions() {
        assert_tool_success(&CallToolResult::text("Result: 42"), "42");
        assert_tool_error(&CallToolResult::error("boom happened"), "boom");
    }

    #[test]
    #[should_panic(expected = "Expected error tool result")]
    fn test_tool_error_on_success_panics() {
        assert_tool_error(&CallToolResult::text("fine"), "boom");
    }

    #[tokio::test]
    async fn test_failed_labels() {
        let log = ReleaseLog::new();
        let mut stack = ResourceStack::new();
        stack.acquire("one", failing_release(&log, "one")).await.unwrap();
        stack.acquire("two", tracked(&log, "two")).await.unwrap();
        stack.acquire("three", failing_release(&log, "three")).await.unwrap();

        let err = stack.close().await.unwrap_err();
        let errors = err.release_errors().unwrap();
        assert_failed_labels(errors, &["three", "one"]);
        assert_log(
            &log,
            &[
                "ENTER: one",
                "ENTER: two",
                "ENTER: three",
                "EXIT: three",
                "EXIT: two",
                "EXIT: one",
            ],
        );
    }
}
