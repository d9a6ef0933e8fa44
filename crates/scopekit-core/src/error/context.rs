//! Context extension trait for error handling.

use super::session::SessionError;

/// Extension trait for adding context to `Result` types.
///
/// This provides `anyhow`-style context methods while preserving the
/// typed error system.
pub trait SessionResultExt<T> {
    /// Add context to an error.
    fn context<C: Into<String>>(self, context: C) -> Result<T, SessionError>;

    /// Add context lazily (only evaluated on error).
    fn with_context<C, F>(self, f: F) -> Result<T, SessionError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> SessionResultExt<T> for Result<T, E>
where
    E: Into<SessionError>,
{
    fn context<C: Into<String>>(self, context: C) -> Result<T, SessionError> {
        self.map_err(|e| SessionError::WithContext {
            context: context.into(),
            source: Box::new(e.into()),
        })
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SessionError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| SessionError::WithContext {
            context: f().into(),
            source: Box::new(e.into()),
        })
    }
}
