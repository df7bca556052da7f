//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every failed phase surfaces one aggregate, human-readable error:
//! extraction errors carry the owning entity and column, unresolved
//! cross-references list every missing name, and consistency violations are
//! collected into a [`CompositeError`].

use derive_more::{Display, From};
use std::fmt;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[display("JSON Error: {_0}")]
    Json(serde_json::Error),

    /// Structural problem in the source document (bad heading, bad table row).
    #[from(ignore)]
    #[display("scraping error: {_0}")]
    Extraction(String),

    /// Children that were listed by a parent but never declared.
    #[display("{_0}")]
    Unresolved(UnresolvedTypes),

    /// Aggregated problems (entity validation or self check).
    #[display("{_0}")]
    Composite(CompositeError),

    /// Misuse of the model API, e.g. registering a blank or duplicate entity.
    #[from(ignore)]
    #[display("Contract Error: {_0}")]
    Contract(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

/// A list of independent problems reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeError {
    /// One human-readable line per problem.
    pub problems: Vec<String>,
}

impl CompositeError {
    /// Wraps the problems, returning `None` when there are none.
    pub fn from_problems(problems: Vec<String>) -> Option<Self> {
        if problems.is_empty() {
            None
        } else {
            Some(Self { problems })
        }
    }
}

impl fmt::Display for CompositeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} problems detected:", self.problems.len())?;
        for problem in &self.problems {
            write!(f, "\n- {}", problem)?;
        }
        Ok(())
    }
}

/// Child type names that stayed unresolved after both resolution passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTypes(pub Vec<String>);

impl fmt::Display for UnresolvedTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "some types were not added to the spec:")?;
        for name in &self.0 {
            write!(f, "\n- {}", name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        // Test that String defaults to General, not Extraction or Contract
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_composite_lists_every_problem() {
        let err = CompositeError::from_problems(vec!["version not set".into(), "link not set".into()])
            .unwrap();
        assert_eq!(
            AppError::from(err).to_string(),
            "2 problems detected:\n- version not set\n- link not set"
        );
    }

    #[test]
    fn test_composite_empty_is_none() {
        assert!(CompositeError::from_problems(Vec::new()).is_none());
    }

    #[test]
    fn test_unresolved_names_every_child() {
        let err = AppError::Unresolved(UnresolvedTypes(vec!["A".into(), "B".into()]));
        assert_eq!(
            err.to_string(),
            "some types were not added to the spec:\n- A\n- B"
        );
    }
}
