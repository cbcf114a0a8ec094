use core::fmt;
use std::panic::Location;

use thiserror::Error;

pub type LispResult<T> = Result<T, LispError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Unbound,
    Args,
    Type,
    DivideByZero,
    OutOfBounds,
    Io,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Syntax => "Syntax",
            Self::Unbound => "Unbound",
            Self::Args => "Args",
            Self::Type => "Type",
            Self::DivideByZero => "DivideByZero",
            Self::OutOfBounds => "OutOfBounds",
            Self::Io => "Io",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Syntax" => Self::Syntax,
            "Unbound" => Self::Unbound,
            "Args" => Self::Args,
            "Type" => Self::Type,
            "DivideByZero" => Self::DivideByZero,
            "OutOfBounds" => Self::OutOfBounds,
            "Io" => Self::Io,
            _ => return None,
        })
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Syntax => "Syntax error",
            Self::Unbound => "Symbol not bound",
            Self::Args => "Wrong number of arguments",
            Self::Type => "Wrong type",
            Self::DivideByZero => "Division-by-zero error",
            Self::OutOfBounds => "Index out of bounds",
            Self::Io => "I/O error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An error raised while reading or evaluating.
///
/// `location` records where inside the interpreter the error was raised, which
/// helps when debugging builtins. It says nothing about the user's source.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct LispError {
    kind: ErrorKind,
    message: String,
    location: &'static Location<'static>,
}

impl LispError {
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: Location::caller(),
        }
    }

    #[track_caller]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    #[track_caller]
    pub fn args(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Args, message)
    }

    #[track_caller]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The one-line diagnostic printed by interactive front ends.
    pub fn diagnostic(&self) -> String {
        format!("{}: '{}' at {}", self.kind, self.message, self.location)
    }
}

impl PartialEq for LispError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.message == other.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_points_at_the_raising_site() {
        let err = LispError::args("Requires two arguments.");
        assert_eq!(err.kind(), ErrorKind::Args);
        assert!(err.location().file().ends_with("error.rs"));
        assert!(err.diagnostic().contains("Requires two arguments."));
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in [ErrorKind::Syntax, ErrorKind::Unbound, ErrorKind::Args, ErrorKind::Type,
                     ErrorKind::DivideByZero, ErrorKind::OutOfBounds, ErrorKind::Io] {
            assert_eq!(ErrorKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ErrorKind::from_name("Nope"), None);
    }
}
