//! Module containing errors

use std::{error::Error, fmt, io, str::Utf8Error};

/// Path expression related errors
#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    reason: String,
}

impl Expression {
    pub fn new<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl Error for Expression {}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid path expression - {}", self.reason)
    }
}

/// Raised when a set of search paths cannot be compiled into
/// the state-machine matcher
#[derive(Debug, PartialEq, Clone)]
pub struct Unsupported {
    reason: String,
}

impl Unsupported {
    pub fn new<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl Error for Unsupported {}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unsupported search path - {}", self.reason)
    }
}

/// Callback related errors
#[derive(Debug, PartialEq, Clone)]
pub struct Callback {
    reason: String,
}

impl Callback {
    pub fn new<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl Error for Callback {}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Callback failed - {}", self.reason)
    }
}

/// Extraction contract violations (preconditions, callback misuse,
/// strict-typing failures)
#[derive(Debug, PartialEq, Clone)]
pub struct Extraction {
    reason: String,
}

impl Extraction {
    pub fn new<T>(reason: T) -> Self
    where
        T: ToString,
    {
        Self {
            reason: reason.to_string(),
        }
    }
}

impl Error for Extraction {}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Extraction failed - {}", self.reason)
    }
}

/// Malformed document text
#[derive(Debug, PartialEq, Clone)]
pub struct Syntax {
    reason: String,
    idx: usize,
}

impl Syntax {
    pub fn new<T>(reason: T, idx: usize) -> Self
    where
        T: ToString,
    {
        Self {
            reason: reason.to_string(),
            idx,
        }
    }
}

impl Error for Syntax {}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Syntax error at idx {} - {}", self.idx, self.reason)
    }
}

/// Aggregate of all errors the library can produce
#[derive(Debug)]
pub enum General {
    Expression(Expression),
    Unsupported(Unsupported),
    Callback(Callback),
    Extraction(Extraction),
    Syntax(Syntax),
    Utf8Error(Utf8Error),
    IOError(io::Error),
}

impl Error for General {}

impl fmt::Display for General {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Expression(err) => err.fmt(f),
            Self::Unsupported(err) => err.fmt(f),
            Self::Callback(err) => err.fmt(f),
            Self::Extraction(err) => err.fmt(f),
            Self::Syntax(err) => err.fmt(f),
            Self::Utf8Error(err) => err.fmt(f),
            Self::IOError(err) => err.fmt(f),
        }
    }
}

impl From<Expression> for General {
    fn from(expression: Expression) -> Self {
        Self::Expression(expression)
    }
}

impl From<Unsupported> for General {
    fn from(unsupported: Unsupported) -> Self {
        Self::Unsupported(unsupported)
    }
}

impl From<Callback> for General {
    fn from(callback: Callback) -> Self {
        Self::Callback(callback)
    }
}

impl From<Extraction> for General {
    fn from(extraction: Extraction) -> Self {
        Self::Extraction(extraction)
    }
}

impl From<Syntax> for General {
    fn from(syntax: Syntax) -> Self {
        Self::Syntax(syntax)
    }
}

impl From<Utf8Error> for General {
    fn from(utf8: Utf8Error) -> Self {
        Self::Utf8Error(utf8)
    }
}

impl From<io::Error> for General {
    fn from(io_error: io::Error) -> Self {
        Self::IOError(io_error)
    }
}
