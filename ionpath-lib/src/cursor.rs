//! Abstract cursor over a stream of self-describing values
//!
//! Matchers consume the stream exclusively through the [Cursor] trait,
//! so any reader which can report value kinds, field names, annotations
//! and depth can be plugged in. [crate::reader::TextReader] is the
//! implementation shipped with this crate.

use crate::error;
use std::fmt;

/// Kind of a value in the data format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    Timestamp,
    String,
    Symbol,
    Blob,
    Clob,
    List,
    Sexp,
    Struct,
}

impl ValueKind {
    /// Containers hold ordered child values, structs additionally
    /// name each child
    pub fn is_container(self) -> bool {
        matches!(self, Self::List | Self::Sexp | Self::Struct)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Timestamp => "timestamp",
            Self::String => "string",
            Self::Symbol => "symbol",
            Self::Blob => "blob",
            Self::Clob => "clob",
            Self::List => "list",
            Self::Sexp => "sexp",
            Self::Struct => "struct",
        };
        write!(f, "{}", name)
    }
}

/// Streaming cursor positioned on at most one value at a time
///
/// The cursor enters a container only when [Cursor::step_in] is called;
/// a container which is passed over with [Cursor::next] must be skipped
/// without visiting its children.
pub trait Cursor {
    /// Advances to the next value within the current container
    ///
    /// # Returns
    /// * `Ok(Some(kind))` - positioned on a new value
    /// * `Ok(None)` - no values left at this depth
    fn next(&mut self) -> Result<Option<ValueKind>, error::General>;

    /// Kind of the current value, `None` when not positioned on a value
    fn kind(&self) -> Option<ValueKind>;

    /// True when the current value is a direct child of a struct
    fn is_in_struct(&self) -> bool;

    /// Field name of the current value, `None` outside of structs
    fn field_name(&self) -> Option<&str>;

    /// Ordered annotation symbols of the current value
    fn annotations(&self) -> &[String];

    /// Number of containers the cursor has stepped into
    fn depth(&self) -> usize;

    /// Enters the current container value
    fn step_in(&mut self) -> Result<(), error::General>;

    /// Leaves the current container, skipping unread children
    fn step_out(&mut self) -> Result<(), error::General>;

    /// Text of the current string or symbol value
    fn string_value(&self) -> Option<&str>;

    /// The current integer value
    fn int_value(&self) -> Option<i64>;

    /// The current float or decimal value
    fn float_value(&self) -> Option<f64>;

    /// The current boolean value
    fn bool_value(&self) -> Option<bool>;
}
