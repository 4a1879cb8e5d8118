//! Matching engines that drive a cursor against registered search paths
//!
//! Two engines coexist. [tree::TreeMatcher] checks every active path
//! against each value and supports the full component grammar.
//! [fsm::FsmMatcher] compiles a restricted subset of paths into a
//! transition table and dispatches in constant time per value.

pub mod fsm;
pub mod tree;

pub use fsm::FsmMatcher;
pub use tree::TreeMatcher;

use crate::{cursor::Cursor, error};
use std::sync::Arc;

/// Callback invoked with the cursor positioned on the matched value
///
/// The returned integer is a step-out instruction: 0 continues with the
/// next sibling, N exits N enclosing containers before resuming.
pub type Callback<T> =
    Arc<dyn Fn(&mut dyn Cursor, &mut T) -> Result<usize, error::Callback> + Send + Sync>;

/// Runs a callback and enforces its contract: the cursor must return at
/// the same depth, and the step-out request must stay within the depth
/// the match started at
pub(crate) fn invoke_callback<T>(
    reader: &mut dyn Cursor,
    callback: &Callback<T>,
    initial_depth: usize,
    context: &mut T,
) -> Result<usize, error::General> {
    let previous_depth = reader.depth();
    let step_out = callback.as_ref()(reader, context)?;
    let new_depth = reader.depth();

    if previous_depth != new_depth {
        return Err(error::Extraction::new(format!(
            "cursor must be at the same depth when returning from a callback. initial: {}, new: {}",
            previous_depth, new_depth
        ))
        .into());
    }

    let relative_depth = new_depth - initial_depth;
    if step_out > relative_depth {
        return Err(error::Extraction::new(format!(
            "callback return cannot be greater than the cursor's relative depth. return: {}, relative depth: {}",
            step_out, relative_depth
        ))
        .into());
    }

    Ok(step_out)
}

pub(crate) fn check_start_depth(
    reader: &dyn Cursor,
    match_relative_paths: bool,
) -> Result<(), error::General> {
    if reader.depth() != 0 && !match_relative_paths {
        return Err(error::Extraction::new(format!(
            "cursor must be at depth zero, it was at: {}",
            reader.depth()
        ))
        .into());
    }
    Ok(())
}

pub(crate) fn check_positioned(reader: &dyn Cursor) -> Result<(), error::General> {
    if reader.kind().is_none() {
        return Err(
            error::Extraction::new("cursor must be positioned on a value; call next() first")
                .into(),
        );
    }
    Ok(())
}
