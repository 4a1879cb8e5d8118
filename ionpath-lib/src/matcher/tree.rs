//! General tree-walk matcher
//!
//! Keeps a stack of the paths still partially matched at each depth and
//! checks the top frame against every value the cursor visits. Supports
//! every component combination, including annotation filters on fields
//! and ordinals.

use crate::{
    cursor::Cursor,
    error,
    extractor::ExtractorConfig,
    matcher::{check_positioned, check_start_depth, invoke_callback},
    path::{MatchContext, SearchPath},
};

/// Stack of partially matched paths, one frame per depth
///
/// The frames hold indexes into the matcher's path list. The stack
/// length always equals the cursor's relative depth plus one.
struct Tracker {
    stack: Vec<Vec<usize>>,
    initial_depth: usize,
}

impl Tracker {
    fn new(path_count: usize, initial_depth: usize) -> Self {
        Self {
            stack: vec![(0..path_count).collect()],
            initial_depth,
        }
    }

    fn active(&self) -> &[usize] {
        self.stack.last().map(Vec::as_slice).unwrap_or(&[])
    }

    fn current_depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn push(&mut self, partial: Vec<usize>) {
        self.stack.push(partial);
    }

    fn pop(&mut self) {
        self.stack.pop();
    }
}

/// Matches by checking all active paths against each value
pub struct TreeMatcher<T> {
    paths: Vec<SearchPath<T>>,
    config: ExtractorConfig,
}

impl<T> TreeMatcher<T> {
    pub(crate) fn new(paths: Vec<SearchPath<T>>, config: ExtractorConfig) -> Self {
        Self { paths, config }
    }

    /// Advances the cursor through all remaining values at the current
    /// depth and matches each of them
    pub fn match_stream(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        check_start_depth(reader, self.config.match_relative_paths)?;
        if self.paths.is_empty() {
            return Ok(());
        }
        let mut tracker = Tracker::new(self.paths.len(), reader.depth());
        self.match_all(reader, &mut tracker, context)?;
        Ok(())
    }

    /// Matches the value the cursor is already positioned on
    ///
    /// On return the cursor is on the same value at the same depth.
    pub fn match_current_value(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        check_start_depth(reader, self.config.match_relative_paths)?;
        check_positioned(reader)?;
        if self.paths.is_empty() {
            return Ok(());
        }
        let mut tracker = Tracker::new(self.paths.len(), reader.depth());
        self.match_value(reader, &mut tracker, context, 0)?;
        Ok(())
    }

    fn match_all(
        &self,
        reader: &mut dyn Cursor,
        tracker: &mut Tracker,
        context: &mut T,
    ) -> Result<usize, error::General> {
        let mut container_index = 0;
        while reader.next()?.is_some() {
            let step_out = self.match_value(reader, tracker, context, container_index)?;
            if step_out > 0 {
                return Ok(step_out - 1);
            }
            container_index += 1;
        }
        Ok(0)
    }

    fn match_value(
        &self,
        reader: &mut dyn Cursor,
        tracker: &mut Tracker,
        context: &mut T,
        container_index: usize,
    ) -> Result<usize, error::General> {
        let current_depth = tracker.current_depth();
        let match_context =
            MatchContext::capture(reader, current_depth, container_index, self.config);

        let mut partial = vec![];
        for &path_index in tracker.active() {
            let path = &self.paths[path_index];
            if !path.partial_match_at(&match_context) {
                continue;
            }
            if current_depth == path.size() {
                // the whole path matched, fire the callback
                let step_out =
                    invoke_callback(reader, path.callback(), tracker.initial_depth, context)?;
                if step_out > 0 {
                    return Ok(step_out);
                }
            } else {
                partial.push(path_index);
            }
        }

        let is_container = reader
            .kind()
            .map(|kind| kind.is_container())
            .unwrap_or(false);
        if is_container && !partial.is_empty() {
            tracker.push(partial);
            reader.step_in()?;
            let step_out = self.match_all(reader, tracker, context)?;
            reader.step_out()?;
            tracker.pop();
            if step_out > 0 {
                return Ok(step_out);
            }
        }

        Ok(0)
    }
}
