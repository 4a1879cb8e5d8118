//! Extraction façade: configuration, builder and the extractor itself

use crate::{
    cursor::Cursor,
    error,
    matcher::{Callback, FsmMatcher, TreeMatcher},
    parser,
    path::{Annotations, PathComponent, SearchPath},
};
use log::debug;
use std::sync::Arc;

/// Matching configuration shared by both engines
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractorConfig {
    /// Accept cursors which start at a depth greater than zero
    pub match_relative_paths: bool,
    /// Fold ASCII case for field names and annotations
    pub match_case_insensitive: bool,
    /// Fold ASCII case for field names only
    pub match_fields_case_insensitive: bool,
}

enum Engine<T> {
    Tree(TreeMatcher<T>),
    Fsm(FsmMatcher<T>),
}

/// Invokes registered callbacks for values whose position in the value
/// tree matches a registered search path
///
/// An extractor is immutable once built and can be shared freely across
/// threads; all per-match state lives on the stack of the matching call.
pub struct Extractor<T> {
    engine: Engine<T>,
}

impl<T> Extractor<T> {
    /// Matches all remaining values reachable from the cursor position
    ///
    /// # Arguments
    /// * `reader` - cursor at the stream's start depth
    /// * `context` - user state passed to every callback
    pub fn match_stream(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        match &self.engine {
            Engine::Tree(matcher) => matcher.match_stream(reader, context),
            Engine::Fsm(matcher) => matcher.match_stream(reader, context),
        }
    }

    /// Matches only the value the cursor is positioned on
    ///
    /// On return the cursor is positioned on the same value at the same
    /// depth.
    pub fn match_current_value(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        match &self.engine {
            Engine::Tree(matcher) => matcher.match_current_value(reader, context),
            Engine::Fsm(matcher) => matcher.match_current_value(reader, context),
        }
    }

    /// True when the compiled state-machine engine is in use
    pub fn is_state_machine(&self) -> bool {
        matches!(self.engine, Engine::Fsm(_))
    }
}

/// Builder for [Extractor]
pub struct ExtractorBuilder<T> {
    search_paths: Vec<SearchPath<T>>,
    config: ExtractorConfig,
}

impl<T> ExtractorBuilder<T> {
    /// Creates a builder with the default configuration: absolute
    /// paths, case sensitive matching
    pub fn standard() -> Self {
        Self {
            search_paths: vec![],
            config: ExtractorConfig::default(),
        }
    }

    /// When true the extractor accepts cursors at any depth, when false
    /// the cursor must be at depth zero
    pub fn with_match_relative_paths(mut self, value: bool) -> Self {
        self.config.match_relative_paths = value;
        self
    }

    /// Fold ASCII case when matching field names and annotations
    ///
    /// Implies field-name folding.
    pub fn with_match_case_insensitive(mut self, value: bool) -> Self {
        self.config.match_case_insensitive = value;
        self.config.match_fields_case_insensitive = value;
        self
    }

    /// Fold ASCII case when matching field names, annotations stay case
    /// sensitive
    pub fn with_match_field_names_case_insensitive(mut self, value: bool) -> Self {
        self.config.match_fields_case_insensitive = value;
        self
    }

    /// Registers a callback for a textual path expression
    ///
    /// The callback receives the cursor positioned on the matching
    /// value and the user context. Its return value is a step-out
    /// instruction: 0 continues with the next value at the same depth,
    /// N > 0 exits N enclosing containers first.
    ///
    /// Callbacks must leave the cursor at the depth they received it
    /// at, and must not advance it past the matched value. Reading a
    /// matched container prevents paths nested beneath it from firing
    /// for that container's children.
    pub fn with_search_path<F>(mut self, expression: &str, callback: F) -> Result<Self, error::General>
    where
        F: Fn(&mut dyn Cursor, &mut T) -> Result<usize, error::Callback> + Send + Sync + 'static,
    {
        let (components, annotations) = parser::parse(expression)?;
        self.search_paths
            .push(SearchPath::new(components, wrap(callback), annotations));
        Ok(self)
    }

    /// Registers a callback for an already assembled component list,
    /// with an annotation filter for the top-level value
    pub fn with_search_path_components<F>(
        mut self,
        components: Vec<PathComponent>,
        callback: F,
        annotations: Vec<String>,
    ) -> Self
    where
        F: Fn(&mut dyn Cursor, &mut T) -> Result<usize, error::Callback> + Send + Sync + 'static,
    {
        self.search_paths.push(SearchPath::new(
            components,
            wrap(callback),
            Annotations::new(annotations),
        ));
        self
    }

    /// Builds an extractor, preferring the state-machine engine
    ///
    /// Falls back to the tree-walk engine when the registered paths
    /// cannot be compiled. Use [ExtractorBuilder::build_strict] to
    /// surface the incompatibility instead.
    pub fn build(self) -> Extractor<T> {
        match FsmMatcher::compile(&self.search_paths, false, self.config) {
            Ok(matcher) => Extractor {
                engine: Engine::Fsm(matcher),
            },
            Err(unsupported) => {
                debug!(
                    "search paths not supported by the state-machine engine, \
                     using tree-walk: {}",
                    unsupported
                );
                Extractor {
                    engine: Engine::Tree(TreeMatcher::new(self.search_paths, self.config)),
                }
            }
        }
    }

    /// Builds a state-machine extractor or reports why the registered
    /// paths cannot be compiled
    ///
    /// Supported paths keep a single variant of step type under each
    /// parent step and a single callback per state. Annotation filters
    /// are only supported on wildcards and on the top level. Case
    /// folding is supported for field names, not annotations.
    ///
    /// With `strict_typing` the extractor also raises when a path tries
    /// to navigate into a value whose kind cannot hold matching
    /// children: field lookups are only valid on structs, child lookups
    /// only on containers, untyped null is always acceptable and simply
    /// ends the path. The type check runs after the callbacks of the
    /// value itself, so top-level `()` matchers always fire.
    pub fn build_strict(self, strict_typing: bool) -> Result<Extractor<T>, error::Unsupported> {
        let matcher = FsmMatcher::compile(&self.search_paths, strict_typing, self.config)?;
        Ok(Extractor {
            engine: Engine::Fsm(matcher),
        })
    }

    /// Builds a tree-walk extractor
    ///
    /// Slower when many field names are registered, but supports the
    /// full path grammar, including annotation filters on fields and
    /// ordinals and several callbacks matching one value.
    pub fn build_legacy(self) -> Extractor<T> {
        Extractor {
            engine: Engine::Tree(TreeMatcher::new(self.search_paths, self.config)),
        }
    }
}

fn wrap<T, F>(callback: F) -> Callback<T>
where
    F: Fn(&mut dyn Cursor, &mut T) -> Result<usize, error::Callback> + Send + Sync + 'static,
{
    Arc::new(callback)
}

#[cfg(test)]
mod tests {
    use super::ExtractorBuilder;
    use crate::{cursor::Cursor, error, path::PathComponent, reader::TextReader};
    use rstest::rstest;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Build {
        Auto,
        Fsm,
        Legacy,
    }

    fn collect() -> impl Fn(&mut dyn Cursor, &mut Vec<i64>) -> Result<usize, error::Callback> {
        |reader, values| {
            values.push(reader.int_value().unwrap_or(-1));
            Ok(0)
        }
    }

    fn run(builder: ExtractorBuilder<Vec<i64>>, build: Build, data: &str) -> Vec<i64> {
        let extractor = match build {
            Build::Auto => builder.build(),
            Build::Fsm => builder.build_strict(false).unwrap(),
            Build::Legacy => builder.build_legacy(),
        };
        let mut values = vec![];
        let mut reader = TextReader::new(data);
        extractor.match_stream(&mut reader, &mut values).unwrap();
        values
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn single_field(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(foo)", collect())
            .unwrap();
        let values = run(
            builder,
            build,
            "{foo: 1} {bar: 2} {baz: [10,20,30,40]} {other: 99}",
        );
        assert_eq!(values, vec![1]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn field_then_index(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(foo 1)", collect())
            .unwrap();
        let values = run(builder, build, "{foo: [0,1,2]}");
        assert_eq!(values, vec![1]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn repeated_fields_all_match(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(foo bar)", collect())
            .unwrap();
        let values = run(builder, build, "{foo: {bar: 2, bar: 3}}");
        assert_eq!(values, vec![2, 3]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn step_out_stops_sibling_iteration(#[case] build: Build) {
        let builder = ExtractorBuilder::standard().with_search_path(
            "(foo bar)",
            |reader: &mut dyn Cursor, values: &mut Vec<i64>| {
                values.push(reader.int_value().unwrap_or(-1));
                Ok(1)
            },
        );
        let values = run(builder.unwrap(), build, "{foo: {bar: 2, bar: 3}}");
        assert_eq!(values, vec![2]);
    }

    #[rstest]
    #[case::legacy(Build::Legacy)]
    #[case::auto(Build::Auto)]
    fn top_level_annotations(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("A::(foo)", collect())
            .unwrap();
        let values = run(builder, build, "A::{bar: 1} A::{foo: 2} {foo: 3}");
        assert_eq!(values, vec![2]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn annotated_wildcard(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(A::*)", collect())
            .unwrap();
        let values = run(builder, build, "[A::1, 2]");
        assert_eq!(values, vec![1]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn case_insensitive_field_names(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_match_field_names_case_insensitive(true)
            .with_search_path("(foo)", collect())
            .unwrap();
        let values = run(builder, build, "{FOO: 1}{foo: 2}{fOo: 3}{bar: 4}");
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn case_insensitive_annotations_need_the_full_flag() {
        let builder = ExtractorBuilder::standard()
            .with_match_field_names_case_insensitive(true)
            .with_search_path("A::(foo)", collect())
            .unwrap();
        let values = run(builder, Build::Legacy, "a::{foo: 1} A::{foo: 2}");
        assert_eq!(values, vec![2]);

        let builder = ExtractorBuilder::standard()
            .with_match_case_insensitive(true)
            .with_search_path("A::(foo)", collect())
            .unwrap();
        let values = run(builder, Build::Legacy, "a::{FOO: 1} A::{foo: 2}");
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn top_level_matchers_with_and_without_annotations() {
        let extractor = ExtractorBuilder::standard()
            .with_search_path("()", |reader: &mut dyn Cursor, sums: &mut (i64, i64)| {
                sums.0 += reader.int_value().unwrap_or(0);
                Ok(0)
            })
            .unwrap()
            .with_search_path("A::()", |reader: &mut dyn Cursor, sums: &mut (i64, i64)| {
                sums.1 += reader.int_value().unwrap_or(0);
                Ok(0)
            })
            .unwrap()
            .build();

        // this combination is not state-machine compatible, build()
        // falls back to the tree-walk engine
        assert!(!extractor.is_state_machine());

        let mut sums = (0, 0);
        let mut reader = TextReader::new("1 1 1 A::10 1");
        extractor.match_stream(&mut reader, &mut sums).unwrap();
        assert_eq!(sums, (14, 10));
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn pure_wildcard_paths_match_exactly_their_depth(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(* *)", collect())
            .unwrap();
        let values = run(builder, build, "{a: {b: 1}, c: [2, [3]]} 4 [5]");
        // depth two values only: 1, 2 and the inner list
        assert_eq!(values, vec![1, 2, -1]);
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn empty_containers_yield_no_match(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(foo bar)", collect())
            .unwrap();
        let values = run(builder, build, "{foo: {}} {foo: []}");
        assert!(values.is_empty());
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn out_of_range_index_yields_no_match(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(foo 5)", collect())
            .unwrap();
        let values = run(builder, build, "{foo: [0, 1]}");
        assert!(values.is_empty());
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn escaped_wildcard_matches_a_literal_star_field(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("($ion_extractor_field::*)", collect())
            .unwrap();
        let values = run(builder, build, "{'*': 1, other: 2}");
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn component_registration_without_the_parser() {
        let extractor = ExtractorBuilder::standard()
            .with_search_path_components(
                vec![PathComponent::field("foo"), PathComponent::index(1)],
                collect(),
                vec![],
            )
            .build();
        assert!(extractor.is_state_machine());

        let mut values = vec![];
        let mut reader = TextReader::new("{foo: [0, 1, 2]}");
        extractor.match_stream(&mut reader, &mut values).unwrap();
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn no_paths_is_a_no_op() {
        let extractor = ExtractorBuilder::<Vec<i64>>::standard().build();
        let mut values = vec![];
        let mut reader = TextReader::new("{foo: 1}");
        extractor.match_stream(&mut reader, &mut values).unwrap();
        assert!(values.is_empty());

        // the cursor was not advanced
        assert!(reader.kind().is_none());
        assert!(reader.next().unwrap().is_some());
    }

    #[test]
    fn build_prefers_the_state_machine() {
        let extractor = ExtractorBuilder::standard()
            .with_search_path("(foo)", collect())
            .unwrap()
            .build();
        assert!(extractor.is_state_machine());

        let extractor = ExtractorBuilder::standard()
            .with_search_path("(a::foo)", collect())
            .unwrap()
            .build();
        assert!(!extractor.is_state_machine());
    }

    #[rstest]
    #[case::fsm(Build::Fsm)]
    #[case::legacy(Build::Legacy)]
    fn annotations_match_the_full_ordered_list(#[case] build: Build) {
        let builder = ExtractorBuilder::standard()
            .with_search_path("(A::B::*)", collect())
            .unwrap();
        let values = run(builder, build, "[A::B::1, B::A::2, A::3, A::B::C::4, 5]");
        assert_eq!(values, vec![1]);
    }

    #[test]
    fn cursor_depth_is_restored_after_matching() {
        let extractor = ExtractorBuilder::standard()
            .with_search_path("(foo bar)", collect())
            .unwrap()
            .build();

        let mut values = vec![];
        let mut reader = TextReader::new("{foo: {bar: 1}} 2");
        extractor.match_stream(&mut reader, &mut values).unwrap();
        assert_eq!(reader.depth(), 0);
        assert_eq!(values, vec![1]);
    }
}
