//! Search path model: components, annotation filters and partial matching

use crate::{cursor::Cursor, extractor::ExtractorConfig, matcher::Callback};
use std::fmt;

/// Ordered annotation filter attached to a path component or to a whole
/// search path
///
/// An empty filter matches any value. A non-empty filter matches only
/// values whose full annotation list equals the filter, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    values: Vec<String>,
}

impl Annotations {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub(crate) fn matches(&self, actual: &[String], ignore_case: bool) -> bool {
        self.values.is_empty() || Self::list_eq(&self.values, actual, ignore_case)
    }

    fn list_eq(left: &[String], right: &[String], ignore_case: bool) -> bool {
        left.len() == right.len()
            && left.iter().zip(right).all(|(l, r)| {
                if ignore_case {
                    l.eq_ignore_ascii_case(r)
                } else {
                    l == r
                }
            })
    }
}

impl From<Vec<String>> for Annotations {
    fn from(values: Vec<String>) -> Self {
        Self::new(values)
    }
}

/// One step of a search path
///
/// The path `(foo * 1)` has three components: the field name `foo`, a
/// wildcard and the ordinal position 1. Each component can additionally
/// carry an annotation filter, written `A::*` in the expression syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum PathComponent {
    /// Matches a struct field by name
    Field {
        name: String,
        annotations: Annotations,
    },
    /// Matches the n-th child of the enclosing container, 0-based
    Index {
        ordinal: usize,
        annotations: Annotations,
    },
    /// Matches any child of any container
    Wildcard { annotations: Annotations },
}

impl PathComponent {
    pub fn field<S: Into<String>>(name: S) -> Self {
        Self::Field {
            name: name.into(),
            annotations: Annotations::default(),
        }
    }

    pub fn index(ordinal: usize) -> Self {
        Self::Index {
            ordinal,
            annotations: Annotations::default(),
        }
    }

    pub fn wildcard() -> Self {
        Self::Wildcard {
            annotations: Annotations::default(),
        }
    }

    pub fn annotated_wildcard(annotations: Vec<String>) -> Self {
        Self::Wildcard {
            annotations: Annotations::new(annotations),
        }
    }

    /// Replaces the component's annotation filter
    pub fn with_annotations(self, values: Vec<String>) -> Self {
        let annotations = Annotations::new(values);
        match self {
            Self::Field { name, .. } => Self::Field { name, annotations },
            Self::Index { ordinal, .. } => Self::Index {
                ordinal,
                annotations,
            },
            Self::Wildcard { .. } => Self::Wildcard { annotations },
        }
    }

    pub fn annotations(&self) -> &Annotations {
        match self {
            Self::Field { annotations, .. }
            | Self::Index { annotations, .. }
            | Self::Wildcard { annotations } => annotations,
        }
    }

    pub(crate) fn has_annotations(&self) -> bool {
        !self.annotations().is_empty()
    }

    /// Checks the annotation filter first, then the structural predicate
    pub(crate) fn matches(&self, context: &MatchContext) -> bool {
        self.annotations()
            .matches(&context.annotations, context.config.match_case_insensitive)
            && self.inner_matches(context)
    }

    fn inner_matches(&self, context: &MatchContext) -> bool {
        match self {
            Self::Field { name, .. } => {
                if !context.in_struct {
                    return false;
                }
                match &context.field_name {
                    Some(actual) => {
                        if context.config.match_fields_case_insensitive {
                            name.eq_ignore_ascii_case(actual)
                        } else {
                            name == actual
                        }
                    }
                    None => false,
                }
            }
            Self::Index { ordinal, .. } => *ordinal == context.container_index,
            Self::Wildcard { .. } => true,
        }
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for annotation in self.annotations().values() {
            write!(f, "{}::", annotation)?;
        }
        match self {
            Self::Field { name, .. } => write!(f, "{}", name),
            Self::Index { ordinal, .. } => write!(f, "{}", ordinal),
            Self::Wildcard { .. } => write!(f, "*"),
        }
    }
}

/// Snapshot of the cursor position taken before any callback runs
#[derive(Debug)]
pub(crate) struct MatchContext {
    /// How many path components were consumed reaching this value
    pub(crate) path_component_index: usize,
    /// Position of this value within its parent container, 0-based
    pub(crate) container_index: usize,
    pub(crate) in_struct: bool,
    pub(crate) field_name: Option<String>,
    pub(crate) annotations: Vec<String>,
    pub(crate) config: ExtractorConfig,
}

impl MatchContext {
    pub(crate) fn capture(
        reader: &dyn Cursor,
        path_component_index: usize,
        container_index: usize,
        config: ExtractorConfig,
    ) -> Self {
        Self {
            path_component_index,
            container_index,
            in_struct: reader.is_in_struct(),
            field_name: reader.field_name().map(str::to_string),
            annotations: reader.annotations().to_vec(),
            config,
        }
    }
}

/// A registered path: ordered components, a top-level annotation filter
/// and the callback to invoke on a match
pub struct SearchPath<T> {
    components: Vec<PathComponent>,
    annotations: Annotations,
    callback: Callback<T>,
}

impl<T> SearchPath<T> {
    pub(crate) fn new(
        components: Vec<PathComponent>,
        callback: Callback<T>,
        annotations: Annotations,
    ) -> Self {
        Self {
            components,
            annotations,
            callback,
        }
    }

    /// Number of components in this path
    pub fn size(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub(crate) fn callback(&self) -> &Callback<T> {
        &self.callback
    }

    /// The top-level annotation filter rewritten as an explicit wildcard
    /// head, which is how the state-machine builder consumes paths
    pub(crate) fn normalized(&self) -> Vec<PathComponent> {
        let mut normalized = Vec::with_capacity(self.components.len() + 1);
        normalized.push(PathComponent::Wildcard {
            annotations: self.annotations.clone(),
        });
        normalized.extend(self.components.iter().cloned());
        normalized
    }

    /// Checks whether this path still matches the stream at the given
    /// component index
    pub(crate) fn partial_match_at(&self, context: &MatchContext) -> bool {
        let index = context.path_component_index;
        if index == 0 {
            self.annotations
                .matches(&context.annotations, context.config.match_case_insensitive)
        } else if index <= self.components.len() {
            self.components[index - 1].matches(context)
        } else {
            false
        }
    }
}

impl<T> Clone for SearchPath<T> {
    fn clone(&self) -> Self {
        Self {
            components: self.components.clone(),
            annotations: self.annotations.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<T> fmt::Debug for SearchPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SearchPath")
            .field("components", &self.components)
            .field("annotations", &self.annotations)
            .finish()
    }
}

impl<T> fmt::Display for SearchPath<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for annotation in self.annotations.values() {
            write!(f, "{}::", annotation)?;
        }
        write!(f, "(")?;
        for (idx, component) in self.components.iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, ")")
    }
}
