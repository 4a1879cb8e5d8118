//! Finite-state-machine matcher
//!
//! Compiles a set of search paths into a tree of transition nodes keyed
//! by field name, ordinal position or annotation tuple. Dispatch per
//! value is a single table lookup, independent of how many field names
//! are registered. Only a subset of path combinations can be compiled,
//! the builder rejects the rest so callers can fall back to the
//! tree-walk matcher.
//!
//! As much branching as possible is closed over at build time. Field
//! names are lowercased once when case folding is requested, and every
//! node holds exactly one kind of child transition, so a reader context
//! can reach at most one state.

use crate::{
    cursor::{Cursor, ValueKind},
    error,
    extractor::ExtractorConfig,
    matcher::{check_positioned, check_start_depth, invoke_callback, Callback},
    path::{Annotations, PathComponent, SearchPath},
};
use std::collections::HashMap;

/// What a node allows for the current value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Descend {
    /// The value may hold matching children
    Possible,
    /// No children can match, which is fine
    Terminal,
    /// The value kind cannot be navigated by this node
    Mistyped,
}

enum FsmNodeKind<T> {
    Terminal,
    Field(HashMap<String, FsmNode<T>>),
    FieldIgnoreCase(HashMap<String, FsmNode<T>>),
    Index(HashMap<usize, FsmNode<T>>),
    Wildcard(Box<FsmNode<T>>),
    /// Ordered candidates, the first tuple equal to the value's
    /// annotation list wins
    Annotated(Vec<(Annotations, FsmNode<T>)>),
}

struct FsmNode<T> {
    callback: Option<Callback<T>>,
    kind: FsmNodeKind<T>,
}

impl<T> FsmNode<T> {
    /// Child state for the given reader context, `None` when nothing
    /// matches
    ///
    /// `position` is `None` for top-level values, otherwise the ordinal
    /// of the value in its container, for sequences and structs alike.
    fn transition(
        &self,
        field_name: Option<&str>,
        position: Option<usize>,
        annotations: &[String],
    ) -> Option<&FsmNode<T>> {
        match &self.kind {
            FsmNodeKind::Terminal => None,
            FsmNodeKind::Field(children) => field_name.and_then(|name| children.get(name)),
            FsmNodeKind::FieldIgnoreCase(children) => {
                field_name.and_then(|name| children.get(&name.to_ascii_lowercase()))
            }
            FsmNodeKind::Index(children) => {
                position.and_then(|ordinal| children.get(&ordinal))
            }
            FsmNodeKind::Wildcard(child) => Some(child),
            FsmNodeKind::Annotated(entries) => entries
                .iter()
                .find(|(filter, _)| filter.values() == annotations)
                .map(|(_, child)| child),
        }
    }

    fn descend(&self, kind: ValueKind) -> Descend {
        match &self.kind {
            FsmNodeKind::Terminal => Descend::Terminal,
            FsmNodeKind::Field(_) | FsmNodeKind::FieldIgnoreCase(_) => match kind {
                ValueKind::Struct => Descend::Possible,
                ValueKind::Null => Descend::Terminal,
                _ => Descend::Mistyped,
            },
            _ => {
                if kind == ValueKind::Null {
                    Descend::Terminal
                } else if kind.is_container() {
                    Descend::Possible
                } else {
                    Descend::Mistyped
                }
            }
        }
    }
}

/// Matches by table lookup over compiled transition nodes
pub struct FsmMatcher<T> {
    root: FsmNode<T>,
    empty: bool,
    strict_typing: bool,
    config: ExtractorConfig,
}

impl<T> FsmMatcher<T> {
    /// Compiles the search paths, rejecting combinations the state
    /// machine cannot represent
    pub(crate) fn compile(
        paths: &[SearchPath<T>],
        strict_typing: bool,
        config: ExtractorConfig,
    ) -> Result<Self, error::Unsupported> {
        let mut builder = FsmBuilder::new(
            config.match_case_insensitive,
            config.match_fields_case_insensitive,
        );
        for path in paths {
            builder.accept(path)?;
        }
        Ok(Self {
            root: builder.build()?,
            empty: paths.is_empty(),
            strict_typing,
            config,
        })
    }

    /// Advances the cursor through all remaining values at the current
    /// depth and matches each of them
    pub fn match_stream(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        check_start_depth(reader, self.config.match_relative_paths)?;
        if self.empty {
            return Ok(());
        }
        while reader.next()?.is_some() {
            self.match_positioned(reader, context)?;
        }
        Ok(())
    }

    /// Matches the value the cursor is already positioned on
    pub fn match_current_value(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        check_start_depth(reader, self.config.match_relative_paths)?;
        check_positioned(reader)?;
        if self.empty {
            return Ok(());
        }
        self.match_positioned(reader, context)
    }

    fn match_positioned(
        &self,
        reader: &mut dyn Cursor,
        context: &mut T,
    ) -> Result<(), error::General> {
        let initial_depth = reader.depth();
        self.step(reader, &self.root, context, None, initial_depth)?;
        Ok(())
    }

    fn step(
        &self,
        reader: &mut dyn Cursor,
        node: &FsmNode<T>,
        context: &mut T,
        position: Option<usize>,
        initial_depth: usize,
    ) -> Result<usize, error::General> {
        let child = match node.transition(reader.field_name(), position, reader.annotations()) {
            Some(child) => child,
            None => return Ok(0),
        };

        if let Some(callback) = &child.callback {
            let step_out = invoke_callback(reader, callback, initial_depth, context)?;
            if step_out > 0 {
                return Ok(step_out);
            }
        }

        let kind = match reader.kind() {
            Some(kind) => kind,
            None => return Ok(0),
        };
        match child.descend(kind) {
            Descend::Mistyped if self.strict_typing => {
                let message = match &child.kind {
                    FsmNodeKind::Field(_) | FsmNodeKind::FieldIgnoreCase(_) => format!(
                        "field lookups are only supported on struct values, found: {}",
                        kind
                    ),
                    _ => format!(
                        "child lookups are only supported on container values, found: {}",
                        kind
                    ),
                };
                return Err(error::Extraction::new(message).into());
            }
            Descend::Possible => {
                reader.step_in()?;
                let mut child_position = 0;
                let mut step_out = 0;
                while step_out == 0 && reader.next()?.is_some() {
                    step_out =
                        self.step(reader, child, context, Some(child_position), initial_depth)?;
                    child_position += 1;
                }
                reader.step_out()?;
                if step_out > 0 {
                    return Ok(step_out - 1);
                }
            }
            _ => {}
        }

        Ok(0)
    }
}

/// Mutable node tree the builder folds paths into before compiling
struct BuildNode<T> {
    callback: Option<Callback<T>>,
    wildcard: Option<Box<BuildNode<T>>>,
    annotated: Vec<(Annotations, BuildNode<T>)>,
    fields: HashMap<String, BuildNode<T>>,
    indexes: HashMap<usize, BuildNode<T>>,
}

impl<T> Default for BuildNode<T> {
    fn default() -> Self {
        Self {
            callback: None,
            wildcard: None,
            annotated: vec![],
            fields: HashMap::new(),
            indexes: HashMap::new(),
        }
    }
}

impl<T> BuildNode<T> {
    fn insert(
        &mut self,
        steps: &[PathComponent],
        callback: Callback<T>,
        case_insensitive_all: bool,
        case_insensitive_fields: bool,
    ) -> Result<(), error::Unsupported> {
        match steps.split_first() {
            None => self.set_callback(callback),
            Some((step, rest)) => self
                .accept_step(step, case_insensitive_all, case_insensitive_fields)?
                .insert(rest, callback, case_insensitive_all, case_insensitive_fields),
        }
    }

    /// Finds or creates the child node for one path component
    fn accept_step(
        &mut self,
        step: &PathComponent,
        case_insensitive_all: bool,
        case_insensitive_fields: bool,
    ) -> Result<&mut BuildNode<T>, error::Unsupported> {
        if step.has_annotations() && case_insensitive_all {
            return Err(error::Unsupported::new(
                "case insensitive annotation matching is not supported here; \
                 use the tree-walk matcher or field-name folding instead",
            ));
        }
        match step {
            PathComponent::Wildcard { annotations } => {
                if annotations.is_empty() {
                    let child = self.wildcard.get_or_insert_with(Box::default);
                    Ok(&mut **child)
                } else {
                    let position = self
                        .annotated
                        .iter()
                        .position(|(filter, _)| filter == annotations);
                    let index = match position {
                        Some(index) => index,
                        None => {
                            self.annotated
                                .push((annotations.clone(), BuildNode::default()));
                            self.annotated.len() - 1
                        }
                    };
                    Ok(&mut self.annotated[index].1)
                }
            }
            PathComponent::Field { name, annotations } => {
                if !annotations.is_empty() {
                    return Err(error::Unsupported::new(
                        "annotations are only supported on wildcards",
                    ));
                }
                let key = if case_insensitive_fields {
                    name.to_ascii_lowercase()
                } else {
                    name.clone()
                };
                Ok(self.fields.entry(key).or_default())
            }
            PathComponent::Index {
                ordinal,
                annotations,
            } => {
                if !annotations.is_empty() {
                    return Err(error::Unsupported::new(
                        "annotations are only supported on wildcards",
                    ));
                }
                Ok(self.indexes.entry(*ordinal).or_default())
            }
        }
    }

    fn set_callback(&mut self, callback: Callback<T>) -> Result<(), error::Unsupported> {
        if self.callback.is_some() {
            return Err(error::Unsupported::new(
                "cannot register multiple callbacks for the same path",
            ));
        }
        self.callback = Some(callback);
        Ok(())
    }

    fn build(self, case_insensitive_fields: bool) -> Result<FsmNode<T>, error::Unsupported> {
        let BuildNode {
            callback,
            wildcard,
            annotated,
            fields,
            indexes,
        } = self;

        let mut variants = 0;
        if wildcard.is_some() {
            variants += 1;
        }
        if !annotated.is_empty() {
            variants += 1;
        }
        if !fields.is_empty() {
            variants += 1;
        }
        if !indexes.is_empty() {
            variants += 1;
        }
        if variants > 1 {
            // allowing a mix would mean several states can be active for
            // one reader context, which is the tree-walk matcher's job
            return Err(error::Unsupported::new(
                "only one of wildcard, annotated wildcard, field name, or ordinal \
                 transitions is supported per state",
            ));
        }

        let kind = if let Some(child) = wildcard {
            FsmNodeKind::Wildcard(Box::new((*child).build(case_insensitive_fields)?))
        } else if !annotated.is_empty() {
            let mut entries = Vec::with_capacity(annotated.len());
            for (filter, node) in annotated {
                entries.push((filter, node.build(case_insensitive_fields)?));
            }
            FsmNodeKind::Annotated(entries)
        } else if !fields.is_empty() {
            let mut children = HashMap::with_capacity(fields.len());
            for (name, node) in fields {
                children.insert(name, node.build(case_insensitive_fields)?);
            }
            if case_insensitive_fields {
                FsmNodeKind::FieldIgnoreCase(children)
            } else {
                FsmNodeKind::Field(children)
            }
        } else if !indexes.is_empty() {
            let mut children = HashMap::with_capacity(indexes.len());
            for (ordinal, node) in indexes {
                children.insert(ordinal, node.build(case_insensitive_fields)?);
            }
            FsmNodeKind::Index(children)
        } else {
            FsmNodeKind::Terminal
        };

        Ok(FsmNode { callback, kind })
    }
}

struct FsmBuilder<T> {
    root: BuildNode<T>,
    case_insensitive_all: bool,
    case_insensitive_fields: bool,
}

impl<T> FsmBuilder<T> {
    fn new(case_insensitive_all: bool, case_insensitive_fields: bool) -> Self {
        Self {
            root: BuildNode::default(),
            case_insensitive_all,
            case_insensitive_fields,
        }
    }

    fn accept(&mut self, path: &SearchPath<T>) -> Result<(), error::Unsupported> {
        let steps = path.normalized();
        self.root.insert(
            &steps,
            path.callback().clone(),
            self.case_insensitive_all,
            self.case_insensitive_fields,
        )
    }

    fn build(self) -> Result<FsmNode<T>, error::Unsupported> {
        self.root.build(self.case_insensitive_fields)
    }
}
