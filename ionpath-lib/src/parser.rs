//! Parses textual path expressions into components
//!
//! A path expression is written in the data format itself: an outer
//! s-expression or list whose entries are the components, for example
//! `(foo 0)`, `(* *)`, `A::(bar)` or `(A::*)`. The reserved annotation
//! `$ion_extractor_field` escapes a literal `*` field name.

use crate::{
    cursor::{Cursor, ValueKind},
    error,
    path::{Annotations, PathComponent},
    reader::TextReader,
};

const WILDCARD: &str = "*";
const WILDCARD_ESCAPE: &str = "$ion_extractor_field";
const ANNOTATED_WITH: &str = "annotatedWith";

/// Parses a path expression into its components and the annotation
/// filter written outside the outer sequence
pub fn parse(expression: &str) -> Result<(Vec<PathComponent>, Annotations), error::General> {
    let mut reader = TextReader::new(expression);
    let kind = reader
        .next()?
        .ok_or_else(|| error::Expression::new("path expression cannot be empty"))?;
    if !matches!(kind, ValueKind::Sexp | ValueKind::List) {
        return Err(error::Expression::new("path expression must be a s-expression or list").into());
    }
    let annotations = Annotations::new(reader.annotations().to_vec());

    reader.step_in()?;
    let mut components = vec![];
    while reader.next()?.is_some() {
        components.push(read_component(&mut reader)?);
    }
    reader.step_out()?;

    Ok((components, annotations))
}

fn read_component(reader: &mut TextReader) -> Result<PathComponent, error::General> {
    let (annotations, escaped) = extract_annotations(reader);
    match reader.kind() {
        Some(ValueKind::Int) => {
            let ordinal = reader
                .int_value()
                .ok_or_else(|| error::Expression::new("unreadable integer component"))?;
            if ordinal < 0 {
                return Err(
                    error::Expression::new(format!("Invalid path component type: {}", ordinal))
                        .into(),
                );
            }
            Ok(PathComponent::Index {
                ordinal: ordinal as usize,
                annotations: Annotations::new(annotations),
            })
        }
        Some(ValueKind::String | ValueKind::Symbol) => {
            let text = reader
                .string_value()
                .ok_or_else(|| error::Expression::new("unreadable text component"))?
                .to_string();
            if text == WILDCARD && !escaped {
                Ok(PathComponent::Wildcard {
                    annotations: Annotations::new(annotations),
                })
            } else {
                Ok(PathComponent::Field {
                    name: text,
                    annotations: Annotations::new(annotations),
                })
            }
        }
        Some(ValueKind::Sexp | ValueKind::List) => read_wrapped_component(reader),
        Some(other) => Err(error::Expression::new(format!(
            "Invalid path component type: {}",
            render_scalar(reader, other)
        ))
        .into()),
        None => Err(error::Expression::new("expected a path component").into()),
    }
}

/// Reads the `(inner annotatedWith A B ...)` form, which attaches
/// annotations to the wrapped component
fn read_wrapped_component(reader: &mut TextReader) -> Result<PathComponent, error::General> {
    reader.step_in()?;
    reader
        .next()?
        .ok_or_else(|| error::Expression::new("wrapped component cannot be empty"))?;
    let component = read_component(reader)?;

    reader
        .next()?
        .ok_or_else(|| error::Expression::new("wrapped component must have a tag"))?;
    let tag = read_text(reader)?;
    if tag != ANNOTATED_WITH {
        return Err(
            error::Expression::new(format!("Unknown wrapped component tag: {}", tag)).into(),
        );
    }

    let mut annotations = vec![];
    while reader.next()?.is_some() {
        annotations.push(read_text(reader)?);
    }
    if annotations.is_empty() {
        return Err(error::Expression::new(
            "annotatedWith components must have at least one annotation",
        )
        .into());
    }
    if component.has_annotations() {
        return Err(error::Expression::new("wrapped component cannot itself be annotated").into());
    }
    reader.step_out()?;

    Ok(component.with_annotations(annotations))
}

/// Strips the leading wildcard escape annotation and reports whether it
/// was present
fn extract_annotations(reader: &TextReader) -> (Vec<String>, bool) {
    let raw = reader.annotations();
    if raw.first().map(String::as_str) == Some(WILDCARD_ESCAPE) {
        (raw[1..].to_vec(), true)
    } else {
        (raw.to_vec(), false)
    }
}

fn read_text(reader: &TextReader) -> Result<String, error::General> {
    match reader.kind() {
        Some(ValueKind::Symbol | ValueKind::String) => Ok(reader
            .string_value()
            .ok_or_else(|| error::Expression::new("unreadable text component"))?
            .to_string()),
        Some(other) => Err(error::Expression::new(format!(
            "expected a symbol or string, found: {}",
            other
        ))
        .into()),
        None => Err(error::Expression::new("expected a symbol or string").into()),
    }
}

fn render_scalar(reader: &TextReader, kind: ValueKind) -> String {
    match kind {
        ValueKind::Bool => reader
            .bool_value()
            .map(|value| value.to_string())
            .unwrap_or_default(),
        ValueKind::Float | ValueKind::Decimal => reader
            .float_value()
            .map(|value| value.to_string())
            .unwrap_or_default(),
        ValueKind::Null => "null".to_string(),
        ValueKind::Struct => "{...}".to_string(),
        _ => reader.string_value().unwrap_or("").to_string(),
    }
}
