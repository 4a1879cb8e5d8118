use clap::{crate_authors, crate_description, crate_name, crate_version, App, Arg};
use ionpath_lib::{
    cursor::{Cursor, ValueKind},
    error,
    extractor::{Extractor, ExtractorBuilder},
    reader::TextReader,
};
use std::{
    fs,
    io::{stdin, Read},
};

/// Renders the value the cursor is positioned on back to text
///
/// Containers are rendered by stepping through them, so nested search
/// paths will not fire inside a printed container.
fn render_value(reader: &mut dyn Cursor) -> Result<String, error::General> {
    let mut out = String::new();
    write_value(reader, &mut out)?;
    Ok(out)
}

fn write_value(reader: &mut dyn Cursor, out: &mut String) -> Result<(), error::General> {
    for annotation in reader.annotations() {
        out.push_str(annotation);
        out.push_str("::");
    }
    let kind = match reader.kind() {
        Some(kind) => kind,
        None => return Ok(()),
    };
    match kind {
        ValueKind::Struct => {
            out.push('{');
            reader.step_in()?;
            let mut first = true;
            while reader.next()?.is_some() {
                if !first {
                    out.push_str(", ");
                }
                first = false;
                if let Some(name) = reader.field_name() {
                    let name = name.to_string();
                    out.push_str(&name);
                    out.push_str(": ");
                }
                write_value(reader, out)?;
            }
            reader.step_out()?;
            out.push('}');
        }
        ValueKind::List | ValueKind::Sexp => {
            let (open, close, separator) = if kind == ValueKind::List {
                ('[', ']', ", ")
            } else {
                ('(', ')', " ")
            };
            out.push(open);
            reader.step_in()?;
            let mut first = true;
            while reader.next()?.is_some() {
                if !first {
                    out.push_str(separator);
                }
                first = false;
                write_value(reader, out)?;
            }
            reader.step_out()?;
            out.push(close);
        }
        ValueKind::String => {
            let text = reader.string_value().unwrap_or("");
            out.push_str(&format!("{:?}", text));
        }
        ValueKind::Symbol => out.push_str(reader.string_value().unwrap_or("")),
        ValueKind::Int => out.push_str(
            &reader
                .int_value()
                .map(|value| value.to_string())
                .unwrap_or_default(),
        ),
        ValueKind::Float | ValueKind::Decimal => out.push_str(
            &reader
                .float_value()
                .map(|value| value.to_string())
                .unwrap_or_default(),
        ),
        ValueKind::Bool => out.push_str(if reader.bool_value().unwrap_or(false) {
            "true"
        } else {
            "false"
        }),
        _ => out.push_str("null"),
    }
    Ok(())
}

fn print_match() -> impl Fn(&mut dyn Cursor, &mut ()) -> Result<usize, error::Callback> {
    |reader, _| {
        let text = render_value(reader).map_err(|err| error::Callback::new(err.to_string()))?;
        println!("{}", text);
        Ok(0)
    }
}

fn build_extractor(
    paths: &[&str],
    relative: bool,
    case_insensitive: bool,
    fields_case_insensitive: bool,
    strict: bool,
    strict_types: bool,
    legacy: bool,
) -> Result<Extractor<()>, error::General> {
    let mut builder = ExtractorBuilder::standard()
        .with_match_relative_paths(relative)
        .with_match_case_insensitive(case_insensitive);
    if fields_case_insensitive {
        builder = builder.with_match_field_names_case_insensitive(true);
    }
    for path in paths {
        builder = builder.with_search_path(path, print_match())?;
    }
    let extractor = if legacy {
        builder.build_legacy()
    } else if strict || strict_types {
        builder.build_strict(strict_types)?
    } else {
        builder.build()
    };
    Ok(extractor)
}

fn main() -> Result<(), error::General> {
    env_logger::init();
    let app = App::new(crate_name!())
        .author(crate_authors!())
        .version(crate_version!())
        .about(crate_description!())
        .arg(
            Arg::with_name("path")
                .help("Search path expression, e.g. '(foo 0)' or 'A::(bar *)'")
                .short("p")
                .long("path")
                .multiple(true)
                .takes_value(true)
                .value_name("PATH_EXPRESSION")
                .required(true),
        )
        .arg(
            Arg::with_name("relative")
                .help("Accept documents which start below the top level")
                .long("relative"),
        )
        .arg(
            Arg::with_name("case_insensitive")
                .help("Fold ASCII case for field names and annotations")
                .short("i")
                .long("case-insensitive"),
        )
        .arg(
            Arg::with_name("fields_case_insensitive")
                .help("Fold ASCII case for field names only")
                .long("fields-case-insensitive"),
        )
        .arg(
            Arg::with_name("strict")
                .help("Fail instead of falling back when paths cannot be compiled")
                .long("strict"),
        )
        .arg(
            Arg::with_name("strict_types")
                .help("Additionally reject mistyped navigations (implies --strict)")
                .long("strict-types"),
        )
        .arg(
            Arg::with_name("legacy")
                .help("Force the tree-walk engine")
                .long("legacy")
                .conflicts_with("strict")
                .conflicts_with("strict_types"),
        )
        .arg(
            Arg::with_name("input")
                .help("Input file (stdin when omitted)")
                .value_name("FILE")
                .index(1),
        );

    let matches = app.get_matches();

    let paths: Vec<&str> = matches
        .values_of("path")
        .map(|values| values.collect())
        .unwrap_or_default();

    let extractor = build_extractor(
        &paths,
        matches.is_present("relative"),
        matches.is_present("case_insensitive"),
        matches.is_present("fields_case_insensitive"),
        matches.is_present("strict"),
        matches.is_present("strict_types"),
        matches.is_present("legacy"),
    )?;

    let input = match matches.value_of("input") {
        Some(file) => fs::read_to_string(file)?,
        None => {
            let mut buffer = String::new();
            stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let mut reader = TextReader::new(&input);
    extractor.match_stream(&mut reader, &mut ())
}
