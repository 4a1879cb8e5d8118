#![crate_name = "ionpath_lib"]

//! This library extracts values from streams of self-describing,
//! hierarchical, typed data without materializing the documents.
//!
//! Callers register textual *search paths* (see [parser]) together with
//! callbacks, build an [extractor::Extractor] and run it over a
//! [cursor::Cursor]. The extractor plans the traversal so that subtrees
//! which cannot contribute to any match are skipped rather than parsed.
//!
//! Two matching engines are available behind one API: a general
//! tree-walk engine and a compiled state machine which is much faster
//! when many field names are registered (see [matcher]).
//!
//! # Examples
//! ```
//! use ionpath_lib::{cursor::Cursor, extractor::ExtractorBuilder, reader::TextReader};
//! use std::sync::{Arc, Mutex};
//!
//! let total = Arc::new(Mutex::new(0));
//!
//! let sum = {
//!     let total = total.clone();
//!     move |reader: &mut dyn Cursor, _: &mut ()| {
//!         *total.lock().unwrap() += reader.int_value().unwrap_or(0);
//!         Ok(0)
//!     }
//! };
//!
//! let extractor = ExtractorBuilder::standard()
//!     .with_search_path("(foo)", sum.clone()).unwrap()
//!     .with_search_path("(bar)", sum).unwrap()
//!     .build();
//!
//! let mut reader = TextReader::new("{foo: 1} {bar: 2} {baz: 3}");
//! extractor.match_stream(&mut reader, &mut ()).unwrap();
//!
//! assert_eq!(*total.lock().unwrap(), 3);
//! ```
//!
//! Callbacks also receive a mutable user context, which avoids the
//! shared state above:
//! ```
//! use ionpath_lib::{cursor::Cursor, extractor::ExtractorBuilder, reader::TextReader};
//!
//! let extractor = ExtractorBuilder::standard()
//!     .with_search_path("(A::baz 1)", |reader: &mut dyn Cursor, seen: &mut Vec<i64>| {
//!         seen.push(reader.int_value().unwrap_or(0));
//!         Ok(0)
//!     })
//!     .unwrap()
//!     .build();
//!
//! let mut seen = vec![];
//! let mut reader = TextReader::new("{baz: A::[10,20,30,40]} {baz: [100,200]}");
//! extractor.match_stream(&mut reader, &mut seen).unwrap();
//!
//! assert_eq!(seen, vec![20]);
//! ```

pub mod cursor;
pub mod error;
pub mod extractor;
pub mod matcher;
pub mod parser;
pub mod path;
pub mod reader;

pub use cursor::{Cursor, ValueKind};
pub use extractor::{Extractor, ExtractorBuilder, ExtractorConfig};
pub use path::{Annotations, PathComponent, SearchPath};
pub use reader::TextReader;
