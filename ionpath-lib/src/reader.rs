//! Pull cursor over the textual form of the data format
//!
//! Supports top-level value streams, structs, lists, s-expressions,
//! annotations (`A::B::value`), strings with escapes, quoted and
//! identifier symbols, booleans, typed and untyped nulls, integers,
//! decimals and floats. Containers which are never stepped into are
//! skipped with a raw scan to the matching close delimiter.

use crate::{
    cursor::{Cursor, ValueKind},
    error,
};
use bytes::Bytes;
use std::str::from_utf8;

/// Metadata of the value the cursor is positioned on
#[derive(Debug, Clone)]
struct Value {
    kind: ValueKind,
    field_name: Option<String>,
    annotations: Vec<String>,
    text: Option<String>,
    integer: Option<i64>,
    float: Option<f64>,
    boolean: Option<bool>,
    /// Container bodies are consumed either by stepping through them
    /// or by the skip scan, never twice
    consumed: bool,
}

impl Value {
    fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            field_name: None,
            annotations: vec![],
            text: None,
            integer: None,
            float: None,
            boolean: None,
            consumed: false,
        }
    }
}

#[derive(Debug)]
struct Frame {
    value: Value,
    expect_separator: bool,
}

/// Reads a textual document and exposes it through [Cursor]
///
/// ```
/// use ionpath_lib::{cursor::{Cursor, ValueKind}, reader::TextReader};
///
/// let mut reader = TextReader::new("{foo: A::1} 2");
/// assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
/// reader.step_in().unwrap();
/// assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
/// assert_eq!(reader.field_name(), Some("foo"));
/// assert_eq!(reader.annotations(), ["A".to_string()]);
/// assert_eq!(reader.int_value(), Some(1));
/// reader.step_out().unwrap();
/// assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
/// assert_eq!(reader.next().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct TextReader {
    src: Bytes,
    pos: usize,
    stack: Vec<Frame>,
    current: Option<Value>,
}

fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_identifier_part(byte: u8) -> bool {
    is_identifier_start(byte) || byte.is_ascii_digit()
}

fn is_operator(byte: u8) -> bool {
    matches!(
        byte,
        b'!' | b'#'
            | b'%'
            | b'&'
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'/'
            | b';'
            | b'<'
            | b'='
            | b'>'
            | b'?'
            | b'@'
            | b'^'
            | b'`'
            | b'|'
            | b'~'
    )
}

fn close_delimiter(kind: ValueKind) -> u8 {
    match kind {
        ValueKind::Struct => b'}',
        ValueKind::List => b']',
        _ => b')',
    }
}

impl TextReader {
    /// Creates a reader over a textual document
    pub fn new(input: &str) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(input.as_bytes()))
    }

    /// Creates a reader over an already buffered document
    ///
    /// The buffer must hold UTF-8 text, invalid sequences are
    /// reported when they are reached.
    pub fn from_bytes(src: Bytes) -> Self {
        Self {
            src,
            pos: 0,
            stack: vec![],
            current: None,
        }
    }

    fn syntax<T: ToString>(&self, reason: T) -> error::General {
        error::Syntax::new(reason, self.pos).into()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek_byte(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn advance(&mut self) -> Result<Option<ValueKind>, error::General> {
        if let Some(value) = self.current.take() {
            if value.kind.is_container() && !value.consumed {
                self.skip_container()?;
            }
        }
        self.skip_ws();

        let container = self.stack.last().map(|frame| frame.value.kind);
        match container {
            None => {
                if self.pos >= self.src.len() {
                    return Ok(None);
                }
            }
            Some(kind) => {
                let close = close_delimiter(kind);
                let expect_separator = self
                    .stack
                    .last()
                    .map(|frame| frame.expect_separator)
                    .unwrap_or(false);
                if expect_separator && kind != ValueKind::Sexp {
                    match self.peek_byte() {
                        Some(b',') => {
                            self.pos += 1;
                            self.skip_ws();
                        }
                        Some(byte) if byte == close => {}
                        Some(byte) => {
                            return Err(self.syntax(format!(
                                "expected ',' or '{}', found '{}'",
                                close as char, byte as char
                            )))
                        }
                        None => return Err(self.syntax("unexpected end of input")),
                    }
                }
                match self.peek_byte() {
                    Some(byte) if byte == close => return Ok(None),
                    None => return Err(self.syntax("unexpected end of input")),
                    _ => {}
                }
            }
        }

        let field_name = if container == Some(ValueKind::Struct) {
            Some(self.read_field_name()?)
        } else {
            None
        };

        let annotations = self.read_annotations()?;
        let mut value = self.read_value(container)?;
        value.field_name = field_name;
        value.annotations = annotations;

        if let Some(frame) = self.stack.last_mut() {
            frame.expect_separator = true;
        }
        let kind = value.kind;
        self.current = Some(value);
        Ok(Some(kind))
    }

    fn read_field_name(&mut self) -> Result<String, error::General> {
        let name = match self.peek_byte() {
            Some(b'"') => self.read_quoted(b'"')?,
            Some(b'\'') => self.read_quoted(b'\'')?,
            Some(byte) if is_identifier_start(byte) => self.read_identifier()?,
            Some(byte) => {
                return Err(self.syntax(format!("invalid field name start '{}'", byte as char)))
            }
            None => return Err(self.syntax("unexpected end of input")),
        };
        self.skip_ws();
        if self.peek_byte() == Some(b':') && self.peek_byte_at(1) != Some(b':') {
            self.pos += 1;
            self.skip_ws();
            Ok(name)
        } else {
            Err(self.syntax("expected ':' after field name"))
        }
    }

    fn read_annotations(&mut self) -> Result<Vec<String>, error::General> {
        let mut annotations = vec![];
        loop {
            let mark = self.pos;
            let token = match self.peek_byte() {
                Some(b'\'') => self.read_quoted(b'\'')?,
                Some(byte) if is_identifier_start(byte) => self.read_identifier()?,
                _ => break,
            };
            self.skip_ws();
            if self.peek_byte() == Some(b':') && self.peek_byte_at(1) == Some(b':') {
                self.pos += 2;
                self.skip_ws();
                annotations.push(token);
            } else {
                self.pos = mark;
                break;
            }
        }
        Ok(annotations)
    }

    fn read_value(&mut self, container: Option<ValueKind>) -> Result<Value, error::General> {
        match self.peek_byte() {
            Some(b'{') => {
                self.pos += 1;
                Ok(Value::new(ValueKind::Struct))
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(Value::new(ValueKind::List))
            }
            Some(b'(') => {
                self.pos += 1;
                Ok(Value::new(ValueKind::Sexp))
            }
            Some(b'"') => {
                let text = self.read_quoted(b'"')?;
                let mut value = Value::new(ValueKind::String);
                value.text = Some(text);
                Ok(value)
            }
            Some(b'\'') => {
                let text = self.read_quoted(b'\'')?;
                let mut value = Value::new(ValueKind::Symbol);
                value.text = Some(text);
                Ok(value)
            }
            Some(b'-') if matches!(self.peek_byte_at(1), Some(byte) if byte.is_ascii_digit()) => {
                self.read_number()
            }
            Some(byte) if byte.is_ascii_digit() => self.read_number(),
            Some(byte) if is_identifier_start(byte) => {
                let word = self.read_identifier()?;
                self.keyword_or_symbol(word)
            }
            Some(byte) if container == Some(ValueKind::Sexp) && is_operator(byte) => {
                let text = self.read_operator();
                let mut value = Value::new(ValueKind::Symbol);
                value.text = Some(text);
                Ok(value)
            }
            Some(byte) => Err(self.syntax(format!("unexpected character '{}'", byte as char))),
            None => Err(self.syntax("unexpected end of input")),
        }
    }

    fn keyword_or_symbol(&mut self, word: String) -> Result<Value, error::General> {
        match word.as_str() {
            "true" | "false" => {
                let mut value = Value::new(ValueKind::Bool);
                value.boolean = Some(word == "true");
                Ok(value)
            }
            "null" => {
                // typed nulls like null.int collapse into the null kind
                if self.peek_byte() == Some(b'.') {
                    self.pos += 1;
                    self.read_identifier()?;
                }
                Ok(Value::new(ValueKind::Null))
            }
            _ => {
                let mut value = Value::new(ValueKind::Symbol);
                value.text = Some(word);
                Ok(value)
            }
        }
    }

    fn read_number(&mut self) -> Result<Value, error::General> {
        let start = self.pos;
        if self.peek_byte() == Some(b'-') {
            self.pos += 1;
        }
        let mut is_float = false;
        let mut is_decimal = false;
        while let Some(byte) = self.peek_byte() {
            match byte {
                b'0'..=b'9' | b'_' => self.pos += 1,
                b'.' => {
                    is_decimal = true;
                    self.pos += 1;
                }
                b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                    if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                b'd' | b'D' => {
                    is_decimal = true;
                    self.pos += 1;
                    if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
        let text = from_utf8(&self.src[start..self.pos])?;
        let cleaned: String = text.chars().filter(|chr| *chr != '_').collect();
        if is_float || is_decimal {
            let normalized = cleaned.replace(['d', 'D'], "e");
            let parsed: f64 = normalized
                .parse()
                .map_err(|_| error::Syntax::new(format!("invalid number '{}'", cleaned), start))?;
            let mut value = Value::new(if is_float {
                ValueKind::Float
            } else {
                ValueKind::Decimal
            });
            value.float = Some(parsed);
            Ok(value)
        } else {
            let parsed: i64 = cleaned
                .parse()
                .map_err(|_| error::Syntax::new(format!("invalid number '{}'", cleaned), start))?;
            let mut value = Value::new(ValueKind::Int);
            value.integer = Some(parsed);
            Ok(value)
        }
    }

    fn read_identifier(&mut self) -> Result<String, error::General> {
        let start = self.pos;
        while let Some(byte) = self.peek_byte() {
            if is_identifier_part(byte) {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.syntax("expected an identifier"));
        }
        Ok(from_utf8(&self.src[start..self.pos])?.to_string())
    }

    fn read_operator(&mut self) -> String {
        let start = self.pos;
        while let Some(byte) = self.peek_byte() {
            if is_operator(byte) {
                self.pos += 1;
            } else {
                break;
            }
        }
        // operator characters are ASCII
        String::from_utf8_lossy(&self.src[start..self.pos]).into_owned()
    }

    fn read_quoted(&mut self, quote: u8) -> Result<String, error::General> {
        self.pos += 1;
        let mut out: Vec<u8> = vec![];
        loop {
            match self.peek_byte() {
                None => return Err(self.syntax("unterminated string")),
                Some(byte) if byte == quote => {
                    self.pos += 1;
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let chr = self.read_escape()?;
                    let mut buffer = [0u8; 4];
                    out.extend_from_slice(chr.encode_utf8(&mut buffer).as_bytes());
                }
                Some(byte) => {
                    out.push(byte);
                    self.pos += 1;
                }
            }
        }
        String::from_utf8(out).map_err(|err| error::General::from(err.utf8_error()))
    }

    fn read_escape(&mut self) -> Result<char, error::General> {
        let byte = match self.peek_byte() {
            Some(byte) => byte,
            None => return Err(self.syntax("unterminated escape")),
        };
        self.pos += 1;
        let chr = match byte {
            b'n' => '\n',
            b't' => '\t',
            b'r' => '\r',
            b'0' => '\0',
            b'"' => '"',
            b'\'' => '\'',
            b'\\' => '\\',
            b'/' => '/',
            b'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = match self.peek_byte().and_then(|byte| (byte as char).to_digit(16))
                    {
                        Some(digit) => digit,
                        None => return Err(self.syntax("invalid unicode escape")),
                    };
                    code = code * 16 + digit;
                    self.pos += 1;
                }
                match char::from_u32(code) {
                    Some(chr) => chr,
                    None => return Err(self.syntax("invalid unicode escape")),
                }
            }
            other => {
                return Err(self.syntax(format!("unsupported escape '\\{}'", other as char)))
            }
        };
        Ok(chr)
    }

    /// Scans past the body of the current container without parsing it,
    /// including the matching close delimiter
    fn skip_container(&mut self) -> Result<(), error::General> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_byte() {
                None => return Err(self.syntax("unterminated container")),
                Some(b'"') => self.skip_quoted(b'"')?,
                Some(b'\'') => self.skip_quoted(b'\'')?,
                Some(b'{' | b'[' | b'(') => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(b'}' | b']' | b')') => {
                    depth -= 1;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }
        Ok(())
    }

    fn skip_quoted(&mut self, quote: u8) -> Result<(), error::General> {
        self.pos += 1;
        loop {
            match self.peek_byte() {
                None => return Err(self.syntax("unterminated string")),
                Some(b'\\') => self.pos += 2,
                Some(byte) if byte == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }
}

impl Cursor for TextReader {
    fn next(&mut self) -> Result<Option<ValueKind>, error::General> {
        self.advance()
    }

    fn kind(&self) -> Option<ValueKind> {
        self.current.as_ref().map(|value| value.kind)
    }

    fn is_in_struct(&self) -> bool {
        self.stack
            .last()
            .map(|frame| frame.value.kind == ValueKind::Struct)
            .unwrap_or(false)
    }

    fn field_name(&self) -> Option<&str> {
        self.current
            .as_ref()
            .and_then(|value| value.field_name.as_deref())
    }

    fn annotations(&self) -> &[String] {
        self.current
            .as_ref()
            .map(|value| value.annotations.as_slice())
            .unwrap_or(&[])
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn step_in(&mut self) -> Result<(), error::General> {
        match self.current.take() {
            Some(value) if value.kind.is_container() && !value.consumed => {
                self.stack.push(Frame {
                    value,
                    expect_separator: false,
                });
                Ok(())
            }
            Some(value) => {
                self.current = Some(value);
                Err(error::Extraction::new("cannot step into the current value").into())
            }
            None => Err(error::Extraction::new("cursor is not positioned on a value").into()),
        }
    }

    fn step_out(&mut self) -> Result<(), error::General> {
        if self.stack.is_empty() {
            return Err(error::Extraction::new("cannot step out at the top level").into());
        }
        while self.advance()?.is_some() {}
        match self.peek_byte() {
            Some(b'}' | b']' | b')') => self.pos += 1,
            _ => return Err(self.syntax("expected a container close")),
        }
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return Err(error::Extraction::new("cannot step out at the top level").into()),
        };
        let mut value = frame.value;
        value.consumed = true;
        self.current = Some(value);
        Ok(())
    }

    fn string_value(&self) -> Option<&str> {
        self.current.as_ref().and_then(|value| value.text.as_deref())
    }

    fn int_value(&self) -> Option<i64> {
        self.current.as_ref().and_then(|value| value.integer)
    }

    fn float_value(&self) -> Option<f64> {
        self.current.as_ref().and_then(|value| value.float)
    }

    fn bool_value(&self) -> Option<bool> {
        self.current.as_ref().and_then(|value| value.boolean)
    }
}

#[cfg(test)]
mod tests {
    use super::TextReader;
    use crate::cursor::{Cursor, ValueKind};

    #[test]
    fn scalars() {
        let mut reader = TextReader::new(r#"1 -42 "two" three true null null.int 4.5 6e0"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.int_value(), Some(1));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.int_value(), Some(-42));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::String));
        assert_eq!(reader.string_value(), Some("two"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Symbol));
        assert_eq!(reader.string_value(), Some("three"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Bool));
        assert_eq!(reader.bool_value(), Some(true));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Null));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Null));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Decimal));
        assert_eq!(reader.float_value(), Some(4.5));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Float));
        assert_eq!(reader.float_value(), Some(6.0));
        assert_eq!(reader.next().unwrap(), None);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn struct_fields() {
        let mut reader = TextReader::new(r#"{foo: 1, "bar baz": 2, 'qux': 3,}"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        assert!(!reader.is_in_struct());
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert!(reader.is_in_struct());
        assert_eq!(reader.field_name(), Some("foo"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.field_name(), Some("bar baz"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.field_name(), Some("qux"));
        assert_eq!(reader.next().unwrap(), None);
        reader.step_out().unwrap();
        assert_eq!(reader.depth(), 0);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn nested_containers() {
        let mut reader = TextReader::new(r#"{foo: [1, (a b), {bar: 2}]}"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::List));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Sexp));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Symbol));
        assert_eq!(reader.string_value(), Some("a"));
        reader.step_out().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        assert_eq!(reader.next().unwrap(), None);
        reader.step_out().unwrap();
        assert_eq!(reader.next().unwrap(), None);
        reader.step_out().unwrap();
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn annotations() {
        let mut reader = TextReader::new(r#"A::1 A::B::{foo: C::2} $esc::'x y'::3"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.annotations(), ["A".to_string()]);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        assert_eq!(reader.annotations(), ["A".to_string(), "B".to_string()]);
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.annotations(), ["C".to_string()]);
        assert_eq!(reader.field_name(), Some("foo"));
        reader.step_out().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.annotations(), ["$esc".to_string(), "x y".to_string()]);
        assert_eq!(reader.int_value(), Some(3));
    }

    #[test]
    fn skips_unvisited_containers() {
        let mut reader = TextReader::new(r#"{a: [1, "]", {b: 2}]} [3] 4"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::List));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.int_value(), Some(4));
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn step_out_with_unread_siblings() {
        let mut reader = TextReader::new(r#"[1, 2, [3, 4], 5] 6"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::List));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        reader.step_out().unwrap();
        assert_eq!(reader.kind(), Some(ValueKind::List));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.int_value(), Some(6));
    }

    #[test]
    fn sexp_operators() {
        let mut reader = TextReader::new(r#"(* foo 0 A::*)"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Sexp));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Symbol));
        assert_eq!(reader.string_value(), Some("*"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Symbol));
        assert_eq!(reader.string_value(), Some("foo"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Symbol));
        assert_eq!(reader.string_value(), Some("*"));
        assert_eq!(reader.annotations(), ["A".to_string()]);
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn string_escapes() {
        let mut reader = TextReader::new(r#""a \"b\" \\ \n A""#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::String));
        assert_eq!(reader.string_value(), Some("a \"b\" \\ \n A"));
    }

    #[test]
    fn utf8_content() {
        let mut reader = TextReader::new(r#"{"š𐍈€": "€š𐍈"}"#);
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Struct));
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::String));
        assert_eq!(reader.field_name(), Some("š𐍈€"));
        assert_eq!(reader.string_value(), Some("€š𐍈"));
    }

    #[test]
    fn empty_containers() {
        let mut reader = TextReader::new(r#"{} [] ()"#);
        for _ in 0..3 {
            assert!(reader.next().unwrap().unwrap().is_container());
            reader.step_in().unwrap();
            assert_eq!(reader.next().unwrap(), None);
            reader.step_out().unwrap();
        }
        assert_eq!(reader.next().unwrap(), None);
    }

    #[test]
    fn reports_errors() {
        let mut reader = TextReader::new(r#"{foo 1}"#);
        reader.next().unwrap();
        reader.step_in().unwrap();
        assert!(reader.next().is_err());

        let mut reader = TextReader::new(r#"[1 2]"#);
        reader.next().unwrap();
        reader.step_in().unwrap();
        reader.next().unwrap();
        assert!(reader.next().is_err());

        let mut reader = TextReader::new(r#""unterminated"#);
        assert!(reader.next().is_err());

        let mut reader = TextReader::new(r#"#"#);
        assert!(reader.next().is_err());

        let mut reader = TextReader::new("1");
        reader.next().unwrap();
        assert!(reader.step_in().is_err());
        assert!(reader.step_out().is_err());
    }

    #[test]
    fn typed_null_in_struct() {
        let mut reader = TextReader::new(r#"{a: null.list, b: 1}"#);
        reader.next().unwrap();
        reader.step_in().unwrap();
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Null));
        assert_eq!(reader.field_name(), Some("a"));
        assert_eq!(reader.next().unwrap(), Some(ValueKind::Int));
        assert_eq!(reader.field_name(), Some("b"));
    }
}
