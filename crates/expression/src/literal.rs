//! Literal parsing and token classification.
//!
//! [`parse_literal`] is a total function: any token maps to a [`Value`],
//! falling back to the trimmed original string when nothing structured
//! matches. Classification helpers ([`is_literal`],
//! [`is_symbolic_reference`], [`is_valid_numeric_string`]) decide how the
//! evaluator treats a token without fully parsing it.

use std::collections::BTreeMap;

use crate::core::Value;

/// Collapses redundant quote runs and trims surrounding whitespace.
///
/// Triple runs collapse before double runs so `'''x'''` becomes `'x'`
/// rather than unbalanced fragments.
#[must_use]
pub fn normalize_quotes(token: &str) -> String {
    token
        .trim()
        .replace("'''", "'")
        .replace("\"\"\"", "\"")
        .replace("''", "'")
        .replace("\"\"", "\"")
}

/// Converts a string token into its typed value. Never fails.
///
/// Recognized forms, in order: case-insensitive booleans and
/// `null`/`none`; quote-wrapped strings (returned verbatim, even if the
/// contents look numeric); all-digit integers (leading zeros stripped);
/// structural literals (signed numbers incl. scientific notation,
/// lists, mappings, tuples). Everything else comes back as the trimmed
/// original string, so blank input parses to the empty string.
#[must_use]
pub fn parse_literal(token: &str) -> Value {
    let normalized = normalize_quotes(token);
    let val = normalized.trim();

    match val.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "none" => return Value::Null,
        _ => {}
    }

    if is_quote_wrapped(val) {
        return Value::Str(unquote(val).to_string());
    }

    if !val.is_empty() && val.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(i) = val.parse::<i64>() {
            return Value::Int(i);
        }
        // Digit runs beyond i64 range still parse, as floats.
        if let Ok(x) = val.parse::<f64>() {
            return Value::Float(x);
        }
    }

    structural::parse(val).unwrap_or_else(|| Value::Str(val.to_string()))
}

/// Non-string values pass through [`parse_literal`] unchanged.
#[must_use]
pub fn parse_token(value: &Value) -> Value {
    match value {
        Value::Str(s) => parse_literal(s),
        other => other.clone(),
    }
}

/// Classifies a token as a primitive literal without fully parsing it.
///
/// Only boolean/null words, unsigned digit runs, and quote-wrapped
/// tokens qualify; `-10` and `3.14` deliberately do not (they are still
/// parseable, just not trivially classifiable).
#[must_use]
pub fn is_literal(token: &str) -> bool {
    let t = token.trim();
    if matches!(
        t.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "none"
    ) {
        return true;
    }
    if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    is_quote_wrapped(t)
}

/// Detects a symbolic reference: a dotted or bracketed token meant as a
/// payload lookup rather than a literal.
///
/// Boolean/null words, anything float-parseable, and quote-wrapped
/// tokens are excluded, so `150.0` and `'a.b'` are literals while
/// `system.status.code` and `data[1].value` are references.
#[must_use]
pub fn is_symbolic_reference(token: &str) -> bool {
    let t = token.trim();
    if t.is_empty() {
        return false;
    }
    if matches!(
        t.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "none"
    ) {
        return false;
    }
    if t.len() >= 2 && is_quote_wrapped(t) {
        return false;
    }
    if t.parse::<f64>().is_ok() {
        return false;
    }
    t.contains('.') || t.contains('[') || t.contains(']')
}

/// True when the string can safely be coerced to a finite float.
///
/// `f64::from_str` accepts `nan` and `inf` spellings, so finiteness is
/// checked explicitly; thousand separators and unit suffixes fail the
/// parse itself.
#[must_use]
pub fn is_valid_numeric_string(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

fn is_quote_wrapped(t: &str) -> bool {
    !t.is_empty()
        && ((t.starts_with('\'') && t.ends_with('\''))
            || (t.starts_with('"') && t.ends_with('"')))
}

/// Strips one layer of wrapping quotes. A lone quote character unwraps
/// to the empty string.
fn unquote(t: &str) -> &str {
    if t.len() >= 2 { &t[1..t.len() - 1] } else { "" }
}

/// Recursive-descent parsing for structural literals: numbers, quoted
/// strings, boolean/null words, lists, tuples, and mappings.
mod structural {
    use super::{BTreeMap, Value};

    pub fn parse(input: &str) -> Option<Value> {
        let mut p = Parser {
            bytes: input.as_bytes(),
            pos: 0,
        };
        p.skip_ws();
        let value = p.value()?;
        p.skip_ws();
        // Trailing junk (e.g. `3.14.15`) disqualifies the whole token.
        if p.pos == p.bytes.len() { Some(value) } else { None }
    }

    struct Parser<'a> {
        bytes: &'a [u8],
        pos: usize,
    }

    impl Parser<'_> {
        fn peek(&self) -> Option<u8> {
            self.bytes.get(self.pos).copied()
        }

        fn skip_ws(&mut self) {
            while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
                self.pos += 1;
            }
        }

        fn value(&mut self) -> Option<Value> {
            match self.peek()? {
                b'[' => self.sequence(b'[', b']'),
                b'(' => self.sequence(b'(', b')'),
                b'{' => self.mapping(),
                b'\'' | b'"' => self.quoted(),
                b'0'..=b'9' | b'+' | b'-' | b'.' => self.number(),
                _ => self.word(),
            }
        }

        fn sequence(&mut self, open: u8, close: u8) -> Option<Value> {
            debug_assert_eq!(self.peek(), Some(open));
            self.pos += 1;
            let mut items = Vec::new();
            loop {
                self.skip_ws();
                if self.peek() == Some(close) {
                    self.pos += 1;
                    return Some(Value::List(items));
                }
                items.push(self.value()?);
                self.skip_ws();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(c) if c == close => {}
                    _ => return None,
                }
            }
        }

        fn mapping(&mut self) -> Option<Value> {
            self.pos += 1;
            let mut entries = BTreeMap::new();
            loop {
                self.skip_ws();
                if self.peek() == Some(b'}') {
                    self.pos += 1;
                    return Some(Value::Map(entries));
                }
                let key = match self.value()? {
                    // Scalar keys only; bare words fail upstream already.
                    v @ (Value::Str(_) | Value::Int(_) | Value::Float(_) | Value::Bool(_)) => {
                        v.to_string()
                    }
                    _ => return None,
                };
                self.skip_ws();
                if self.peek() != Some(b':') {
                    return None;
                }
                self.pos += 1;
                self.skip_ws();
                let value = self.value()?;
                entries.insert(key, value);
                self.skip_ws();
                match self.peek() {
                    Some(b',') => self.pos += 1,
                    Some(b'}') => {}
                    _ => return None,
                }
            }
        }

        fn quoted(&mut self) -> Option<Value> {
            let quote = self.peek()?;
            self.pos += 1;
            let mut out = Vec::new();
            loop {
                let b = self.peek()?;
                self.pos += 1;
                match b {
                    b'\\' => {
                        let escaped = self.peek()?;
                        self.pos += 1;
                        out.push(match escaped {
                            b'n' => b'\n',
                            b't' => b'\t',
                            b'r' => b'\r',
                            other => other,
                        });
                    }
                    _ if b == quote => {
                        // The cursor only ever stops on ASCII quote and
                        // backslash bytes, which cannot occur inside a
                        // multi-byte sequence, so the collected run is
                        // still valid UTF-8.
                        return String::from_utf8(out).ok().map(Value::Str);
                    }
                    _ => out.push(b),
                }
            }
        }

        fn number(&mut self) -> Option<Value> {
            let start = self.pos;
            while self
                .peek()
                .is_some_and(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
            {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
            if let Ok(i) = text.parse::<i64>() {
                return Some(Value::Int(i));
            }
            text.parse::<f64>().ok().map(Value::Float)
        }

        fn word(&mut self) -> Option<Value> {
            let start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
                self.pos += 1;
            }
            let text = std::str::from_utf8(&self.bytes[start..self.pos]).ok()?;
            match text.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                "null" | "none" => Some(Value::Null),
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("'''hello'''", "'hello'")]
    #[case("\"\"\"world\"\"\"", "\"world\"")]
    #[case("''string''", "'string'")]
    #[case("\"\"data\"\"", "\"data\"")]
    #[case("'clean'", "'clean'")]
    #[case("numeric", "numeric")]
    #[case("", "")]
    #[case(" ", "")]
    #[case(" ' ' ", "' '")]
    #[case("'''", "'")]
    #[case("\"\"\"", "\"")]
    fn quote_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_quotes(input), expected);
    }

    #[rstest]
    #[case("42", Value::Int(42))]
    #[case("3.1415", Value::Float(3.1415))]
    #[case("-100", Value::Int(-100))]
    #[case("0.0", Value::Float(0.0))]
    #[case("00123", Value::Int(123))]
    #[case("000", Value::Int(0))]
    #[case("001.5", Value::Float(1.5))]
    #[case("1e5", Value::Float(1e5))]
    #[case(".5", Value::Float(0.5))]
    #[case("true", Value::Bool(true))]
    #[case("TRUE", Value::Bool(true))]
    #[case(" false ", Value::Bool(false))]
    #[case("null", Value::Null)]
    #[case("NULL", Value::Null)]
    #[case(" none ", Value::Null)]
    #[case("'hello'", Value::from("hello"))]
    #[case("\"world\"", Value::from("world"))]
    #[case("'42'", Value::from("42"))]
    #[case("\"3.14\"", Value::from("3.14"))]
    #[case("'''nested'''", Value::from("nested"))]
    #[case("unquoted string", Value::from("unquoted string"))]
    fn literal_conversions(#[case] token: &str, #[case] expected: Value) {
        assert_eq!(parse_literal(token), expected);
    }

    #[rstest]
    #[case("3.14.15")]
    #[case("NaN.0")]
    #[case("'unfinished")]
    #[case("x + 1")]
    #[case("system.variable")]
    #[case("$variable")]
    #[case("nullish")]
    #[case("falsehood")]
    #[case("yes")]
    #[case("{key: value}")]
    #[case("[1, 2")]
    #[case("('a',")]
    #[case("True,)")]
    fn unparseable_tokens_fall_back_to_strings(#[case] token: &str) {
        assert_eq!(parse_literal(token), Value::Str(token.trim().to_string()));
    }

    #[test]
    fn nan_and_infinity_words_stay_strings() {
        // Keeping these as strings lets the relaxed-mode NaN guard see them.
        assert_eq!(parse_literal("nan"), Value::from("nan"));
        assert_eq!(parse_literal("inf"), Value::from("inf"));
        assert_eq!(parse_literal("Infinity"), Value::from("Infinity"));
    }

    #[test]
    fn blank_input_parses_to_empty_string() {
        assert_eq!(parse_literal(""), Value::from(""));
        assert_eq!(parse_literal("  "), Value::from(""));
        assert_eq!(parse_literal("\n\t"), Value::from(""));
    }

    #[test]
    fn structural_literals() {
        assert_eq!(
            parse_literal("[1, 2, 'three']"),
            Value::List(vec![Value::Int(1), Value::Int(2), Value::from("three")])
        );
        assert_eq!(
            parse_literal("(1, 2)"),
            Value::List(vec![Value::Int(1), Value::Int(2)])
        );
        let parsed = parse_literal("{'a': 1, 'b': 'two'}");
        let Value::Map(entries) = &parsed else {
            panic!("expected a mapping, got {parsed:?}");
        };
        assert_eq!(entries.get("a"), Some(&Value::Int(1)));
        assert_eq!(entries.get("b"), Some(&Value::from("two")));
    }

    #[test]
    fn quoted_literals_preserve_non_ascii_text() {
        assert_eq!(
            parse_literal("['café', 'über']"),
            Value::List(vec![Value::from("café"), Value::from("über")])
        );
        let parsed = parse_literal("{'größe': '5µm'}");
        let Value::Map(entries) = &parsed else {
            panic!("expected a mapping, got {parsed:?}");
        };
        assert_eq!(entries.get("größe"), Some(&Value::from("5µm")));
    }

    #[test]
    fn nested_structures_parse() {
        assert_eq!(
            parse_literal("[[1, 2], [true, null]]"),
            Value::List(vec![
                Value::List(vec![Value::Int(1), Value::Int(2)]),
                Value::List(vec![Value::Bool(true), Value::Null]),
            ])
        );
    }

    #[test]
    fn non_string_values_pass_through() {
        assert_eq!(parse_token(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(parse_token(&Value::Null), Value::Null);
        assert_eq!(parse_token(&Value::Int(0)), Value::Int(0));
        assert_eq!(parse_token(&Value::Float(42.0)), Value::Float(42.0));
        assert_eq!(
            parse_token(&Value::List(vec![Value::from("1")])),
            Value::List(vec![Value::from("1")])
        );
        // String values still go through full parsing.
        assert_eq!(parse_token(&Value::from("42")), Value::Int(42));
    }

    #[rstest]
    #[case("true", true)]
    #[case("FALSE", true)]
    #[case("null", true)]
    #[case("NONE", true)]
    #[case("42", true)]
    #[case("'hello'", true)]
    #[case("\"world\"", true)]
    #[case(" ' 42 ' ", true)]
    #[case("-10", false)]
    #[case("3.14", false)]
    #[case("10.5", false)]
    #[case("variable.name", false)]
    #[case("not literal", false)]
    fn literal_classification(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_literal(token), expected);
    }

    #[rstest]
    #[case("x.y", true)]
    #[case("system.status.code", true)]
    #[case("user[id]", true)]
    #[case("data[1].value", true)]
    #[case("4.2.1", true)]
    #[case("42[id]", true)]
    #[case("42", false)]
    #[case("150.0", false)]
    #[case("-3.14", false)]
    #[case("true", false)]
    #[case("Null", false)]
    #[case("'string'", false)]
    #[case("'a.b'", false)]
    #[case("", false)]
    #[case(" ", false)]
    fn symbolic_reference_detection(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_symbolic_reference(token), expected);
    }

    #[rstest]
    #[case("123", true)]
    #[case("-100", true)]
    #[case("3.1415", true)]
    #[case("1e4", true)]
    #[case(".5", true)]
    #[case("  3.14  ", true)]
    #[case("hello", false)]
    #[case("42a", false)]
    #[case("10.5.2", false)]
    #[case("1,000", false)]
    #[case("10mm", false)]
    #[case("nan", false)]
    #[case("inf", false)]
    #[case("1e1000", false)]
    #[case("", false)]
    #[case(" ", false)]
    #[case("true", false)]
    #[case("null", false)]
    fn numeric_string_validation(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_valid_numeric_string(token), expected);
    }
}
