//! Serializer — converts a [`Value`] tree into compact document text.
//!
//! Output is deterministic and contains no insignificant whitespace:
//!
//! - Object keys appear in stored insertion order
//! - Integers print as plain digits; floats always carry a `.` so they parse
//!   back as floats (`42.0`, never `42`)
//! - Strings escape exactly `\`, `"`, newline, carriage return and tab, the
//!   reverse of the parser's escape set; everything else is emitted verbatim
//!
//! # Example
//! ```
//! use metrics_project::{stringify, Map, Value};
//! let mut map = Map::new();
//! map.insert("name", Value::from("Alice"));
//! map.insert("scores", Value::from(vec![Value::from(95i64), Value::from(8.5)]));
//! assert_eq!(stringify(&Value::Object(map)), r#"{"name":"Alice","scores":[95,8.5]}"#);
//! ```

use crate::value::{Map, Number, Value};

/// Serialize a value tree to compact text.
pub fn stringify(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

/// Top-level dispatch on the value variant.
fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(n, out),
        Value::String(s) => write_string(s, out),
        Value::Array(items) => write_array(items, out),
        Value::Object(map) => write_object(map, out),
    }
}

fn write_object(map: &Map, out: &mut String) {
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(key, out);
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

fn write_array(items: &[Value], out: &mut String) {
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(item, out);
    }
    out.push(']');
}

/// Format a number so the parser reads back the same variant:
/// - `Int` → decimal digits with optional `-`
/// - `Float` → shortest round-trip digits, never exponent notation, with `.0`
///   appended to whole values
/// - Non-finite floats have no literal form and become `null`
fn write_number(n: &Number, out: &mut String) {
    match *n {
        Number::Int(i) => out.push_str(&i.to_string()),
        Number::Float(f) if !f.is_finite() => out.push_str("null"),
        Number::Float(f) => {
            // `Display` for f64 never uses exponents, unlike `Debug`
            let s = f.to_string();
            out.push_str(&s);
            if !s.contains('.') {
                out.push_str(".0");
            }
        }
    }
}

/// Emit a quoted string with the five recognized escapes.
fn write_string(s: &str, out: &mut String) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
