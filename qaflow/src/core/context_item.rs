//! Context entries and their textual rendering.
//!
//! Web search results are not schema-checked, so a context entry is either
//! plain text or an arbitrary JSON value. When the prompt is built every entry
//! is turned into text with a catch-all stringification: text stays verbatim,
//! structured values use a generic literal form (`{'k': 'v'}`,
//! `['a', 1, True, None]`) rather than JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Write as _};

/// One entry of the accumulated context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextItem {
    /// Plain text, rendered verbatim.
    Text(String),
    /// A structured value, rendered with the generic literal form.
    Structured(Value),
}

impl ContextItem {
    /// Creates a text entry.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a structured entry.
    #[must_use]
    pub const fn structured(value: Value) -> Self {
        Self::Structured(value)
    }

    /// Returns true if this entry is structured.
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }
}

impl fmt::Display for ContextItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Structured(Value::String(text)) => f.write_str(text),
            Self::Structured(value) => write_literal(f, value),
        }
    }
}

impl From<String> for ContextItem {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ContextItem {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for ContextItem {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

/// Joins context entries into the block substituted into the prompt.
#[must_use]
pub fn render_context(items: &[ContextItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_literal(out: &mut impl fmt::Write, value: &Value) -> fmt::Result {
    match value {
        Value::Null => out.write_str("None"),
        Value::Bool(true) => out.write_str("True"),
        Value::Bool(false) => out.write_str("False"),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => write_float(out, f),
            _ => write!(out, "{n}"),
        },
        Value::String(s) => write_quoted(out, s),
        Value::Array(items) => {
            out.write_char('[')?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_literal(out, item)?;
            }
            out.write_char(']')
        }
        Value::Object(map) => {
            out.write_char('{')?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write_quoted(out, key)?;
                out.write_str(": ")?;
                write_literal(out, item)?;
            }
            out.write_char('}')
        }
    }
}

// Single quotes unless the text holds a single quote and no double quote.
fn write_quoted(out: &mut impl fmt::Write, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c if !is_printable(c) => write_escaped(out, c)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

fn write_escaped(out: &mut impl fmt::Write, c: char) -> fmt::Result {
    let code = u32::from(c);
    if code < 0x100 {
        write!(out, "\\x{code:02x}")
    } else if code < 0x1_0000 {
        write!(out, "\\u{code:04x}")
    } else {
        write!(out, "\\U{code:08x}")
    }
}

// Controls, format characters, separators other than the ASCII space, and
// private-use code points. Unassigned code points are written as-is.
fn is_printable(c: char) -> bool {
    let code = u32::from(c);
    if c == ' ' {
        return true;
    }
    !(c.is_control()
        || matches!(
            code,
            0x00A0
                | 0x00AD
                | 0x0600..=0x0605
                | 0x061C
                | 0x06DD
                | 0x070F
                | 0x0890..=0x0891
                | 0x08E2
                | 0x1680
                | 0x180E
                | 0x2000..=0x200F
                | 0x2028..=0x202F
                | 0x205F..=0x2064
                | 0x2066..=0x206F
                | 0x3000
                | 0xD800..=0xF8FF
                | 0xFEFF
                | 0xFFF9..=0xFFFB
                | 0x110BD
                | 0x110CD
                | 0x13430..=0x1343F
                | 0x1BCA0..=0x1BCA3
                | 0x1D173..=0x1D17A
                | 0xE0001
                | 0xE0020..=0xE007F
                | 0xF0000..=0xFFFFD
                | 0x10_0000..=0x10_FFFD
        ))
}

// Shortest round-trip digits; positional between 1e-4 and 1e16, otherwise
// exponent form with a signed, at least two-digit exponent (`1e+20`, `1.5e-05`).
fn write_float(out: &mut impl fmt::Write, value: f64) -> fmt::Result {
    if value.is_sign_negative() {
        out.write_char('-')?;
    }
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let point = exponent + 1;

    if (-3..=16).contains(&point) {
        let len = i32::try_from(digits.len()).unwrap_or(i32::MAX);
        if point <= 0 {
            out.write_str("0.")?;
            for _ in point..0 {
                out.write_char('0')?;
            }
            out.write_str(&digits)
        } else if point >= len {
            out.write_str(&digits)?;
            for _ in len..point {
                out.write_char('0')?;
            }
            out.write_str(".0")
        } else {
            let (whole, frac) = digits.split_at(usize::try_from(point).unwrap_or(0));
            write!(out, "{whole}.{frac}")
        }
    } else {
        let (first, rest) = digits.split_at(1);
        out.write_str(first)?;
        if !rest.is_empty() {
            write!(out, ".{rest}")?;
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(out, "e{sign}{:02}", exponent.unsigned_abs())
    }
}
