//! Minimal `{name}` prompt templates.
//!
//! Placeholders are substituted in a single pass, so a variable value that
//! itself contains `{...}` is inserted literally. `{{` and `}}` escape braces.

use crate::errors::QaflowError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses a template string.
    pub fn from_template(template: &str) -> Result<Self, QaflowError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(QaflowError::Template(format!(
                            "unclosed placeholder starting at byte {pos}"
                        )));
                    }
                    let name = name.trim();
                    if name.is_empty() || name.contains('{') {
                        return Err(QaflowError::Template(format!(
                            "invalid placeholder at byte {pos}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name.to_string()));
                }
                '}' => {
                    return Err(QaflowError::Template(format!(
                        "single '}}' at byte {pos}"
                    )));
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Names of the placeholders, in order of first appearance.
    #[must_use]
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Renders the template. Every placeholder must have a value.
    pub fn format(&self, variables: &[(&str, &str)]) -> Result<String, QaflowError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(name) => {
                    let value = variables
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| {
                            QaflowError::Template(format!("missing variable '{name}'"))
                        })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
