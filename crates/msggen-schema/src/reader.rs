//! Line-oriented tokenizer shared by the message and address schemas.
//!
//! The marker character is overloaded at the surface (`*Name` opens, `*`
//! closes) but the reader resolves it once into [`Directive::Open`] and
//! [`Directive::Close`], so later stages never look at token counts.

use msggen_core::{SchemaError, SchemaResult, SourceLocation, SyntaxConfig};

/// One meaningful schema line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Marker carrying a name: opens an interface or address region.
    Open(String),
    /// Bare marker: closes the open interface or region.
    Close,
    /// Anything else, trimmed.
    Declaration(String),
}

/// A directive with the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub location: SourceLocation,
    pub directive: Directive,
}

/// Splits schema text into directives, skipping blank and comment lines.
pub struct SchemaReader<'a> {
    file: String,
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    syntax: SyntaxConfig,
}

impl<'a> SchemaReader<'a> {
    pub fn new(file: impl Into<String>, text: &'a str, syntax: &SyntaxConfig) -> Self {
        Self {
            file: file.into(),
            lines: text.lines().enumerate(),
            syntax: syntax.clone(),
        }
    }

    fn classify(&self, location: SourceLocation, raw: &str) -> Option<SchemaResult<Line>> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(self.syntax.comment) {
            return None;
        }

        let directive = match line.strip_prefix(self.syntax.marker) {
            None => Directive::Declaration(line.to_string()),
            Some(rest) => {
                // A bare marker carries no text; `* Name` is not an open.
                if rest.is_empty() {
                    Directive::Close
                } else if rest.starts_with(char::is_whitespace) {
                    return Some(Err(SchemaError::syntax(
                        location,
                        format!(
                            "close marker followed by unexpected text '{}'",
                            rest.trim()
                        ),
                    )));
                } else {
                    let mut tokens = rest.split_whitespace();
                    let name = tokens.next().unwrap_or_default();
                    if let Some(extra) = tokens.next() {
                        return Some(Err(SchemaError::syntax(
                            location,
                            format!("unexpected token '{extra}' after name '{name}'"),
                        )));
                    }
                    Directive::Open(name.to_string())
                }
            }
        };

        Some(Ok(Line {
            location,
            directive,
        }))
    }
}

impl Iterator for SchemaReader<'_> {
    type Item = SchemaResult<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, raw) = self.lines.next()?;
            let location = SourceLocation::new(self.file.clone(), index + 1);
            if let Some(item) = self.classify(location, raw) {
                return Some(item);
            }
        }
    }
}
