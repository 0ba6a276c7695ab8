//! The binding mini-language.
//!
//! ```text
//! binding     := verb ":" path
//! path        := segment ("{" placeholder "}" segment)*
//! placeholder := fieldname ("." fieldname)*
//! ```
//!
//! Everything after the first space of the option string is reserved and
//! ignored. Paths may contain any character except `{` (which opens a
//! placeholder); `:` after the first one and `}` outside a placeholder are
//! plain literal text.

use crate::error::GrammarError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSpec {
    /// Verb as written; see [`BindingSpec::http_verb`].
    pub verb: String,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(FieldPath),
}

/// Dotted field path of a placeholder, e.g. `user.id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn components(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl BindingSpec {
    pub fn http_verb(&self) -> String {
        self.verb.to_ascii_uppercase()
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &FieldPath> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(path) => Some(path),
            Segment::Literal(_) => None,
        })
    }

    /// The path template with placeholders rendered back as `{a.b}`.
    pub fn template(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(path) => {
                    out.push('{');
                    out.push_str(&path.to_string());
                    out.push('}');
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum State {
    Verb,
    PathLiteral { start: usize },
    Placeholder { open: usize },
}

pub fn parse_binding(raw: &str) -> Result<BindingSpec, GrammarError> {
    let binding = raw.split_once(' ').map_or(raw, |(head, _)| head);

    let mut state = State::Verb;
    let mut verb = "";
    let mut segments = Vec::new();

    for (offset, ch) in binding.char_indices() {
        state = match (state, ch) {
            (State::Verb, ':') => {
                verb = &binding[..offset];
                check_verb(verb)?;
                State::PathLiteral { start: offset + 1 }
            }
            (State::Verb, _) => State::Verb,
            (State::PathLiteral { start }, '{') => {
                push_literal(&mut segments, &binding[start..offset]);
                State::Placeholder { open: offset }
            }
            (State::PathLiteral { start }, _) => State::PathLiteral { start },
            (State::Placeholder { open }, '}') => {
                let path = parse_placeholder(&binding[open + 1..offset], open)?;
                segments.push(Segment::Placeholder(path));
                State::PathLiteral { start: offset + 1 }
            }
            (State::Placeholder { .. }, '{') => {
                return Err(GrammarError::NestedPlaceholder { offset });
            }
            (State::Placeholder { open }, _) => State::Placeholder { open },
        };
    }

    match state {
        State::Verb => return Err(GrammarError::MissingVerbDelimiter),
        State::Placeholder { open } => {
            return Err(GrammarError::UnterminatedPlaceholder { offset: open });
        }
        State::PathLiteral { start } => push_literal(&mut segments, &binding[start..]),
    }

    if segments.is_empty() {
        return Err(GrammarError::EmptyPath);
    }

    Ok(BindingSpec {
        verb: verb.to_string(),
        segments,
    })
}

fn check_verb(verb: &str) -> Result<(), GrammarError> {
    if verb.is_empty() {
        return Err(GrammarError::EmptyVerb);
    }
    if !verb.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(GrammarError::InvalidVerb(verb.to_string()));
    }
    Ok(())
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
}

fn parse_placeholder(body: &str, open: usize) -> Result<FieldPath, GrammarError> {
    // Quote artifacts left over from option string escaping.
    let body = body.trim_matches(|c| c == '"' || c == '}');
    if body.is_empty() {
        return Err(GrammarError::EmptyPlaceholder { offset: open });
    }

    let components: Vec<String> = body.split('.').map(str::to_string).collect();
    if components.iter().any(String::is_empty) {
        return Err(GrammarError::EmptyPathComponent {
            offset: open,
            placeholder: body.to_string(),
        });
    }
    Ok(FieldPath(components))
}
