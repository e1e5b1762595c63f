//! Path expression tokenizer
//!
//! Turns `Parameters.Messages[*].PromptId` style expressions into an ordered
//! list of segments. Parsing never fails: anything that does not look like a
//! well-formed `[N]` or `[*]` selector is kept as part of the field name.

use std::fmt;

/// Textual form of the wildcard selector
pub const WILDCARD_TOKEN: &str = "[*]";

/// One step of a parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Member lookup in a mapping
    Field(String),
    /// Fixed position in a sequence
    Index(usize),
    /// Every element of a sequence
    Wildcard,
}

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    /// Original expression
    pub expression: String,
    segments: Vec<PathSegment>,
}

impl PathExpr {
    /// Parse a path expression
    pub fn parse(expr: &str) -> Self {
        let mut segments = Vec::new();

        for token in split_top_level(expr) {
            parse_token(token, &mut segments);
        }

        Self {
            expression: expr.to_string(),
            segments,
        }
    }

    /// Build an expression from segments, rendering its textual form
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        let mut expression = String::new();
        for segment in &segments {
            match segment {
                PathSegment::Field(name) => {
                    if !expression.is_empty() {
                        expression.push('.');
                    }
                    expression.push_str(name);
                }
                PathSegment::Index(index) => expression.push_str(&format!("[{index}]")),
                PathSegment::Wildcard => expression.push_str(WILDCARD_TOKEN),
            }
        }
        Self {
            expression,
            segments,
        }
    }

    /// Replace wildcards, outermost first, with fixed indices
    ///
    /// Wildcards left over once `indices` runs out are kept.
    pub fn pin_wildcards(&self, indices: &[usize]) -> Self {
        let mut indices = indices.iter();
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Wildcard => indices
                    .next()
                    .map_or(PathSegment::Wildcard, |index| PathSegment::Index(*index)),
                other => other.clone(),
            })
            .collect();
        Self::from_segments(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether evaluating this path can fan out into several matches
    pub fn has_wildcard(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, PathSegment::Wildcard))
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

impl From<&str> for PathExpr {
    fn from(expr: &str) -> Self {
        Self::parse(expr)
    }
}

/// Split on `.` except inside a terminated `[...]` group
fn split_top_level(expr: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_bracket = false;

    for (pos, ch) in expr.char_indices() {
        match ch {
            '[' if !in_bracket && expr[pos..].contains(']') => in_bracket = true,
            ']' if in_bracket => in_bracket = false,
            '.' if !in_bracket => {
                tokens.push(&expr[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    tokens.push(&expr[start..]);

    tokens
}

/// Parse one dot-delimited token, peeling trailing `[N]` / `[*]` selectors
fn parse_token(token: &str, segments: &mut Vec<PathSegment>) {
    let mut field = token;
    let mut selectors = Vec::new();

    while field.ends_with(']') {
        let Some(open) = field.rfind('[') else {
            break;
        };
        let inner = &field[open + 1..field.len() - 1];
        let selector = if inner == "*" {
            PathSegment::Wildcard
        } else if let Ok(index) = inner.parse::<usize>() {
            PathSegment::Index(index)
        } else {
            break;
        };
        selectors.push(selector);
        field = &field[..open];
    }

    if !field.is_empty() {
        segments.push(PathSegment::Field(field.to_string()));
    }
    segments.extend(selectors.into_iter().rev());
}

/// Parse a path expression into its segments
pub fn parse_path(expr: &str) -> Vec<PathSegment> {
    PathExpr::parse(expr).segments
}
