//! Fully resolved document locations

use super::parser::{PathExpr, PathSegment};
use super::PathError;
use std::fmt;

/// One step of a concrete location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStep {
    Key(String),
    Index(usize),
}

/// A wildcard-free route from some node to a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    steps: Vec<LocationStep>,
}

/// Where a wildcard fan-out landed: the array's field name and the element index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Name of the field holding the array, empty when the array was the current node
    pub field: String,
    /// Zero-based element index
    pub index: usize,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location rooted at a chain of object keys
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: keys
                .into_iter()
                .map(|key| LocationStep::Key(key.into()))
                .collect(),
        }
    }

    pub fn steps(&self) -> &[LocationStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.steps.push(LocationStep::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.steps.push(LocationStep::Index(index));
    }

    pub fn pop(&mut self) -> Option<LocationStep> {
        self.steps.pop()
    }

    /// Append `other` below this location
    pub fn join(&self, other: &Location) -> Location {
        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Location { steps }
    }

    /// Builder-style key step
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.push_key(key);
        self
    }

    /// Builder-style index step
    pub fn index(mut self, index: usize) -> Self {
        self.push_index(index);
        self
    }

    /// Prefix of the first `len` steps
    pub(crate) fn prefix(&self, len: usize) -> Location {
        Location {
            steps: self.steps[..len.min(self.steps.len())].to_vec(),
        }
    }
}

impl TryFrom<&PathExpr> for Location {
    type Error = PathError;

    fn try_from(expr: &PathExpr) -> Result<Self, Self::Error> {
        let mut location = Location::new();
        for segment in expr.segments() {
            match segment {
                PathSegment::Field(name) => location.push_key(name.clone()),
                PathSegment::Index(index) => location.push_index(*index),
                PathSegment::Wildcard => {
                    return Err(PathError::WildcardInLocation {
                        expression: expr.expression.clone(),
                    })
                }
            }
        }
        Ok(location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                LocationStep::Key(key) if i == 0 => write!(f, "{key}")?,
                LocationStep::Key(key) => write!(f, ".{key}")?,
                LocationStep::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
