//! Path evaluation against a JSON tree
//!
//! Lookup misses are never errors: a missing key, a short array or a wildcard
//! over something that is not an array simply produce no value.

use super::location::{Location, Position};
use super::parser::{PathExpr, PathSegment};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Separators tried when a field lookup misses and the key may itself
/// contain characters the path syntax splits on
const REJOIN_SEPARATORS: [char; 2] = [' ', '.'];

/// A value found by [`resolve_all`], with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatch {
    /// Copy of the matched value
    pub value: Value,
    /// Concrete location relative to the node the path was evaluated against
    pub location: Location,
    /// One entry per wildcard the match went through, outermost first
    pub positions: Vec<Position>,
}

/// Resolve a wildcard-free path to a single value
///
/// Returns `None` when any step is missing, and for paths containing a
/// wildcard (use [`resolve_all`] for those).
pub fn resolve_single<'a>(node: &'a Value, path: &PathExpr) -> Option<&'a Value> {
    let segments = path.segments();
    let mut current = node;
    let mut cursor = 0;

    while cursor < segments.len() {
        match &segments[cursor] {
            PathSegment::Field(_) => {
                let map = current.as_object()?;
                let (child, _, consumed) = lookup_field(map, &segments[cursor..])?;
                current = child;
                cursor += consumed;
            }
            PathSegment::Index(index) => {
                current = current.as_array()?.get(*index)?;
                cursor += 1;
            }
            PathSegment::Wildcard => {
                trace!("Wildcard in single resolution of '{}'", path);
                return None;
            }
        }
    }

    Some(current)
}

/// Resolve a path, fanning out over every `[*]`
///
/// Results follow array order, so the n-th match of `Messages[*].PromptId`
/// is always the n-th message.
pub fn resolve_all(node: &Value, path: &PathExpr) -> Vec<PathMatch> {
    debug!("Resolving path: {}", path);

    let mut matches = Vec::new();
    let mut location = Location::new();
    let mut positions = Vec::new();
    walk(
        node,
        path.segments(),
        "",
        &mut location,
        &mut positions,
        &mut matches,
    );

    trace!("Path '{}' produced {} match(es)", path, matches.len());
    matches
}

/// Convenience wrapper parsing `expr` first
pub fn resolve_single_str<'a>(node: &'a Value, expr: &str) -> Option<&'a Value> {
    resolve_single(node, &PathExpr::parse(expr))
}

/// Convenience wrapper parsing `expr` first
pub fn resolve_all_str(node: &Value, expr: &str) -> Vec<PathMatch> {
    resolve_all(node, &PathExpr::parse(expr))
}

fn walk(
    node: &Value,
    segments: &[PathSegment],
    last_field: &str,
    location: &mut Location,
    positions: &mut Vec<Position>,
    matches: &mut Vec<PathMatch>,
) {
    let Some(segment) = segments.first() else {
        matches.push(PathMatch {
            value: node.clone(),
            location: location.clone(),
            positions: positions.clone(),
        });
        return;
    };

    match segment {
        PathSegment::Field(_) => {
            let Some(map) = node.as_object() else {
                trace!("'{}' is not an object, dropping branch", location);
                return;
            };
            let Some((child, key, consumed)) = lookup_field(map, segments) else {
                return;
            };
            location.push_key(key.as_str());
            walk(
                child,
                &segments[consumed..],
                &key,
                location,
                positions,
                matches,
            );
            location.pop();
        }
        PathSegment::Index(index) => {
            let Some(child) = node.as_array().and_then(|arr| arr.get(*index)) else {
                return;
            };
            location.push_index(*index);
            walk(
                child,
                &segments[1..],
                last_field,
                location,
                positions,
                matches,
            );
            location.pop();
        }
        PathSegment::Wildcard => {
            let Some(items) = node.as_array() else {
                trace!("Wildcard over non-array at '{}'", location);
                return;
            };
            for (index, child) in items.iter().enumerate() {
                location.push_index(index);
                positions.push(Position {
                    field: last_field.to_string(),
                    index,
                });
                walk(
                    child,
                    &segments[1..],
                    last_field,
                    location,
                    positions,
                    matches,
                );
                positions.pop();
                location.pop();
            }
        }
    }
}

/// Look up the field at the head of `segments`
///
/// On a miss, adjacent field segments are rejoined (with a space, then with a
/// dot) and retried, so keys like `Play prompt.wav` still resolve. Returns the
/// child, the key actually matched and how many segments it consumed.
fn lookup_field<'a>(
    map: &'a Map<String, Value>,
    segments: &[PathSegment],
) -> Option<(&'a Value, String, usize)> {
    let PathSegment::Field(first) = segments.first()? else {
        return None;
    };

    match map.get(first.as_str()) {
        Some(value) => Some((value, first.clone(), 1)),
        None => rejoin_lookup(map, first, &segments[1..]),
    }
}

fn rejoin_lookup<'a>(
    map: &'a Map<String, Value>,
    first: &str,
    rest: &[PathSegment],
) -> Option<(&'a Value, String, usize)> {
    for separator in REJOIN_SEPARATORS {
        let mut candidate = first.to_string();
        for (offset, segment) in rest.iter().enumerate() {
            let PathSegment::Field(next) = segment else {
                break;
            };
            candidate.push(separator);
            candidate.push_str(next);
            if let Some(value) = map.get(candidate.as_str()) {
                trace!("Rejoined key '{}'", candidate);
                return Some((value, candidate, offset + 2));
            }
        }
    }
    None
}


#[cfg(test)]
#[path = "navigator_tests.rs"]
mod navigator_tests;
