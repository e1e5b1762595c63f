//! Writes at concrete locations
//!
//! Missing object keys along the way are created as empty objects. Anything
//! else that does not fit the location (an index into a non-array, an index
//! past the end, a key into a scalar) is a caller bug and is reported.

use super::location::{Location, LocationStep};
use super::parser::PathExpr;
use super::PathError;
use serde_json::{Map, Value};
use tracing::trace;

/// Write `value` at `location` below `node`
pub fn write(node: &mut Value, location: &Location, value: Value) -> Result<(), PathError> {
    let steps = location.steps();
    let Some((last, parents)) = steps.split_last() else {
        return Err(PathError::EmptyLocation);
    };

    let mut current = node;
    for (depth, step) in parents.iter().enumerate() {
        current = descend(current, step, location, depth)?;
    }

    trace!("Writing at '{}'", location);
    match last {
        LocationStep::Key(key) => {
            let map = current.as_object_mut().ok_or_else(|| PathError::NotAMapping {
                location: location.prefix(parents.len()).to_string(),
            })?;
            map.insert(key.clone(), value);
        }
        LocationStep::Index(index) => {
            let slot = index_mut(current, *index, location, parents.len())?;
            *slot = value;
        }
    }

    Ok(())
}

/// Parse `expr` as a concrete location and write `value` there
pub fn write_path(node: &mut Value, expr: &str, value: Value) -> Result<(), PathError> {
    let location = Location::try_from(&PathExpr::parse(expr))?;
    write(node, &location, value)
}

fn descend<'a>(
    current: &'a mut Value,
    step: &LocationStep,
    location: &Location,
    depth: usize,
) -> Result<&'a mut Value, PathError> {
    match step {
        LocationStep::Key(key) => {
            let map = current.as_object_mut().ok_or_else(|| PathError::NotAMapping {
                location: location.prefix(depth).to_string(),
            })?;
            Ok(map
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Map::new())))
        }
        LocationStep::Index(index) => index_mut(current, *index, location, depth),
    }
}

fn index_mut<'a>(
    current: &'a mut Value,
    index: usize,
    location: &Location,
    depth: usize,
) -> Result<&'a mut Value, PathError> {
    let items = current
        .as_array_mut()
        .ok_or_else(|| PathError::NotASequence {
            location: location.prefix(depth).to_string(),
        })?;
    let len = items.len();
    items.get_mut(index).ok_or_else(|| PathError::IndexOutOfRange {
        location: location.prefix(depth).to_string(),
        index,
        len,
    })
}
