//! Input discovery and output naming

use crate::error::{common, ErrorCode, FlowError, Result};
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Files to process for `input`
///
/// A file is returned as-is. A directory is scanned for regular files whose
/// name matches `pattern`, one level deep unless `recursive`, and the result
/// is sorted by path.
pub fn collect_inputs(input: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(common::input_not_found(input));
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let matcher = Pattern::new(pattern).map_err(|e| {
        FlowError::config_with_code(
            ErrorCode::CONFIG_GENERIC,
            format!("Invalid file pattern '{pattern}'"),
            None,
        )
        .with_source(e)
    })?;

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let matched = entry
                .file_name()
                .to_str()
                .is_some_and(|name| matcher.matches(name));
            if !matched {
                trace!("Ignoring {}", entry.path().display());
            }
            matched
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(FlowError::input_with_code(
            ErrorCode::INPUT_NO_MATCHING_FILES,
            format!("No files matching '{}' in {}", pattern, input.display()),
            Some(input.to_path_buf()),
        ));
    }

    debug!("Found {} input file(s) in {}", files.len(), input.display());
    Ok(files)
}

/// `<output_dir>/[<subdir>/]<stem><suffix><.ext>`
///
/// When `source_root` is given and contains `input`, the input's directory
/// relative to the root is kept under `output_dir`, so files with the same
/// name in different subdirectories do not collide.
pub fn output_path_for(
    input: &Path,
    source_root: Option<&Path>,
    output_dir: &Path,
    suffix: &str,
) -> PathBuf {
    let subdir = source_root
        .and_then(|root| input.strip_prefix(root).ok())
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    output_dir.join(subdir).join(file_name)
}
