//! Configuration: block definitions, the reverse map built from them, and
//! run settings.

pub mod jsonc;
pub mod reverse_map;
pub mod rules;
pub mod settings;

pub use jsonc::strip_comments;
pub use reverse_map::{ReverseMap, VariableRule};
pub use rules::{BlockConfig, BlockDefinitions, MetadataPathKey, VariableDefinition};
pub use settings::Settings;

use crate::error::Result;
use std::path::Path;

/// Load a block definitions file and flatten it into a reverse map
pub async fn load_reverse_map(rules_path: &Path) -> Result<ReverseMap> {
    let definitions = BlockDefinitions::load(rules_path).await?;
    Ok(ReverseMap::build(&definitions))
}
