//! Replacing flow values with template placeholders
//!
//! [`FlowVariableizer`] applies a [`ReverseMap`](crate::config::ReverseMap) to
//! flow documents; [`placeholder`] decides which values qualify and how their
//! placeholders are named.

pub mod context;
pub mod handlers;
pub mod placeholder;
pub mod transformer;

pub use context::{ActionContext, Substitution, SubstitutionTarget, VariableizeReport};
pub use handlers::{ActionHandler, HandlerOutcome, HandlerRegistry};
pub use placeholder::{should_substitute, synthesize, Placeholder};
pub use transformer::{FlowVariableizer, Variableized};
