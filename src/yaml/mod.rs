//! YAML handling - diagnostics for wizard definition files

pub mod diagnostics;

pub use diagnostics::{DefinitionError, DefinitionSyntaxError, DuplicateIdError};
