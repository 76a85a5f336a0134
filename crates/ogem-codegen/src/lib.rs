#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Provider variant generator for Ogem
//!
//! The Vertex AI hosted providers (`vertex`, `vclaude`) share almost all of
//! their code with the Studio and Claude providers. Instead of keeping two
//! copies in sync by hand, the variants are derived from the originals with an
//! ordered list of literal substitutions.

mod batch;
pub mod error;
mod recipe;
pub mod recipes;

pub use batch::process_files;
pub use error::{CodegenError, Result};
pub use recipe::{GENERATED_BANNER, Recipe, Substitution};
