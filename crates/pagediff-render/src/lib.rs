//! External collaborators for the pagediff engine: a Poppler-backed document
//! renderer and result-directory management.

pub mod config;
pub mod directory;
pub mod renderer;

pub use config::RenderConfig;
pub use directory::{DocumentSource, ResultDirectories, create_result_directories, prefixed};
pub use renderer::PopplerRenderer;
