//! Page-wise visual diff engine.
//!
//! Compares pre-rendered baseline/actual page images pixel by pixel, applies
//! caller-defined exclusion masks first, and writes annotated diff imagery for
//! pages that differ. Rendering documents into page images and managing the
//! result directories are the caller's concern.

pub mod batch;
pub mod compositor;
pub mod config;
mod label;
pub mod mask;
pub mod page;
pub mod pixelmatch;

pub use batch::compare_all_pages;
pub use compositor::combine_images;
pub use config::CompareConfig;
pub use page::compare_page_images;
pub use pixelmatch::{DiffOptions, pixelmatch};

#[cfg(test)]
mod tests;
