//! Shared domain models for the pagediff workspace.
//!
//! This crate centralizes lightweight data structures used across the compare
//! engine, the renderer, and the CLI. Keep it backend-agnostic and avoid heavy
//! dependencies so all crates can depend on it without pulling image codecs or
//! subprocess plumbing.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type PageDiffResult<T> = Result<T, PageDiffError>;

/// An owned RGBA8 raster page.
///
/// Produced by the decode step, mutated in place only by the mask applier
/// (which writes both the baseline and the actual buffer identically) and
/// otherwise treated as immutable.
#[derive(Clone)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RasterImage {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> PageDiffResult<Self> {
        let required = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| PageDiffError::InvalidImage {
                reason: "calculated RGBA length overflowed".into(),
            })?;
        if data.len() != required {
            return Err(PageDiffError::InvalidImage {
                reason: format!(
                    "RGBA buffer is {} bytes, expected {} for {}x{}",
                    data.len(),
                    required,
                    width,
                    height
                ),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Fill applied inside a mask rectangle. RGB is always zeroed; the variant
/// decides the alpha byte.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskFill {
    #[default]
    Black,
    Transparent,
}

impl MaskFill {
    pub fn alpha(self) -> u8 {
        match self {
            MaskFill::Black => 255,
            MaskFill::Transparent => 0,
        }
    }
}

/// A caller-supplied rectangle excluded from diffing.
///
/// `page_number` 0 targets every page; otherwise the 1-based page it names.
/// Coordinates are in image pixels, may be fractional or out of range, and
/// are clamped to the image bounds at apply time.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MaskRegion {
    pub page_number: u32,
    #[serde(default)]
    pub fill: MaskFill,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl MaskRegion {
    pub fn applies_to(&self, page: u32) -> bool {
        self.page_number == 0 || self.page_number == page
    }
}

/// Result of comparing one baseline/actual page pair.
#[derive(Clone, Debug, Serialize)]
pub struct PageComparisonOutcome {
    pub page_index: u32,
    pub equal: bool,
    pub diff_pixel_count: u64,
    pub diff_image_path: Option<PathBuf>,
}

/// The externally visible result of one document comparison run.
#[derive(Clone, Debug, Serialize)]
pub struct ComparisonVerdict {
    pub passed: bool,
    pub message: String,
    pub excluded_pages: Vec<u32>,
    pub different_pages: Vec<u32>,
}

#[derive(Debug, Error)]
pub enum PageDiffError {
    #[error("file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error(
        "page {page}: images must have the same dimensions: \
         baseline={baseline_width}x{baseline_height} actual={actual_width}x{actual_height}"
    )]
    DimensionMismatch {
        page: u32,
        baseline_width: u32,
        baseline_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("image {page} not found in baseline or actual directory")]
    PageNotFound { page: u32 },

    #[error("failed to create the combined image")]
    CompositionFailure,

    #[error("failed to initialize renderer: {message}")]
    RenderInit { message: String },

    #[error("{context}: {message}")]
    Render { context: String, message: String },

    #[error("page {page}: failed to decode {document} image: {message}")]
    Decode {
        page: u32,
        document: &'static str,
        message: String,
    },

    #[error("page {page}: failed to encode diff image: {message}")]
    Encode { page: u32, message: String },

    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PageDiffError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn page_not_found(page: u32) -> Self {
        Self::PageNotFound { page }
    }

    pub fn render_init(message: impl Into<String>) -> Self {
        Self::RenderInit {
            message: message.into(),
        }
    }

    pub fn render(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn decode(page: u32, document: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            page,
            document,
            message: message.into(),
        }
    }

    pub fn encode(page: u32, message: impl Into<String>) -> Self {
        Self::Encode {
            page,
            message: message.into(),
        }
    }
}
