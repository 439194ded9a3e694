use pagediff_types::MaskRegion;

pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_INCLUDE_AA: bool = false;

/// Configuration for one comparison run, shared by every page.
#[derive(Clone, Debug)]
pub struct CompareConfig {
    /// Per-channel perceptual sensitivity on a 0-1 scale.
    pub threshold: f64,
    /// Whether anti-aliased edge pixels count as differences.
    pub include_aa: bool,
    /// Write a three-panel baseline|actual|difference image instead of the
    /// plain diff image.
    pub combine_images: bool,
    /// 1-based page numbers skipped entirely.
    pub excluded_pages: Vec<u32>,
    pub masks: Vec<MaskRegion>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            include_aa: DEFAULT_INCLUDE_AA,
            combine_images: false,
            excluded_pages: Vec::new(),
            masks: Vec::new(),
        }
    }
}
