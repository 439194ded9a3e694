use std::path::PathBuf;

use clap::Parser;
use pagediff_compare::config::DEFAULT_THRESHOLD;
use pagediff_render::config::DEFAULT_DPI;

#[derive(Debug, Parser)]
#[command(
    name = "pagediff",
    about = "Render two PDF documents and compare them page by page",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Baseline document
    pub baseline: PathBuf,

    /// Actual document to compare against the baseline
    pub actual: PathBuf,

    /// Directory for rendered pages and diff artifacts
    #[arg(long = "result-dir", value_name = "DIR")]
    pub result_dir: Option<PathBuf>,

    /// Rendering resolution
    #[arg(long = "dpi", default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Per-channel matching sensitivity on a 0-1 scale
    #[arg(long = "threshold", default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Count anti-aliased edge pixels as differences
    #[arg(long = "include-aa")]
    pub include_aa: bool,

    /// Write three-panel baseline|actual|difference images instead of plain
    /// diff images
    #[arg(long = "combine")]
    pub combine: bool,

    /// Skip a page entirely (repeatable)
    #[arg(long = "exclude-page", id = "exclude_pages", value_name = "PAGE")]
    pub exclude_pages: Vec<u32>,

    /// JSON file with mask rectangles zeroed out before comparison
    #[arg(long = "masks-file", value_name = "FILE")]
    pub masks_file: Option<PathBuf>,

    /// Print the verdict as JSON
    #[arg(long = "json")]
    pub json: bool,
}
