pub const DEFAULT_DPI: u32 = 150;

/// Rasterization settings passed to the renderer.
#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    pub dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { dpi: DEFAULT_DPI }
    }
}
