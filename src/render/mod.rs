/// Frame types: renderer input state and output raster.
pub mod frame;
pub(crate) mod paint;
/// Ordered base-clip rendering.
pub mod pipeline;
/// The frame renderer.
pub mod renderer;
