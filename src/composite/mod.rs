//! Timeline compositing: overlay mattes, blending, the run state machine and the compositor.

/// Premultiplied source-over at an offset.
pub mod blend;
/// Chroma-key matte removal.
pub mod chroma;
/// The compositor run.
pub mod compositor;
/// Run lifecycle.
pub mod state;
