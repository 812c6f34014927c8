//! Audio side of a run: narration synthesis, track planning and additive mixing.

/// Track planning and sample-space layout.
pub mod manifest;
/// Additive mixing and raw PCM output.
pub mod mix;
/// Speech synthesis collaborators.
pub mod narration;
