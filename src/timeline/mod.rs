/// Overlay layer planning.
pub mod layers;
/// Counter interpolation and per-frame state derivation.
pub mod schedule;
