/// Color-balance transforms.
pub mod color;
/// Font resolution and text layout.
pub mod font;
/// `ffmpeg`/`ffprobe` media helpers.
pub mod media;
/// Portrait lookup and preparation.
pub mod portrait;
