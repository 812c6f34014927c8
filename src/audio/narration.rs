use crate::config::NarrationConfig;
use crate::foundation::error::{VersusError, VersusResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Text-to-speech collaborator producing a WAV file.
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak `text` into `out_wav`.
    fn synthesize(&self, text: &str, out_wav: &Path) -> VersusResult<()>;
}

/// Synthesizer backed by an `espeak`-compatible executable
/// (`<program> -v <voice> -w <out.wav> <text>`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSynthesizer {
    program: String,
    voice: String,
}

impl CommandSynthesizer {
    /// Create a synthesizer running `program` with `voice`.
    pub fn new(program: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice: voice.into(),
        }
    }

    /// Synthesizer described by the narration configuration.
    pub fn from_config(cfg: &NarrationConfig) -> Self {
        Self::new(cfg.program.clone(), cfg.voice.clone())
    }

    /// Executable name.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn synthesize(&self, text: &str, out_wav: &Path) -> VersusResult<()> {
        if text.trim().is_empty() {
            return Err(VersusError::validation("narration text must be non-empty"));
        }
        let out = Command::new(&self.program)
            .args(["-v", &self.voice, "-w"])
            .arg(out_wav)
            .arg(text)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                VersusError::encoding(format!(
                    "failed to run speech synthesizer '{}': {e}",
                    self.program
                ))
            })?;
        if !out.status.success() {
            return Err(VersusError::encoding(format!(
                "speech synthesizer '{}' exited with status {}: {}",
                self.program,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )));
        }
        if !out_wav.is_file() {
            return Err(VersusError::encoding(format!(
                "speech synthesizer '{}' produced no output",
                self.program
            )));
        }
        tracing::debug!(program = %self.program, out = %out_wav.display(), "narration synthesized");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/narration.rs"]
mod tests;
