use crate::foundation::error::{VersusError, VersusResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Internal audio mixing sample rate used across decode/mix/encode.
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Basic metadata about a source video file.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSourceInfo {
    /// Path used for probing/decoding.
    pub source_path: PathBuf,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Container duration in seconds, when reported.
    pub duration_secs: Option<f64>,
    /// Whether ffprobe detected at least one audio stream.
    pub has_audio: bool,
}

/// Decoded interleaved floating-point PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved `f32` PCM samples.
    pub interleaved_f32: Vec<f32>,
}

/// Return `true` when `program -version` runs successfully.
pub fn is_tool_on_path(program: &str) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when both `ffmpeg` and `ffprobe` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path("ffmpeg") && is_tool_on_path("ffprobe")
}

/// Probe source video metadata through `ffprobe`.
pub fn probe_video(source_path: &Path) -> VersusResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    if !source_path.is_file() {
        return Err(VersusError::asset_not_found("video", source_path));
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| VersusError::encoding(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(VersusError::encoding(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| VersusError::encoding(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            VersusError::encoding(format!(
                "no video stream found in '{}'",
                source_path.display()
            ))
        })?;
    let width = video_stream
        .width
        .ok_or_else(|| VersusError::encoding("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| VersusError::encoding("missing video height from ffprobe"))?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video_stream.duration.as_deref())
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        duration_secs,
        has_audio,
    })
}

/// Decode audio from a media source to stereo interleaved `f32` PCM.
///
/// Sources without an audio stream yield empty PCM.
pub fn decode_audio_f32_stereo(path: &Path, sample_rate: u32) -> VersusResult<AudioPcm> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "2",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| VersusError::encoding(format!("failed to run ffmpeg for audio decode: {e}")))?;

    if !out.status.success() {
        let msg = String::from_utf8_lossy(&out.stderr);
        if msg.contains("Stream specifier")
            || msg.contains("matches no streams")
            || msg.contains("does not contain any stream")
        {
            return Ok(AudioPcm {
                sample_rate,
                channels: 2,
                interleaved_f32: Vec::new(),
            });
        }
        return Err(VersusError::encoding(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            msg.trim()
        )));
    }

    if !out.stdout.len().is_multiple_of(4) {
        return Err(VersusError::encoding(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let interleaved_f32 = out
        .stdout
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        channels: 2,
        interleaved_f32,
    })
}

/// Decoding window and output geometry for a [`VideoFrameReader`].
#[derive(Clone, Debug, PartialEq)]
pub struct VideoReadOpts {
    /// Seek offset into the source, in seconds.
    pub start_secs: f64,
    /// Maximum decoded duration, in seconds.
    pub duration_secs: Option<f64>,
    /// Resample to this constant frame rate.
    pub fps: u32,
    /// Output frame size.
    pub width: u32,
    /// Output frame size.
    pub height: u32,
}

/// Streams decoded straight-alpha RGBA8 frames from a video file through `ffmpeg`.
///
/// The decoder process is killed if the reader is dropped before [`VideoFrameReader::finish`].
pub struct VideoFrameReader {
    source: PathBuf,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    frame_len: usize,
    exhausted: bool,
}

impl VideoFrameReader {
    /// Spawn the decoder.
    pub fn open(source: &Path, opts: &VideoReadOpts) -> VersusResult<Self> {
        if opts.width == 0 || opts.height == 0 || opts.fps == 0 {
            return Err(VersusError::validation(
                "video reader size and fps must be non-zero",
            ));
        }
        if !source.is_file() {
            return Err(VersusError::asset_not_found("video", source));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .args(["-v", "error"]);
        if opts.start_secs > 0.0 {
            cmd.args(["-ss", &format!("{:.6}", opts.start_secs)]);
        }
        if let Some(d) = opts.duration_secs {
            cmd.args(["-t", &format!("{:.6}", d.max(0.0))]);
        }
        cmd.arg("-i").arg(source).args([
            "-an",
            "-vf",
            &format!("fps={},scale={}:{}", opts.fps, opts.width, opts.height),
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "pipe:1",
        ]);

        let mut child = cmd.spawn().map_err(|e| {
            VersusError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VersusError::encoding("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VersusError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        Ok(Self {
            source: source.to_path_buf(),
            child: Some(child),
            stdout: Some(stdout),
            stderr_drain: Some(stderr_drain),
            frame_len: (opts.width as usize) * (opts.height as usize) * 4,
            exhausted: false,
        })
    }

    /// Byte length of one frame.
    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Fill `buf` with the next frame. Returns `false` once the stream is exhausted.
    pub fn read_frame(&mut self, buf: &mut [u8]) -> VersusResult<bool> {
        if buf.len() != self.frame_len {
            return Err(VersusError::validation(
                "video reader buffer must hold exactly one frame",
            ));
        }
        if self.exhausted {
            return Ok(false);
        }
        let Some(stdout) = self.stdout.as_mut() else {
            return Ok(false);
        };
        let mut filled = 0;
        while filled < buf.len() {
            let n = stdout.read(&mut buf[filled..]).map_err(|e| {
                VersusError::encoding(format!(
                    "failed to read frames of '{}': {e}",
                    self.source.display()
                ))
            })?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled < buf.len() {
            // A truncated trailing frame is dropped.
            self.exhausted = true;
            return Ok(false);
        }
        Ok(true)
    }

    /// Wait for the decoder and surface its exit status.
    pub fn finish(mut self) -> VersusResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        if !self.exhausted {
            // Remaining output is unwanted; stop the decoder instead of draining it.
            let _ = child.kill();
            let _ = child.wait();
            return Ok(());
        }
        let status = child
            .wait()
            .map_err(|e| VersusError::encoding(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| VersusError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| VersusError::encoding(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(VersusError::encoding(format!(
                "ffmpeg decode of '{}' exited with status {}: {}",
                self.source.display(),
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl Drop for VideoFrameReader {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
