use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
        audio: None,
    }
}

#[test]
fn begin_rejects_odd_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(dir.path().join("out.mp4")));
    assert!(matches!(
        sink.begin(cfg(101, 100)),
        Err(VersusError::Validation(_))
    ));
    assert!(!dir.path().join("out.mp4").exists());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("unused.mp4"));
    let frame = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 16],
    };
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn refuses_to_overwrite_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("exists.mp4");
    std::fs::write(&out, b"keep").unwrap();
    let mut opts = FfmpegSinkOpts::new(&out);
    opts.overwrite = false;
    let mut sink = FfmpegSink::new(opts);
    assert!(sink.begin(cfg(4, 4)).is_err());
    assert_eq!(std::fs::read(&out).unwrap(), b"keep");
}

#[test]
fn encodes_small_clip_when_ffmpeg_is_available() {
    if !is_tool_on_path("ffmpeg") {
        eprintln!("skipping: ffmpeg not on PATH");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/clip.mp4");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::intermediate(&out));
    sink.begin(cfg(16, 16)).unwrap();
    let frame = FrameRGBA {
        width: 16,
        height: 16,
        data: [40u8, 80, 120, 255].repeat(16 * 16),
    };
    for i in 0..5 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    assert!(sink.push_frame(FrameIndex(2), &frame).is_err());
    sink.end().unwrap();
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}
