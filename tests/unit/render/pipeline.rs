use super::*;
use crate::assets::font::resolve_font_path;
use crate::assets::portrait::{Portrait, PortraitStore};
use crate::config::VideoConfig;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Canvas;
use crate::theme;

fn solid_portrait() -> Portrait {
    let n = (theme::PORTRAIT_SIZE * theme::PORTRAIT_SIZE) as usize;
    Portrait {
        width: theme::PORTRAIT_SIZE,
        height: theme::PORTRAIT_SIZE,
        rgba8_premul: Arc::new([90, 90, 90, 255].repeat(n)),
    }
}

fn setup() -> Option<(Arc<RenderResources>, AnimationSchedule, ComparisonSpec)> {
    let font = Arc::new(std::fs::read(resolve_font_path(None).ok()?).ok()?);
    let video = VideoConfig {
        width: 240,
        height: 400,
        fps: 2,
        total_duration: 10,
        mark_start: 8.0,
    };
    let spec = ComparisonSpec::new("Goals", "Messi", "Ronaldo", 12, 9).unwrap();
    let mut store = PortraitStore::new();
    store.insert("Messi", solid_portrait());
    store.insert("Ronaldo", solid_portrait());
    let canvas = Canvas {
        width: video.width,
        height: video.height,
    };
    let res = RenderResources::new(canvas, font, &store, &["Messi", "Ronaldo"]).unwrap();
    Some((Arc::new(res), AnimationSchedule::new(&video).unwrap(), spec))
}

#[test]
fn sequential_render_pushes_every_frame_in_order() {
    let Some((res, schedule, spec)) = setup() else {
        return;
    };
    let mut sink = InMemorySink::new();
    let stats = render_base_clip(
        res,
        &schedule,
        &spec,
        &mut sink,
        &RenderThreading::default(),
        &CancelToken::new(),
    )
    .unwrap();

    assert!(sink.is_ended());
    assert_eq!(sink.frames().len(), 20);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (240, 400));
    }
    assert_eq!(stats.frames_total, 20);
    assert_eq!(stats.frames_rendered + stats.frames_elided, 20);
    // The first five seconds all show zeroed counters.
    assert!(stats.frames_elided >= 9);
    assert_eq!(sink.frames()[0].1, sink.frames()[9].1);
}

#[test]
fn elision_can_be_disabled() {
    let Some((res, schedule, spec)) = setup() else {
        return;
    };
    let mut sink = InMemorySink::new();
    let threading = RenderThreading {
        static_frame_elision: false,
        ..RenderThreading::default()
    };
    let stats =
        render_base_clip(res, &schedule, &spec, &mut sink, &threading, &CancelToken::new())
            .unwrap();
    assert_eq!(stats.frames_rendered, 20);
    assert_eq!(stats.frames_elided, 0);
}

#[test]
fn parallel_matches_sequential() {
    let Some((res, schedule, spec)) = setup() else {
        return;
    };
    let mut seq = InMemorySink::new();
    render_base_clip(
        Arc::clone(&res),
        &schedule,
        &spec,
        &mut seq,
        &RenderThreading::default(),
        &CancelToken::new(),
    )
    .unwrap();

    let mut par = InMemorySink::new();
    let threading = RenderThreading {
        parallel: true,
        chunk_size: 7,
        threads: Some(2),
        static_frame_elision: true,
    };
    render_base_clip(res, &schedule, &spec, &mut par, &threading, &CancelToken::new()).unwrap();

    assert_eq!(seq.frames(), par.frames());
}

#[test]
fn cancelled_token_stops_before_any_frame() {
    let Some((res, schedule, spec)) = setup() else {
        return;
    };
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut sink = InMemorySink::new();
    let err = render_base_clip(
        res,
        &schedule,
        &spec,
        &mut sink,
        &RenderThreading::default(),
        &cancel,
    )
    .unwrap_err();
    assert!(matches!(err, VersusError::Cancelled));
    assert!(sink.frames().is_empty());
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
}

#[test]
fn chunk_size_is_capped_by_reorder_budget() {
    let frame = 1080 * 1920 * 4;
    assert_eq!(normalized_chunk_size(64, frame), 16);
    assert_eq!(normalized_chunk_size(0, frame), 1);
    assert_eq!(normalized_chunk_size(8, 4), 8);
}

#[test]
fn threading_defaults_from_empty_json() {
    let t: RenderThreading = serde_json::from_str("{}").unwrap();
    assert_eq!(t, RenderThreading::default());
    let t: RenderThreading = serde_json::from_str(r#"{"chunkSize": 8, "parallel": true}"#).unwrap();
    assert!(t.parallel);
    assert_eq!(t.chunk_size, 8);
}
