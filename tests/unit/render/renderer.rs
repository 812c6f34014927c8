use super::*;
use crate::assets::font::resolve_font_path;
use crate::assets::portrait::Portrait;
use crate::comparison::{SecondaryStat, SeriesPosition, StatValue};

fn font_bytes() -> Option<Arc<Vec<u8>>> {
    let path = resolve_font_path(None).ok()?;
    std::fs::read(path).ok().map(Arc::new)
}

fn solid_portrait(rgba: [u8; 4]) -> Portrait {
    let n = (theme::PORTRAIT_SIZE * theme::PORTRAIT_SIZE) as usize;
    Portrait {
        width: theme::PORTRAIT_SIZE,
        height: theme::PORTRAIT_SIZE,
        rgba8_premul: Arc::new(rgba.repeat(n)),
    }
}

fn renderer(canvas: Canvas) -> Option<FrameRenderer> {
    let font = font_bytes()?;
    let mut store = PortraitStore::new();
    store.insert("Xavi", solid_portrait([200, 40, 40, 255]));
    store.insert("Iniesta", solid_portrait([40, 40, 200, 255]));
    let res = RenderResources::new(canvas, font, &store, &["Xavi", "Iniesta"]).unwrap();
    Some(FrameRenderer::new(Arc::new(res)).unwrap())
}

fn state(displayed: [u64; 2], winner: Option<Side>, highlight_active: bool) -> FrameState {
    FrameState {
        title: "Assists".to_owned(),
        names: ["Xavi".to_owned(), "Iniesta".to_owned()],
        displayed,
        secondary_stats: vec![SecondaryStat {
            label: "Matches".to_owned(),
            value: StatValue::Integer(767),
        }],
        winner,
        highlight_active,
        series: None,
    }
}

fn count_accent(frame: &FrameRGBA, x0: u32, x1: u32) -> usize {
    let mut n = 0;
    for y in theme::STAT_BOX_Y as u32..(theme::STAT_BOX_Y + theme::STAT_BOX_H) as u32 {
        for x in x0..x1 {
            if frame.pixel(x, y) == Some(theme::ACCENT) {
                n += 1;
            }
        }
    }
    n
}

const FULL: Canvas = Canvas {
    width: 1080,
    height: 1920,
};

#[test]
fn column_anchors_are_quarter_and_three_quarter() {
    assert_eq!(column_anchor_x(Side::A, 1080), 270);
    assert_eq!(column_anchor_x(Side::B, 1080), 810);
    assert_eq!(portrait_origin(Side::A, 1080), (195.0, 300.0));
}

#[test]
fn stat_color_requires_winner_and_activation() {
    let s = state([1, 2], Some(Side::B), false);
    assert_eq!(stat_color(Side::B, &s), theme::NEUTRAL);
    let s = state([1, 2], Some(Side::B), true);
    assert_eq!(stat_color(Side::B, &s), theme::ACCENT);
    assert_eq!(stat_color(Side::A, &s), theme::NEUTRAL);
    let s = state([2, 2], None, true);
    assert_eq!(stat_color(Side::A, &s), theme::NEUTRAL);
    assert_eq!(stat_color(Side::B, &s), theme::NEUTRAL);
}

#[test]
fn frame_is_canvas_sized_and_opaque() {
    let Some(mut r) = renderer(FULL) else {
        eprintln!("skipping: no system font");
        return;
    };
    let f = r.render_frame(&state([0, 0], Some(Side::B), false)).unwrap();
    assert_eq!((f.width, f.height), (1080, 1920));
    assert_eq!(f.data.len(), 1080 * 1920 * 4);
    assert!(f.is_opaque());
}

#[test]
fn rendering_is_deterministic_across_renderers() {
    let Some(mut a) = renderer(FULL) else {
        eprintln!("skipping: no system font");
        return;
    };
    let mut b = FrameRenderer::new(Arc::clone(a.resources())).unwrap();
    let s = state([106, 560], Some(Side::B), false);
    let first = a.render_frame(&s).unwrap();
    let again = a.render_frame(&s).unwrap();
    let other = b.render_frame(&s).unwrap();
    assert_eq!(first, again);
    assert_eq!(first, other);
}

#[test]
fn accent_appears_only_in_winning_column_once_active() {
    let Some(mut r) = renderer(FULL) else {
        eprintln!("skipping: no system font");
        return;
    };
    let before = r.render_frame(&state([213, 1121], Some(Side::B), false)).unwrap();
    assert_eq!(count_accent(&before, 0, 540), 0);
    assert_eq!(count_accent(&before, 540, 1080), 0);

    let after = r.render_frame(&state([213, 1121], Some(Side::B), true)).unwrap();
    assert_eq!(count_accent(&after, 0, 540), 0);
    assert!(count_accent(&after, 540, 1080) > 50);

    let tie = r.render_frame(&state([50, 50], None, true)).unwrap();
    assert_eq!(count_accent(&tie, 0, 1080), 0);
}

#[test]
fn missing_portrait_is_asset_not_found() {
    let Some(mut r) = renderer(FULL) else {
        eprintln!("skipping: no system font");
        return;
    };
    let mut s = state([1, 2], Some(Side::B), false);
    s.names[0] = "Busquets".to_owned();
    assert!(matches!(
        r.render_frame(&s),
        Err(VersusError::AssetNotFound { .. })
    ));
}

#[test]
fn resources_require_every_named_portrait() {
    let Some(font) = font_bytes() else {
        eprintln!("skipping: no system font");
        return;
    };
    let store = PortraitStore::new();
    assert!(matches!(
        RenderResources::new(FULL, font, &store, &["Xavi"]),
        Err(VersusError::AssetNotFound { .. })
    ));
}

#[test]
fn series_badge_draws_only_in_the_top_third_when_set() {
    let Some(mut r) = renderer(FULL) else {
        eprintln!("skipping: no system font");
        return;
    };
    let plain = state([213, 1121], Some(Side::B), true);
    let mut badged = plain.clone();
    badged.series = Some(SeriesPosition { index: 1, count: 3 });
    assert_ne!(plain.fingerprint(), badged.fingerprint());

    let without = r.render_frame(&plain).unwrap();
    let with = r.render_frame(&badged).unwrap();
    assert_eq!(r.render_frame(&plain).unwrap(), without);

    let mut changed = 0;
    for y in 0..FULL.height {
        for x in 0..FULL.width {
            if with.pixel(x, y) != without.pixel(x, y) {
                changed += 1;
                assert!(y < FULL.height / 3, "badge pixel below the top third at ({x}, {y})");
                assert!((300..780).contains(&x), "badge pixel off center at ({x}, {y})");
            }
        }
    }
    assert!(changed > 500, "badge barely visible: {changed} pixels");
}
