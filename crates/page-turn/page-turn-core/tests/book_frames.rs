use approx::assert_relative_eq;
use page_turn_core::{
    BookCommand, BookEngine, BookEvent, Config, CurveSolver, Inputs, PageContext, PageSpec,
    PageTurnError,
};
use page_turn_test_fixtures::{books, configs};

fn init_tracing() {
    let default_filter = "page_turn_core=debug";
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn classic_book() -> BookEngine {
    let pages: Vec<PageSpec> = books::load("classic-6").expect("classic-6 fixture");
    let mut eng = BookEngine::default();
    eng.set_pages(pages);
    eng
}

fn run(eng: &mut BookEngine, seconds: f32, dt: f32) -> Vec<BookEvent> {
    let mut events = Vec::new();
    let frames = (seconds / dt).ceil() as usize;
    for _ in 0..frames {
        events.extend(eng.update(dt, Inputs::default()).events.iter().cloned());
    }
    events
}

#[test]
fn closed_book_keeps_non_root_bones_flat() {
    init_tracing();
    let mut eng = classic_book();
    for _ in 0..30 {
        let out = eng.update(1.0 / 60.0, Inputs::default());
        assert_eq!(out.delayed_page, 0);
        for pose in &out.poses {
            assert!(pose.book_closed);
            assert!(pose.rotations_y[1..].iter().all(|a| *a == 0.0));
        }
    }

    // Flip all the way to the back cover and let every page come to rest.
    eng.go_to_page(eng.page_count());
    run(&mut eng, 12.0, 1.0 / 60.0);
    let out = eng.update(1.0 / 60.0, Inputs::default());
    assert_eq!(out.delayed_page, 6);
    for pose in &out.poses {
        assert!(pose.book_closed && pose.opened);
        assert_relative_eq!(pose.rotations_y[0], -std::f32::consts::FRAC_PI_2, epsilon = 1e-3);
        for a in &pose.rotations_y[1..] {
            assert!(a.abs() < 1e-3, "bone not flat: {a}");
        }
    }
}

#[test]
fn solver_targets_flat_whenever_closed() {
    let solver = CurveSolver::default();
    for page_number in 0..6 {
        for opened in [false, true] {
            let ctx = PageContext {
                opened,
                book_closed: true,
                page_number,
                turning_progress: 0.5,
            };
            let angles = solver.solve_page(31, &ctx);
            assert!(angles[1..].iter().all(|a| *a == 0.0));
        }
    }
}

#[test]
fn turning_transient_rises_peaks_and_returns() {
    init_tracing();
    let mut eng = classic_book();
    eng.go_to_page(1);

    // 1/64 s is exact in binary, so frame times land on whole multiples.
    let dt = 0.015625;
    let mut samples: Vec<(f64, f32)> = Vec::new();
    let mut toggled_at = None;
    for _ in 0..100 {
        let out = eng.update(dt, Inputs::default()).clone();
        let page0 = &out.poses[0];
        if page0.opened && toggled_at.is_none() {
            toggled_at = eng.pages()[0].turned_at_ms();
        }
        if let Some(t0) = toggled_at {
            samples.push((eng.clock_ms() - t0, page0.turning_progress));
        }
    }

    let t0 = toggled_at.expect("page 0 should open");
    assert!((150.0..150.0 + 15.625).contains(&t0), "first step at {t0}");
    assert_eq!(samples[0], (0.0, 0.0));

    let window = eng.config().curve.turning_window_ms as f64;
    let rising: Vec<f32> = samples
        .iter()
        .filter(|(e, _)| *e <= window / 2.0)
        .map(|(_, p)| *p)
        .collect();
    assert!(rising.windows(2).all(|w| w[1] >= w[0]));

    let peak = samples.iter().map(|(_, p)| *p).fold(0.0f32, f32::max);
    assert!(peak > 0.95);

    let falling: Vec<f32> = samples
        .iter()
        .filter(|(e, _)| *e >= window / 2.0 && *e < window)
        .map(|(_, p)| *p)
        .collect();
    assert!(falling.windows(2).all(|w| w[1] <= w[0]));

    assert!(samples
        .iter()
        .filter(|(e, _)| *e >= window)
        .all(|(_, p)| *p == 0.0));
}

#[test]
fn identical_inputs_give_identical_frames() {
    let mut a = classic_book();
    let mut b = classic_book();
    a.go_to_page(4);
    b.go_to_page(4);
    for _ in 0..90 {
        let pa = a.update(1.0 / 60.0, Inputs::default()).poses.clone();
        let pb = b.update(1.0 / 60.0, Inputs::default()).poses.clone();
        assert_eq!(pa, pb);
    }
}

#[test]
fn long_frame_catches_up() {
    let mut eng = classic_book();
    eng.go_to_page(6);
    let out = eng.update(5.0, Inputs::default());
    assert_eq!(out.delayed_page, 6);
    assert_eq!(out.turns(), 6);
    assert!(out.events.contains(&BookEvent::Settled { page: 6 }));
    for pose in &out.poses {
        assert!(pose.rotations_y.iter().all(|a| a.is_finite()));
    }
}

#[test]
fn depth_offsets_follow_delayed_page() {
    let mut eng = classic_book();
    eng.go_to_page(3);
    run(&mut eng, 1.0, 1.0 / 60.0);
    let depth = eng.config().page.depth;
    let out = eng.update(1.0 / 60.0, Inputs::default());
    assert_eq!(out.delayed_page, 3);
    for pose in &out.poses {
        let expected = (3.0 - pose.index as f32) * depth;
        assert_relative_eq!(pose.depth_offset, expected, epsilon = 1e-6);
        assert_eq!(pose.opened, pose.index < 3);
        assert!(!pose.book_closed);
    }
}

#[test]
fn set_pages_command_closes_the_book() {
    let mut eng = classic_book();
    eng.go_to_page(2);
    run(&mut eng, 1.0, 1.0 / 60.0);
    assert_eq!(eng.delayed_page(), 2);

    let single: Vec<PageSpec> = books::load("single-sheet").unwrap();
    let out = eng.update(
        1.0 / 60.0,
        Inputs {
            commands: vec![BookCommand::SetPages { pages: single }],
        },
    );
    assert_eq!(out.delayed_page, 0);
    assert_eq!(out.poses.len(), 1);
    assert!(out.events.contains(&BookEvent::PagesReplaced { page_count: 1 }));
}

#[test]
fn missing_art_falls_back_without_touching_bones() {
    let pages: Vec<PageSpec> = books::load("missing-art").unwrap();
    let mut eng = BookEngine::default();
    eng.set_pages(pages);
    let cover = eng.config().textures.cover.clone();

    let out = eng.update(1.0 / 60.0, Inputs::default()).clone();
    let fallbacks: Vec<&BookEvent> = out
        .events
        .iter()
        .filter(|e| matches!(e, BookEvent::TextureFallback { .. }))
        .collect();
    assert_eq!(fallbacks.len(), 2);
    assert_eq!(eng.materials(0).unwrap().front.texture, cover);
    assert!(eng.materials(2).unwrap().back.fallback);
    assert!(!eng.materials(1).unwrap().front.fallback);
    assert_eq!(out.poses.len(), 3);
}

#[test]
fn snappy_preset_loads() {
    let json = configs::json("snappy-300ms").unwrap();
    let mut eng = BookEngine::from_json_config(&json).unwrap();
    assert_eq!(eng.config().curve.turning_window_ms, 300.0);
    assert_eq!(eng.config().page.segments, 30);
    eng.set_pages(books::load("classic-6").unwrap());
    assert_eq!(
        eng.materials(0).unwrap().front_roughness.as_deref(),
        Some("book-cover-roughness")
    );
    assert_eq!(
        eng.materials(5).unwrap().back_roughness.as_deref(),
        Some("book-cover-roughness")
    );
    assert!(eng.materials(2).unwrap().front_roughness.is_none());
}

#[test]
fn invalid_preset_is_rejected() {
    let json = configs::json("invalid-segments").unwrap();
    let err = BookEngine::from_json_config(&json).unwrap_err();
    assert!(matches!(err, PageTurnError::InvalidConfig { .. }));

    let cfg: Config = configs::load("default").unwrap();
    assert!(BookEngine::try_new(cfg).is_ok());
}

#[test]
fn single_sheet_opens_toward_the_spine() {
    init_tracing();
    let mut eng = BookEngine::default();
    eng.set_pages(books::load("single-sheet").unwrap());
    eng.go_to_page(1);

    let half_pi = std::f32::consts::FRAC_PI_2;
    let mut roots = Vec::new();
    for _ in 0..240 {
        let out = eng.update(1.0 / 60.0, Inputs::default());
        assert!(out.poses[0].book_closed);
        roots.push(out.poses[0].rotations_y[0]);
    }

    assert_eq!(eng.delayed_page(), 1);
    assert!(roots.windows(2).all(|w| w[1] <= w[0]));
    assert!(roots.iter().all(|y| *y >= -half_pi && *y <= half_pi));
    assert_relative_eq!(roots[roots.len() - 1], -half_pi, epsilon = 5e-3);
}
