// tests/rendering.rs
use crossterm::style::{Color, Stylize};
use glam::IVec2;
use grid_localizer::render::{
    describe_candidates, map_frame, paint, parse_color, summary, wall_glyph,
};
use grid_localizer::{
    CandidatePose, Direction, Environment, GridMap, LocalizeError, Localizer, LocalizerConfig,
    TruePose,
};

#[test]
fn test_wall_glyphs() {
    let glyphs: String = (0..16).map(|mask| wall_glyph(mask).unwrap()).collect();
    assert_eq!(glyphs, "·╵╷│╴┘┐┤╶└┌├─┴┬┼");
    assert!(matches!(
        wall_glyph(16),
        Err(LocalizeError::InvalidArgument(_))
    ));
}

#[test]
fn test_paint_styles() {
    assert_eq!(paint("abcd", None, None), "abcd");
    assert_eq!(
        paint("abcd", Some(Color::Green), Some(Color::White)),
        "abcd".with(Color::Green).on(Color::White).to_string()
    );
    assert_eq!(
        paint("abcd", None, Some(Color::Yellow)),
        "abcd".on(Color::Yellow).to_string()
    );
}

#[test]
fn test_color_names() {
    let names = [
        ("black", Color::Black),
        ("red", Color::Red),
        ("green", Color::Green),
        ("yellow", Color::Yellow),
        ("blue", Color::Blue),
        ("magenta", Color::Magenta),
        ("cyan", Color::Cyan),
        ("white", Color::White),
    ];
    for (name, color) in names {
        assert_eq!(parse_color(name).unwrap(), color);
    }
    for bad in ["", "blck", "purple"] {
        assert!(matches!(
            parse_color(bad),
            Err(LocalizeError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_map_frame_marks_robot_and_candidates() {
    let map = GridMap::parse("XXXXX\nX   X\nXXXXX").unwrap();
    let robot = TruePose::new(IVec2::new(1, 1), Direction::new(1));
    let highlights = [CandidatePose::new(IVec2::new(1, 3), Direction::new(0))];

    let frame = map_frame(&map, robot, &highlights);
    let first_line = frame.lines().next().unwrap();
    assert!(first_line.contains('┌') && first_line.contains('┐'));
    assert!(frame.contains(&paint("→", Some(Color::Black), None)));
    assert!(frame.contains(&paint(" ", None, Some(Color::Yellow))));
    assert!(frame.contains("Legend:"));
}

#[test]
fn test_describe_candidates() {
    let candidates = [
        CandidatePose::new(IVec2::new(1, 1), Direction::new(0)),
        CandidatePose::new(IVec2::new(3, 2), Direction::new(3)),
    ];
    assert_eq!(describe_candidates(&candidates), "([1, 1] ↓); ([3, 2] ←)");
    assert_eq!(describe_candidates(&[]), "");
}

#[test]
fn test_summary_reports_outcome_and_counts() {
    let map = GridMap::parse("XXXXX\nX   X\nX   X\nX X X\nXXXXX").unwrap();
    let pose = TruePose::new(IVec2::new(1, 1), Direction::new(0));
    let mut localizer =
        Localizer::new(Environment::new(map, pose).unwrap(), LocalizerConfig::default()).unwrap();
    let report = localizer.run_with(|_| {});
    assert!(report.is_found());

    let text = summary(localizer.environment(), &report);
    assert!(text.starts_with("Search finished\nRobot is found."));
    assert!(text.contains("Starting position: ([1, 1] ↓)\n"));
    assert!(text.contains("Is found position correct: true\n"));
    assert!(text.ends_with(&format!(
        "Steps: {}\nDiscovered tiles: {}",
        report.steps, report.discovered_tiles
    )));
}
