// tests/world.rs
use glam::IVec2;
use grid_localizer::{
    Cell, Direction, Environment, GridMap, LocalizeError, Localizer, LocalizerConfig,
    ObservationMap, Side, TruePose,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

fn map_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("maps").join(name)
}

fn load(name: &str) -> GridMap {
    GridMap::load(map_path(name)).unwrap()
}

fn setup(name: &str, position: IVec2, direction: IVec2) -> Localizer {
    let pose = TruePose::new(position, Direction::try_from(direction).unwrap());
    let environment = Environment::new(load(name), pose).unwrap();
    Localizer::new(environment, LocalizerConfig::default()).unwrap()
}

fn cells(rows: &[&str]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|r| r.chars().map(Cell::from_char).collect::<Vec<_>>())
        .collect()
}

#[test]
fn test_load_fixture_maps() {
    let tiny = load("0.txt");
    assert_eq!(tiny, GridMap::from_rows(cells(&["XXX", "X X", "XXX"])).unwrap());

    let room = load("4.txt");
    assert_eq!((room.rows(), room.cols()), (5, 5));
    assert_eq!(room.get(IVec2::new(3, 2)), Some(Cell::Wall));
    assert_eq!(room.get(IVec2::new(3, 1)), Some(Cell::Open));
    assert_eq!(room.open_cells().count(), 8);
}

#[test]
fn test_parse_treats_non_wall_chars_as_open() {
    let map = GridMap::parse("X.o\r\nX X\r\n").unwrap();
    assert_eq!(map.cols(), 3, "carriage returns are stripped");
    assert!(map.is_open(IVec2::new(0, 1)));
    assert!(map.is_open(IVec2::new(0, 2)));
    assert!(!map.is_open(IVec2::new(1, 0)));
    assert!(!map.is_open(IVec2::new(5, 5)), "outside is never open");
    assert_eq!(map.get(IVec2::new(-1, 0)), None);
}

#[test]
fn test_malformed_maps_are_rejected() {
    assert!(matches!(GridMap::parse(""), Err(LocalizeError::MapFormat(_))));
    assert!(matches!(
        GridMap::parse("XXX\nXX\n"),
        Err(LocalizeError::MapFormat(_))
    ));
    assert!(matches!(
        GridMap::load(map_path("does-not-exist.txt")),
        Err(LocalizeError::Io(_))
    ));
}

#[test]
fn test_environment_rejects_wall_pose() {
    let pose = TruePose::new(IVec2::new(0, 0), Direction::new(0));
    assert!(matches!(
        Environment::new(load("0.txt"), pose),
        Err(LocalizeError::InvalidPose(_))
    ));
}

#[test]
fn test_random_pose_lands_on_open_cell() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let env = Environment::with_random_pose(load("4.txt"), &mut rng).unwrap();
        assert!(env.map().is_open(env.pose().position));
        assert_eq!(env.pose(), env.initial_pose());
    }

    let walls = GridMap::parse("XX\nXX").unwrap();
    assert!(matches!(
        Environment::with_random_pose(walls, &mut rng),
        Err(LocalizeError::InvalidPose(_))
    ));
}

#[test]
fn test_environment_move_and_sense() {
    let pose = TruePose::new(IVec2::new(1, 1), Direction::new(0));
    let mut env = Environment::new(load("4.txt"), pose).unwrap();

    assert!(env.attempt_move());
    assert_eq!(env.pose().position, IVec2::new(2, 1));
    assert!(env.attempt_move());
    assert!(!env.attempt_move(), "wall below (4, 1)");
    assert_eq!(env.pose().position, IVec2::new(3, 1));

    let seen = env.sense(1);
    assert_eq!(seen.len(), 9);
    assert!(seen.contains(&(IVec2::new(0, 1), Cell::Wall)));

    let corner = Environment::new(
        load("0.txt"),
        TruePose::new(IVec2::new(1, 1), Direction::new(0)),
    )
    .unwrap();
    let wide = corner.sense(2);
    assert_eq!(wide.len(), 25, "the whole window is sensed");
    assert!(wide.contains(&(IVec2::new(-2, -2), Cell::Wall)));
    assert!(wide.contains(&(IVec2::new(0, 0), Cell::Open)));
    assert_eq!(wide.iter().filter(|(_, c)| c.is_open()).count(), 1);
}

#[test]
fn test_sensing_past_an_open_edge_reads_wall() {
    let map = GridMap::parse("   \n   ").unwrap();
    assert_eq!(map.cell_or_wall(IVec2::new(-1, 0)), Cell::Wall);
    assert_eq!(map.cell_or_wall(IVec2::new(1, 2)), Cell::Open);

    let env = Environment::new(map, TruePose::new(IVec2::ZERO, Direction::new(0))).unwrap();
    let seen = env.sense(1);
    assert_eq!(seen.len(), 9);
    assert!(seen.contains(&(IVec2::new(-1, 0), Cell::Wall)));
    assert!(seen.contains(&(IVec2::new(0, -1), Cell::Wall)));
    assert!(seen.contains(&(IVec2::new(1, 1), Cell::Open)));
}

#[test]
fn test_partial_pose_keeps_the_given_half() {
    let map = load("4.txt");
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let env =
            Environment::with_partial_pose(map.clone(), Some(IVec2::new(2, 3)), None, &mut rng)
                .unwrap();
        assert_eq!(env.pose().position, IVec2::new(2, 3));

        let env =
            Environment::with_partial_pose(map.clone(), None, Some(Direction::new(3)), &mut rng)
                .unwrap();
        assert_eq!(env.pose().direction, Direction::new(3));
        assert!(map.is_open(env.pose().position));

        // (3, 2) is a wall: the position is redrawn, the direction stays.
        let env = Environment::with_partial_pose(
            map.clone(),
            Some(IVec2::new(3, 2)),
            Some(Direction::new(1)),
            &mut rng,
        )
        .unwrap();
        assert!(map.is_open(env.pose().position));
        assert_eq!(env.pose().direction, Direction::new(1));
    }

    let exact = Environment::with_partial_pose(
        map.clone(),
        Some(IVec2::new(1, 1)),
        Some(Direction::new(2)),
        &mut rng,
    )
    .unwrap();
    assert_eq!(
        exact.pose(),
        TruePose::new(IVec2::new(1, 1), Direction::new(2))
    );

    let walls = GridMap::parse("XX\nXX").unwrap();
    assert!(matches!(
        Environment::with_partial_pose(walls, None, Some(Direction::new(0)), &mut rng),
        Err(LocalizeError::InvalidPose(_))
    ));
}

#[test]
fn test_rotate_updates_true_and_relative_direction() {
    let cases = [
        (IVec2::new(1, 0), Side::Left, IVec2::new(0, 1), IVec2::new(0, 1)),
        (IVec2::new(0, 1), Side::Left, IVec2::new(-1, 0), IVec2::new(0, 1)),
        (IVec2::new(-1, 0), Side::Left, IVec2::new(0, -1), IVec2::new(0, 1)),
        (IVec2::new(0, -1), Side::Left, IVec2::new(1, 0), IVec2::new(0, 1)),
        (IVec2::new(1, 0), Side::Right, IVec2::new(0, -1), IVec2::new(0, -1)),
        (IVec2::new(0, 1), Side::Right, IVec2::new(1, 0), IVec2::new(0, -1)),
        (IVec2::new(-1, 0), Side::Right, IVec2::new(0, 1), IVec2::new(0, -1)),
        (IVec2::new(0, -1), Side::Right, IVec2::new(-1, 0), IVec2::new(0, -1)),
    ];

    for (start, side, true_after, relative_after) in cases {
        let mut localizer = setup("0.txt", IVec2::new(1, 1), start);
        localizer.rotate(side);
        assert_eq!(localizer.environment().pose().direction.vector(), true_after);
        assert_eq!(localizer.relative_pose().direction.vector(), relative_after);
    }
}

#[test]
fn test_rotate_left_then_right_restores_direction() {
    let mut localizer = setup("4.txt", IVec2::new(1, 1), IVec2::new(1, 0));
    let before = localizer.relative_pose();
    localizer.rotate(Side::Left);
    localizer.rotate(Side::Right);
    assert_eq!(localizer.relative_pose(), before);
    assert_eq!(localizer.environment().pose().direction.index(), 0);
}

#[test]
fn test_advance_tracks_relative_position() {
    let cases = [
        ("0.txt", IVec2::new(1, 0), IVec2::new(1, 1), IVec2::new(0, 0)),
        ("4.txt", IVec2::new(1, 0), IVec2::new(2, 1), IVec2::new(1, 0)),
        ("4.txt", IVec2::new(-1, 0), IVec2::new(1, 1), IVec2::new(0, 0)),
        ("4.txt", IVec2::new(0, 1), IVec2::new(1, 2), IVec2::new(1, 0)),
    ];

    for (name, dir, true_after, relative_after) in cases {
        let mut localizer = setup(name, IVec2::new(1, 1), dir);
        localizer.advance();
        assert_eq!(localizer.environment().pose().position, true_after, "{name} {dir}");
        assert_eq!(localizer.relative_pose().position, relative_after, "{name} {dir}");
    }
}

#[test]
fn test_observation_map_is_idempotent() {
    let mut obs = ObservationMap::new(5, 1);
    assert_eq!(obs.size(), 13);
    assert!(obs.is_empty());

    assert!(obs.record(IVec2::new(1, -1), Cell::Wall));
    let after_first = obs.clone();
    assert!(!obs.record(IVec2::new(1, -1), Cell::Wall));
    assert_eq!(obs, after_first);

    assert_eq!(obs.get(IVec2::new(1, -1)), Some(Cell::Wall));
    assert_eq!(obs.get(IVec2::new(0, 0)), None);
    assert!(!obs.record(IVec2::new(100, 0), Cell::Open), "out of range is dropped");
    assert_eq!(obs.discovered_count(), 1);
}

#[test]
fn test_reobserving_does_not_change_map() {
    let mut localizer = setup("4.txt", IVec2::new(2, 2), IVec2::new(0, 1));
    localizer.observe();
    let first = localizer.observations().clone();
    localizer.rotate(Side::Left);
    localizer.observe();
    assert_eq!(localizer.observations(), &first);
    assert_eq!(localizer.discovered_tiles(), 9);
}

#[test]
fn test_observations_are_in_the_relative_frame() {
    // Robot starts facing (0, 1); its relative frame always starts facing (1, 0).
    let mut localizer = setup("4.txt", IVec2::new(3, 1), IVec2::new(0, 1));
    localizer.observe();
    let obs = localizer.observations();
    // True (3, 2) is wall, directly ahead; relative ahead is (1, 0).
    assert_eq!(obs.get(IVec2::new(1, 0)), Some(Cell::Wall));
    // True (2, 1) is open, to the robot's left; relative left is (0, 1).
    assert_eq!(obs.get(IVec2::new(0, 1)), Some(Cell::Open));
}
