//! Layout serialization and replay determinism.
//!
//! A layout that survives a JSON round trip must build the same world, and
//! two worlds built from the same layout must stay identical when fed the
//! same inputs.

use std::collections::BTreeSet;

use proptest::prelude::*;

use side_scroller::Progress;
use side_scroller::consts::*;
use side_scroller::sim::layout::{
    CheckpointSpec, EnemyGroupSpec, EnemySpec, FlagpoleSpec, ObstacleSpec, Spawn, ViewportSize,
};
use side_scroller::sim::{
    Contents, EnemyKind, LevelLayout, ObstacleKind, Rect, TickInput, Trigger, World, tick,
};

fn snapshot(world: &World) -> serde_json::Value {
    serde_json::to_value(world).unwrap()
}

fn scripted(frame: usize) -> TickInput {
    TickInput {
        right: frame % 200 < 150,
        left: frame % 200 >= 180,
        jump: frame % 45 < 20,
        action: frame % 90 < 60,
    }
}

/// Ground, a flagpole and one block per grid cell
fn grid_layout(cells: &BTreeSet<(i32, i32, u8)>, goombas: usize) -> LevelLayout {
    let mut obstacles = vec![ObstacleSpec {
        kind: ObstacleKind::Ground,
        name: "ground".into(),
        rect: Rect::new(0, GROUND_HEIGHT, 3000, 60),
        contents: None,
    }];
    for (i, &(col, row, content)) in cells.iter().enumerate() {
        let (kind, contents) = match content {
            0 => (ObstacleKind::Brick, None),
            1 => (ObstacleKind::Brick, Some(Contents::SixCoins)),
            2 => (ObstacleKind::ItemBox, Some(Contents::Coin)),
            3 => (ObstacleKind::ItemBox, Some(Contents::Mushroom)),
            _ => (ObstacleKind::ItemBox, Some(Contents::Star)),
        };
        obstacles.push(ObstacleSpec {
            kind,
            name: format!("block_{i}"),
            rect: Rect::new(300 + col * BLOCK_SIZE, 200 + row * BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE),
            contents,
        });
    }

    LevelLayout {
        name: "grid".into(),
        viewport: ViewportSize {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
        },
        camera_start_x: 0,
        level_width: 3000,
        ground_height: GROUND_HEIGHT,
        time_limit: 300,
        player_start: Spawn {
            x: 110,
            bottom: GROUND_HEIGHT,
        },
        obstacles,
        coins: vec![],
        enemy_groups: vec![EnemyGroupSpec {
            name: "walkers".into(),
            enemies: (0..goombas)
                .map(|i| EnemySpec {
                    kind: if i % 2 == 0 {
                        EnemyKind::Goomba
                    } else {
                        EnemyKind::Koopa
                    },
                    x: 900 + i as i32 * 60,
                    bottom: GROUND_HEIGHT,
                })
                .collect(),
        }],
        checkpoints: vec![
            CheckpointSpec {
                name: "checkpoint_1".into(),
                x: 250,
                trigger: Trigger::EnemyGroup(0),
            },
            CheckpointSpec {
                name: "flag".into(),
                x: 2500,
                trigger: Trigger::Flagpole,
            },
        ],
        flagpole: Some(FlagpoleSpec {
            x: 2550,
            top: 100,
            flag_bottom: 485,
            pole_bottom: 493,
        }),
        castle_door_x: 2800,
    }
}

#[test]
fn builtin_layout_survives_json_round_trip() {
    let layout = LevelLayout::builtin().unwrap();
    let json = serde_json::to_string_pretty(&layout).unwrap();
    let reloaded = LevelLayout::from_json(&json).unwrap();
    assert_eq!(reloaded, layout);

    let progress = Progress::default();
    let a = layout.build(&progress).unwrap();
    let b = reloaded.build(&progress).unwrap();
    assert_eq!(snapshot(&a), snapshot(&b));
}

#[test]
fn progress_carries_into_built_world() {
    let layout = LevelLayout::builtin().unwrap();
    let progress = Progress {
        score: 1234,
        coin_total: 7,
        lives: 2,
        camera_start_x: 1000,
        ..Progress::default()
    };
    let world = layout.build(&progress).unwrap();
    assert_eq!(world.score, 1234);
    assert_eq!(world.coin_total, 7);
    assert_eq!(world.lives, 2);
    assert_eq!(world.viewport.x, 1000);
    assert_eq!(world.player.body.pos.x, 1000 + layout.player_start.x);
}

#[test]
fn builtin_level_replays_identically() {
    let layout = LevelLayout::builtin().unwrap();
    let mut a = layout.build(&Progress::default()).unwrap();
    let mut b = layout.build(&Progress::default()).unwrap();

    for frame in 0..1200 {
        let input = scripted(frame);
        tick(&mut a, &input, FRAME_DT);
        tick(&mut b, &input, FRAME_DT);
        assert_eq!(a.events, b.events, "events diverged at frame {frame}");
    }
    assert_eq!(snapshot(&a), snapshot(&b));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn grid_layouts_round_trip_and_replay(
        cells in prop::collection::btree_set((0..40i32, 0..5i32, 0..5u8), 0..30)
            .prop_map(|cells| {
                // One block per grid position
                let mut seen = BTreeSet::new();
                cells
                    .into_iter()
                    .filter(|&(col, row, _)| seen.insert((col, row)))
                    .collect::<BTreeSet<_>>()
            }),
        goombas in 0..5usize,
        frames in 60..400usize,
    ) {
        let layout = grid_layout(&cells, goombas);
        prop_assert!(layout.validate().is_ok());

        let json = serde_json::to_string(&layout).unwrap();
        let reloaded = LevelLayout::from_json(&json).unwrap();
        prop_assert_eq!(&reloaded, &layout);

        let mut a = layout.build(&Progress::default()).unwrap();
        let mut b = reloaded.build(&Progress::default()).unwrap();
        prop_assert_eq!(a.obstacles.len(), cells.len() + 1);
        prop_assert_eq!(snapshot(&a), snapshot(&b));

        for frame in 0..frames {
            let input = scripted(frame);
            tick(&mut a, &input, FRAME_DT);
            tick(&mut b, &input, FRAME_DT);
        }
        prop_assert_eq!(snapshot(&a), snapshot(&b));
    }
}
