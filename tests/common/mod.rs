//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use side_scroller::consts::*;
use side_scroller::sim::{Obstacle, ObstacleKind, Player, Rect, TickInput, World, tick};

/// Ground spanning `0..width`, small player standing at x=110
pub fn flat_world(width: i32) -> World {
    let mut world = World::new(
        Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT),
        4000,
        Player::new(110, GROUND_HEIGHT),
    );
    world.obstacles.insert(Obstacle::new(
        0,
        "ground_section_1",
        ObstacleKind::Ground,
        Rect::new(0, GROUND_HEIGHT, width, 60),
    ));
    world
}

pub fn step(world: &mut World, input: TickInput) {
    tick(world, &input, FRAME_DT);
}

pub fn idle() -> TickInput {
    TickInput::default()
}

pub fn right() -> TickInput {
    TickInput {
        right: true,
        ..Default::default()
    }
}

pub fn left() -> TickInput {
    TickInput {
        left: true,
        ..Default::default()
    }
}
