//! Shared entity data and the per-kind capability trait
//!
//! Every mover (player, hostiles, shells, items, projectiles) embeds a
//! [`Body`]; behaviour that differs per kind lives behind [`Actor`].

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::tick::TickInput;
use crate::displacement;

/// Facing / travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Position, size, velocity and facing of a game object
///
/// Bounds are derived from `pos` and `size` on every call to [`Body::rect`],
/// so a position change can never leave a stale rectangle behind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in level pixels
    pub pos: IVec2,
    pub size: IVec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub direction: Direction,
}

impl Body {
    pub fn new(pos: IVec2, size: (i32, i32), direction: Direction) -> Self {
        Self {
            pos,
            size: IVec2::new(size.0, size.1),
            vel: Vec2::ZERO,
            direction,
        }
    }

    /// Body whose bottom edge sits on `bottom`, horizontally centred on `centerx`
    pub fn standing_at(centerx: i32, bottom: i32, size: (i32, i32), direction: Direction) -> Self {
        Self::new(
            IVec2::new(centerx - size.0 / 2, bottom - size.1),
            size,
            direction,
        )
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn set_left(&mut self, x: i32) {
        self.pos.x = x;
    }

    pub fn set_right(&mut self, x: i32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: i32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: i32) {
        self.pos.y = y - self.size.y;
    }

    /// Change size keeping the bottom edge and horizontal centre fixed
    pub fn resize(&mut self, size: (i32, i32)) {
        let rect = self.rect();
        self.size = IVec2::new(size.0, size.1);
        self.pos.x = rect.centerx() - size.0 / 2;
        self.pos.y = rect.bottom() - size.1;
    }

    /// Integrate horizontal velocity into position
    #[inline]
    pub fn step_x(&mut self) {
        self.pos.x += displacement(self.vel.x);
    }

    /// Integrate vertical velocity into position
    #[inline]
    pub fn step_y(&mut self) {
        self.pos.y += displacement(self.vel.y);
    }

    /// Accelerate downward, capped at `max`
    pub fn fall(&mut self, gravity: f32, max: f32) {
        self.vel.y = (self.vel.y + gravity).min(max);
    }

    /// Set horizontal speed along the current direction
    pub fn walk(&mut self, speed: f32) {
        self.vel.x = speed * self.direction.sign();
    }
}

/// Per-frame context handed to actors
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Elapsed seconds since the previous frame
    pub dt: f32,
    /// Current camera rectangle in level pixels
    pub viewport: Rect,
    /// Buttons held this frame (only the player reads them)
    pub input: TickInput,
}

/// Capabilities shared by every movable game object
pub trait Actor {
    fn body(&self) -> &Body;

    /// Advance timers and velocities for one frame (no collision handling)
    fn advance(&mut self, ctx: &FrameContext);

    fn is_alive(&self) -> bool;

    fn rect(&self) -> Rect {
        self.body().rect()
    }
}
