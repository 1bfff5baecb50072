//! Collectibles, projectiles and debris
//!
//! Powerups rise out of the block that released them, then walk, bounce or
//! sit still depending on kind. Fireballs belong to the player. Coins either
//! rest in the level (collectible) or pop out of a bumped block (animation
//! only).

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{Actor, Body, Direction, FrameContext};
use super::rect::Rect;
use crate::consts::*;

/// Powerup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupKind {
    Mushroom,
    FireFlower,
    Star,
    LifeMushroom,
}

impl PowerupKind {
    /// Mushrooms slide along the floor; flowers stay put; stars bounce
    pub fn walks(self) -> bool {
        matches!(self, PowerupKind::Mushroom | PowerupKind::LifeMushroom)
    }
}

/// Powerup motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupState {
    /// Rising out of its block; not collidable with terrain yet
    Reveal,
    Slide,
    Fall,
    Bounce,
    Resting,
}

/// A powerup released from a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub body: Body,
    pub kind: PowerupKind,
    pub state: PowerupState,
    /// Top y at which the reveal ends (flush on top of the block)
    reveal_top: i32,
    pub alive: bool,
}

impl Powerup {
    /// Spawn inside `block`, ready to rise out of its top
    pub fn reveal_from(kind: PowerupKind, block: Rect) -> Self {
        let mut body = Body::standing_at(block.centerx(), block.bottom(), POWERUP_SIZE, Direction::Right);
        body.vel = Vec2::new(0.0, REVEAL_VEL);
        Self {
            body,
            kind,
            state: PowerupState::Reveal,
            reveal_top: block.top() - POWERUP_SIZE.1,
            alive: true,
        }
    }

    /// Whether terrain collisions apply this frame
    pub fn is_revealing(&self) -> bool {
        self.state == PowerupState::Reveal
    }

    fn finish_reveal(&mut self) {
        self.body.pos.y = self.reveal_top;
        self.body.vel = Vec2::ZERO;
        self.state = match self.kind {
            PowerupKind::Mushroom | PowerupKind::LifeMushroom => PowerupState::Slide,
            PowerupKind::FireFlower => PowerupState::Resting,
            PowerupKind::Star => {
                self.body.vel.y = STAR_BOUNCE_VEL;
                PowerupState::Bounce
            }
        };
    }

    /// Turn around after walking into something
    pub fn reverse(&mut self, direction: Direction) {
        self.body.direction = direction;
        self.body.walk(MUSHROOM_SPEED);
    }

    /// Floor reached: walkers slide, the star bounces straight back up
    pub fn land(&mut self) {
        match self.kind {
            PowerupKind::Star => {
                self.body.vel.y = STAR_BOUNCE_VEL;
                self.state = PowerupState::Bounce;
            }
            _ => {
                self.body.vel.y = 0.0;
                self.state = PowerupState::Slide;
            }
        }
    }

    /// Walked off an edge
    pub fn start_fall(&mut self) {
        if self.kind.walks() {
            self.state = PowerupState::Fall;
        }
    }
}

impl Actor for Powerup {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, ctx: &FrameContext) {
        match self.state {
            PowerupState::Reveal => {
                self.body.step_y();
                if self.body.pos.y <= self.reveal_top {
                    self.finish_reveal();
                }
            }
            PowerupState::Slide => {
                self.body.walk(MUSHROOM_SPEED);
                self.body.vel.y = 0.0;
            }
            PowerupState::Fall => {
                self.body.walk(MUSHROOM_SPEED);
                self.body.fall(POWERUP_GRAVITY, MAX_Y_VEL);
            }
            PowerupState::Bounce => {
                self.body.walk(STAR_SPEED);
                self.body.fall(STAR_GRAVITY, MAX_Y_VEL);
            }
            PowerupState::Resting => {}
        }

        if self.body.rect().top() > ctx.viewport.bottom() {
            self.alive = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Fireball flight state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireballState {
    Flying,
    /// Already bounced once; the next floor contact destroys it
    Bouncing,
}

/// A projectile thrown by the fire-powered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fireball {
    pub body: Body,
    pub state: FireballState,
    pub alive: bool,
}

impl Fireball {
    /// Launch from the side of `thrower` it is facing
    pub fn launch(thrower: Rect, facing: Direction) -> Self {
        let x = match facing {
            Direction::Right => thrower.right(),
            Direction::Left => thrower.left() - FIREBALL_SIZE.0,
        };
        let mut body = Body::new(IVec2::new(x, thrower.top() + thrower.height / 4), FIREBALL_SIZE, facing);
        body.vel = Vec2::new(FIREBALL_SPEED * facing.sign(), FIREBALL_START_Y_VEL);
        Self {
            body,
            state: FireballState::Flying,
            alive: true,
        }
    }

    /// Hit a floor: bounce the first time, burst the second
    pub fn hit_floor(&mut self) {
        match self.state {
            FireballState::Flying => {
                self.body.vel.y = FIREBALL_BOUNCE_VEL;
                self.state = FireballState::Bouncing;
            }
            FireballState::Bouncing => self.alive = false,
        }
    }
}

impl Actor for Fireball {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, ctx: &FrameContext) {
        self.body.fall(FIREBALL_GRAVITY, MAX_Y_VEL);
        let rect = self.body.rect();
        let view = ctx.viewport;
        if rect.right() < view.left() || rect.left() > view.right() || rect.top() > view.bottom() {
            self.alive = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Coin behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinState {
    /// Placed by the layout; collected on touch
    Resting,
    /// Popping out of a bumped block; falls back to `start_y` and vanishes
    Spinning { start_y: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub body: Body,
    pub state: CoinState,
    pub alive: bool,
}

impl Coin {
    pub fn resting(pos: IVec2) -> Self {
        Self {
            body: Body::new(pos, COIN_SIZE, Direction::Right),
            state: CoinState::Resting,
            alive: true,
        }
    }

    /// Coin popping out of the top of `block`
    pub fn pop_from(block: Rect) -> Self {
        let mut body = Body::standing_at(block.centerx(), block.top(), COIN_SIZE, Direction::Right);
        body.vel.y = COIN_POP_VEL;
        Self {
            state: CoinState::Spinning { start_y: body.pos.y },
            body,
            alive: true,
        }
    }

    pub fn is_collectible(&self) -> bool {
        self.alive && self.state == CoinState::Resting
    }
}

impl Actor for Coin {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        if let CoinState::Spinning { start_y } = self.state {
            self.body.step_y();
            self.body.vel.y += COIN_GRAVITY;
            if self.body.vel.y > 0.0 && self.body.pos.y >= start_y {
                self.alive = false;
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Debris from a smashed brick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickPiece {
    pub body: Body,
    pub alive: bool,
}

impl BrickPiece {
    /// The four pieces a brick breaks into
    pub fn burst(brick: Rect) -> [BrickPiece; 4] {
        let piece = |x: i32, y: i32, vel: Vec2| {
            let mut body = Body::new(IVec2::new(x, y), BRICK_PIECE_SIZE, Direction::Right);
            body.vel = vel;
            BrickPiece { body, alive: true }
        };
        let (l, t) = (brick.left(), brick.top());
        let (r, m) = (brick.right() - BRICK_PIECE_SIZE.0, brick.centery());
        [
            piece(l, t, Vec2::new(-2.0, -12.0)),
            piece(r, t, Vec2::new(2.0, -12.0)),
            piece(l, m, Vec2::new(-2.0, -6.0)),
            piece(r, m, Vec2::new(2.0, -6.0)),
        ]
    }
}

impl Actor for BrickPiece {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, ctx: &FrameContext) {
        self.body.step_x();
        self.body.step_y();
        self.body.vel.y += BRICK_PIECE_GRAVITY;
        if self.body.rect().top() > ctx.viewport.bottom() {
            self.alive = false;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
