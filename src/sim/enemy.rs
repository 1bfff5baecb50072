//! Hostile walkers, shells and the dying
//!
//! Enemies walk until they hit something, then turn around. A stomped Koopa
//! leaves a [`Shell`] behind; anything killed moves to the [`Dying`] list
//! until its animation finishes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Actor, Body, Direction, FrameContext};
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Goomba,
    Koopa,
}

impl EnemyKind {
    pub fn size(self) -> (i32, i32) {
        match self {
            EnemyKind::Goomba => GOOMBA_SIZE,
            EnemyKind::Koopa => KOOPA_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyState {
    #[default]
    Walk,
    Fall,
}

/// A walking hostile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub alive: bool,
}

impl Enemy {
    /// Enemy standing with its feet at `bottom`, left edge at `x`
    pub fn new(kind: EnemyKind, x: i32, bottom: i32, direction: Direction) -> Self {
        let size = kind.size();
        let mut body = Body::standing_at(x + size.0 / 2, bottom, size, direction);
        body.walk(ENEMY_SPEED);
        Self {
            body,
            kind,
            state: EnemyState::Walk,
            alive: true,
        }
    }

    /// Reverse direction after touching something on the leading side
    pub fn turn_around(&mut self) {
        self.body.direction = self.body.direction.flipped();
        self.body.walk(ENEMY_SPEED);
    }

    /// Head toward `direction` (used when pushed off another walker)
    pub fn face(&mut self, direction: Direction) {
        self.body.direction = direction;
        self.body.walk(ENEMY_SPEED);
    }

    pub fn land(&mut self) {
        self.body.vel.y = 0.0;
        self.state = EnemyState::Walk;
    }

    pub fn start_fall(&mut self) {
        self.state = EnemyState::Fall;
    }

    /// Shell left behind by a stomped Koopa, sharing its bottom centre
    pub fn shell(&self) -> Shell {
        let rect = self.body.rect();
        Shell::new(rect.centerx(), rect.bottom(), self.body.direction)
    }

    /// Corpse flung off screen in `direction`
    pub fn into_death_jump(self, direction: Direction) -> Dying {
        Dying::death_jump(self.body, DyingKind::from(self.kind), direction)
    }

    /// Corpse squashed flat where it stood
    pub fn into_squashed(self) -> Dying {
        Dying::jumped_on(self.body, DyingKind::from(self.kind))
    }
}

impl Actor for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        match self.state {
            EnemyState::Walk => {
                self.body.walk(ENEMY_SPEED);
                self.body.vel.y = 0.0;
            }
            EnemyState::Fall => self.body.fall(ENEMY_GRAVITY, MAX_Y_VEL),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellState {
    #[default]
    Idle,
    Slide,
    Fall,
}

/// An empty Koopa shell; harmless while idle, lethal while sliding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shell {
    pub body: Body,
    pub state: ShellState,
    pub alive: bool,
}

impl Shell {
    pub fn new(centerx: i32, bottom: i32, direction: Direction) -> Self {
        Self {
            body: Body::standing_at(centerx, bottom, SHELL_SIZE, direction),
            state: ShellState::Idle,
            alive: true,
        }
    }

    /// Moving sideways, whether on the ground or airborne
    pub fn is_sliding(&self) -> bool {
        self.body.vel.x != 0.0
    }

    /// Send the shell sliding toward `direction`
    pub fn kick(&mut self, direction: Direction) {
        self.body.direction = direction;
        self.body.walk(SHELL_SPEED);
        if self.state != ShellState::Fall {
            self.state = ShellState::Slide;
        }
    }

    /// Bring a sliding shell to rest
    pub fn stop(&mut self) {
        self.body.vel.x = 0.0;
        if self.state == ShellState::Slide {
            self.state = ShellState::Idle;
        }
    }

    /// Reverse after striking a wall
    pub fn rebound(&mut self) {
        self.body.direction = self.body.direction.flipped();
        self.body.walk(SHELL_SPEED);
    }

    pub fn land(&mut self) {
        self.body.vel.y = 0.0;
        self.state = if self.is_sliding() {
            ShellState::Slide
        } else {
            ShellState::Idle
        };
    }

    pub fn start_fall(&mut self) {
        self.state = ShellState::Fall;
    }

    pub fn into_death_jump(self, direction: Direction) -> Dying {
        Dying::death_jump(self.body, DyingKind::Shell, direction)
    }
}

impl Actor for Shell {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, _ctx: &FrameContext) {
        match self.state {
            ShellState::Idle => self.body.vel = Vec2::ZERO,
            ShellState::Slide => {
                self.body.walk(SHELL_SPEED);
                self.body.vel.y = 0.0;
            }
            ShellState::Fall => self.body.fall(ENEMY_GRAVITY, MAX_Y_VEL),
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

/// What a dying entity used to be (kept for drawing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DyingKind {
    Goomba,
    Koopa,
    Shell,
}

impl From<EnemyKind> for DyingKind {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Goomba => DyingKind::Goomba,
            EnemyKind::Koopa => DyingKind::Koopa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DyingState {
    /// Squashed in place for a moment
    JumpedOn { timer: f32 },
    /// Flipped and falling off the bottom of the screen
    DeathJump,
}

/// A killed hostile playing out its death animation; never collides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dying {
    pub body: Body,
    pub kind: DyingKind,
    pub state: DyingState,
    pub alive: bool,
}

impl Dying {
    pub fn death_jump(mut body: Body, kind: DyingKind, direction: Direction) -> Self {
        body.direction = direction;
        body.vel = Vec2::new(ENEMY_SPEED * direction.sign(), DYING_JUMP_VEL);
        Self {
            body,
            kind,
            state: DyingState::DeathJump,
            alive: true,
        }
    }

    pub fn jumped_on(mut body: Body, kind: DyingKind) -> Self {
        body.vel = Vec2::ZERO;
        Self {
            body,
            kind,
            state: DyingState::JumpedOn {
                timer: JUMPED_ON_DURATION,
            },
            alive: true,
        }
    }
}

impl Actor for Dying {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, ctx: &FrameContext) {
        match &mut self.state {
            DyingState::JumpedOn { timer } => {
                *timer -= ctx.dt;
                if *timer <= 0.0 {
                    self.alive = false;
                }
            }
            DyingState::DeathJump => {
                self.body.step_x();
                self.body.step_y();
                self.body.vel.y += DYING_GRAVITY;
                if self.body.rect().top() > ctx.viewport.bottom() {
                    self.alive = false;
                }
            }
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
