//! Player state machine
//!
//! Input and elapsed time drive the state transitions here. Collision
//! consequences (landing, stomping, getting hurt) are applied by the
//! collision passes through the small methods at the bottom of the impl.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Actor, Body, Direction, FrameContext};
use super::item::Fireball;
use super::rect::Rect;
use super::tick::TickInput;
use crate::approach;
use crate::audio::SoundEffect;
use crate::consts::*;
use crate::displacement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Stand,
    Walk,
    /// Walking with the run button held
    Run,
    Jump,
    Fall,
    SmallToBig,
    BigToFire,
    BigToSmall,
    DeathJump,
    Flagpole,
    EndOfLevelFall,
    WalkingToCastle,
    InCastle,
}

impl PlayerState {
    /// Growing or shrinking; the rest of the level waits
    pub fn is_transition(self) -> bool {
        matches!(
            self,
            PlayerState::SmallToBig | PlayerState::BigToFire | PlayerState::BigToSmall
        )
    }

    /// States in which the player does not collide with anything
    pub fn ignores_collisions(self) -> bool {
        matches!(self, PlayerState::DeathJump | PlayerState::InCastle) || self.is_transition()
    }

    /// States in which vertical movement is scripted rather than resolved
    pub fn skips_vertical(self) -> bool {
        self.ignores_collisions() || self == PlayerState::Flagpole
    }

    /// The flag has been grabbed; the level clock is stopped
    pub fn is_level_end(self) -> bool {
        matches!(
            self,
            PlayerState::Flagpole
                | PlayerState::EndOfLevelFall
                | PlayerState::WalkingToCastle
                | PlayerState::InCastle
        )
    }

    /// Player-controlled states
    pub fn is_free(self) -> bool {
        matches!(
            self,
            PlayerState::Stand
                | PlayerState::Walk
                | PlayerState::Run
                | PlayerState::Jump
                | PlayerState::Fall
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub state: PlayerState,
    pub big: bool,
    pub fire: bool,
    /// Star power: touching hostiles kills them
    pub invincible: bool,
    invincible_timer: f32,
    /// Grace period after shrinking: hostiles pass through
    pub hurt_invincible: bool,
    hurt_timer: f32,
    pub dead: bool,
    pub in_castle: bool,
    pub fireballs: Vec<Fireball>,
    allow_jump: bool,
    allow_fireball: bool,
    transition_timer: f32,
    /// Where the pole slide stops
    pole_bottom: i32,
    #[serde(skip)]
    sounds: Vec<SoundEffect>,
}

impl Player {
    /// Small player standing at `x` with feet on `bottom`
    pub fn new(x: i32, bottom: i32) -> Self {
        let mut body = Body::standing_at(0, bottom, SMALL_SIZE, Direction::Right);
        body.set_left(x);
        Self {
            body,
            state: PlayerState::Stand,
            big: false,
            fire: false,
            invincible: false,
            invincible_timer: 0.0,
            hurt_invincible: false,
            hurt_timer: 0.0,
            dead: false,
            in_castle: false,
            fireballs: Vec::new(),
            allow_jump: true,
            allow_fireball: true,
            transition_timer: 0.0,
            pole_bottom: 0,
            sounds: Vec::new(),
        }
    }

    /// Sound cues raised since the last call
    pub fn take_sounds(&mut self) -> Vec<SoundEffect> {
        std::mem::take(&mut self.sounds)
    }

    /// Neither star power nor the post-hit grace period is active
    pub fn is_vulnerable(&self) -> bool {
        !self.invincible && !self.hurt_invincible
    }

    fn tick_timers(&mut self, dt: f32) {
        if self.invincible {
            self.invincible_timer -= dt;
            if self.invincible_timer <= 0.0 {
                self.invincible = false;
                self.invincible_timer = 0.0;
            }
        }
        if self.hurt_invincible {
            self.hurt_timer -= dt;
            if self.hurt_timer <= 0.0 {
                self.hurt_invincible = false;
                self.hurt_timer = 0.0;
            }
        }
    }

    fn horizontal_control(&mut self, input: &TickInput) {
        let (accel, max) = if input.action {
            (RUN_ACCEL, MAX_RUN_SPEED)
        } else {
            (WALK_ACCEL, MAX_WALK_SPEED)
        };
        let vel = &mut self.body.vel.x;

        match (input.left, input.right) {
            (true, false) => {
                self.body.direction = Direction::Left;
                *vel = if *vel > 0.0 {
                    *vel - TURNAROUND
                } else {
                    approach(*vel, -max, accel)
                };
            }
            (false, true) => {
                self.body.direction = Direction::Right;
                *vel = if *vel < 0.0 {
                    *vel + TURNAROUND
                } else {
                    approach(*vel, max, accel)
                };
            }
            _ => *vel = approach(*vel, 0.0, accel),
        }
    }

    fn start_jump(&mut self) {
        self.allow_jump = false;
        self.body.vel.y = if self.body.vel.x.abs() > FAST_JUMP_THRESHOLD {
            FAST_JUMP_VEL
        } else {
            JUMP_VEL
        };
        self.state = PlayerState::Jump;
    }

    fn walking(&mut self, input: &TickInput) {
        self.horizontal_control(input);
        if input.jump && self.allow_jump {
            self.start_jump();
            return;
        }
        self.body.vel.y = 0.0;
        let moving = input.left || input.right;
        self.state = if self.body.vel.x == 0.0 && !moving {
            PlayerState::Stand
        } else if input.action && moving {
            PlayerState::Run
        } else {
            PlayerState::Walk
        };
    }

    fn jumping(&mut self, input: &TickInput) {
        self.horizontal_control(input);
        if input.jump && self.body.vel.y < 0.0 {
            self.body.vel.y += JUMP_GRAVITY;
        } else {
            self.body.vel.y += GRAVITY;
        }
        if self.body.vel.y >= 0.0 {
            self.state = PlayerState::Fall;
        }
        self.body.vel.y = self.body.vel.y.min(MAX_Y_VEL);
    }

    fn falling(&mut self, input: &TickInput) {
        self.horizontal_control(input);
        self.body.fall(GRAVITY, MAX_Y_VEL);
    }

    fn transitioning(&mut self, dt: f32) {
        self.transition_timer -= dt;
        if self.transition_timer > 0.0 {
            return;
        }
        match self.state {
            PlayerState::SmallToBig => {
                self.big = true;
                self.body.resize(BIG_SIZE);
            }
            PlayerState::BigToFire => {
                self.big = true;
                self.fire = true;
            }
            PlayerState::BigToSmall => {
                self.big = false;
                self.fire = false;
                self.body.resize(SMALL_SIZE);
                self.hurt_invincible = true;
                self.hurt_timer = HURT_INVINCIBLE_DURATION;
            }
            _ => {}
        }
        self.transition_timer = 0.0;
        self.state = PlayerState::Walk;
    }

    fn slide_down_pole(&mut self) {
        self.body.vel = Vec2::ZERO;
        if self.body.rect().bottom() < self.pole_bottom {
            let bottom = (self.body.rect().bottom() + displacement(POLE_SLIDE_SPEED)).min(self.pole_bottom);
            self.body.set_bottom(bottom);
        }
    }

    fn throw_fireball(&mut self, input: &TickInput) {
        if !self.fire || !input.action || !self.allow_fireball {
            return;
        }
        if self.fireballs.iter().filter(|f| f.alive).count() >= MAX_FIREBALLS {
            return;
        }
        self.allow_fireball = false;
        self.fireballs
            .push(Fireball::launch(self.body.rect(), self.body.direction));
        self.sounds.push(SoundEffect::Fireball);
    }

    // --- collision consequences ---

    /// Feet met a floor
    pub fn land(&mut self) {
        self.body.vel.y = 0.0;
        self.state = match self.state {
            PlayerState::EndOfLevelFall | PlayerState::WalkingToCastle => PlayerState::WalkingToCastle,
            PlayerState::Stand => PlayerState::Stand,
            PlayerState::Run => PlayerState::Run,
            _ => PlayerState::Walk,
        };
    }

    /// Head struck the underside of something
    pub fn head_bump(&mut self) {
        self.body.vel.y = HEAD_BUMP_VEL;
        self.state = PlayerState::Fall;
    }

    /// Nothing underfoot
    pub fn start_fall(&mut self) {
        if matches!(self.state, PlayerState::Stand | PlayerState::Walk | PlayerState::Run) {
            self.state = PlayerState::Fall;
        }
    }

    /// Bounce off a stomped hostile
    pub fn stomp_bounce(&mut self) {
        self.body.vel.y = STOMP_BOUNCE_VEL;
        self.state = PlayerState::Fall;
    }

    /// Begin a timed size/power transition
    pub fn start_transition(&mut self, state: PlayerState) {
        debug_assert!(state.is_transition());
        self.transition_timer = match state {
            PlayerState::SmallToBig => SMALL_TO_BIG_DURATION,
            PlayerState::BigToFire => BIG_TO_FIRE_DURATION,
            _ => BIG_TO_SMALL_DURATION,
        };
        self.state = state;
    }

    /// Hit by a hostile while big: lose power and shrink
    pub fn shrink(&mut self) {
        self.fire = false;
        self.body.vel.y = HURT_NUDGE_VEL;
        self.start_transition(PlayerState::BigToSmall);
    }

    pub fn start_death_jump(&mut self) {
        self.dead = true;
        self.body.vel = Vec2::new(0.0, DEATH_JUMP_VEL);
        self.state = PlayerState::DeathJump;
        self.sounds.push(SoundEffect::Death);
    }

    pub fn make_invincible(&mut self) {
        self.invincible = true;
        self.invincible_timer = STAR_DURATION;
    }

    /// Snap against `pole` and start sliding toward its base
    pub fn grab_pole(&mut self, pole: Rect) {
        self.body.vel = Vec2::ZERO;
        self.body.direction = Direction::Right;
        self.body.set_right(pole.left());
        self.pole_bottom = pole.bottom();
        self.state = PlayerState::Flagpole;
    }

    /// Step round to the far side of the pole and drop to the ground
    pub fn leave_pole(&mut self, pole: Rect) {
        self.body.set_left(pole.right());
        self.body.vel = Vec2::ZERO;
        self.state = PlayerState::EndOfLevelFall;
    }

    pub fn is_on_pole_base(&self) -> bool {
        self.state == PlayerState::Flagpole && self.body.rect().bottom() >= self.pole_bottom
    }

    pub fn enter_castle(&mut self) {
        self.body.vel = Vec2::ZERO;
        self.in_castle = true;
        self.state = PlayerState::InCastle;
    }
}

impl Actor for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn advance(&mut self, ctx: &FrameContext) {
        self.tick_timers(ctx.dt);

        let input = ctx.input;
        if !input.jump {
            self.allow_jump = true;
        }
        if !input.action {
            self.allow_fireball = true;
        }

        match self.state {
            PlayerState::Stand | PlayerState::Walk | PlayerState::Run => self.walking(&input),
            PlayerState::Jump => self.jumping(&input),
            PlayerState::Fall => self.falling(&input),
            PlayerState::SmallToBig | PlayerState::BigToFire | PlayerState::BigToSmall => {
                self.transitioning(ctx.dt)
            }
            PlayerState::DeathJump => {
                self.body.step_y();
                self.body.vel.y += DEATH_GRAVITY;
            }
            PlayerState::Flagpole => self.slide_down_pole(),
            PlayerState::EndOfLevelFall => {
                self.body.vel.x = 0.0;
                self.body.fall(GRAVITY, MAX_Y_VEL);
            }
            PlayerState::WalkingToCastle => {
                self.body.direction = Direction::Right;
                self.body.vel.x = CASTLE_WALK_SPEED;
                self.body.fall(GRAVITY, MAX_Y_VEL);
            }
            PlayerState::InCastle => self.body.vel = Vec2::ZERO,
        }

        if self.state.is_free() {
            self.throw_fireball(&input);
        }
    }

    fn is_alive(&self) -> bool {
        !self.dead
    }
}
