//! Level state and core simulation types
//!
//! Everything the update loop mutates lives in [`World`]. It is plain data
//! (serde-serializable) so a level can be snapshotted and inspected.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, Category, CollisionOutcome, Contact};
use super::enemy::{Dying, Enemy, Shell};
use super::entity::Direction;
use super::flagpole::Flagpole;
use super::item::{BrickPiece, Coin, Powerup};
use super::obstacle::{ObstacleRegistry, Release};
use super::player::Player;
use super::rect::Rect;
use super::score::{PopupValue, ScorePopup};
use crate::audio::SoundEffect;
use crate::consts::*;

/// How a level ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelOutcome {
    Cleared,
    Died,
}

/// Which update path runs this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Everything updates
    #[default]
    Playing,
    /// Only the player and score popups update (power transitions, death)
    Frozen,
    /// Remaining time is converted to score
    InCastle,
    /// Short celebration before the level ends
    FlagAndFireworks,
    Finished(LevelOutcome),
}

/// What a checkpoint does when the player crosses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Release the enemy group with this index
    EnemyGroup(usize),
    Flagpole,
}

/// Invisible full-height trigger strip; fires once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub name: String,
    pub rect: Rect,
    pub trigger: Trigger,
}

pub const CHECKPOINT_WIDTH: i32 = 10;

impl Checkpoint {
    pub fn new(name: impl Into<String>, x: i32, height: i32, trigger: Trigger) -> Self {
        Self {
            name: name.into(),
            rect: Rect::new(x, 0, CHECKPOINT_WIDTH, height),
            trigger,
        }
    }
}

/// A player collision, reported for diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionRecord {
    pub axis: Axis,
    pub category: Category,
    /// Obstacle display name, when the collider has one
    pub name: Option<String>,
    pub mover: Rect,
    pub other: Rect,
}

/// Things that happened during a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundEffect),
    Collision(CollisionRecord),
    CheckpointFired(String),
    PhaseChanged(GamePhase),
}

/// Complete live state of one level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub phase: GamePhase,
    /// Camera rectangle in level pixels
    pub viewport: Rect,
    pub level_width: i32,
    pub castle_door_x: i32,

    pub player: Player,
    pub obstacles: ObstacleRegistry,
    /// Active hostiles
    pub enemies: Vec<Enemy>,
    pub shells: Vec<Shell>,
    pub dying: Vec<Dying>,
    pub powerups: Vec<Powerup>,
    pub coins: Vec<Coin>,
    pub debris: Vec<BrickPiece>,
    pub popups: Vec<ScorePopup>,

    /// Dormant hostile groups, released by checkpoints (emptied on release)
    pub enemy_groups: Vec<Vec<Enemy>>,
    /// Checkpoints not yet fired
    pub checkpoints: Vec<Checkpoint>,
    pub flagpole: Flagpole,

    pub score: u32,
    pub coin_total: u32,
    pub lives: u32,
    /// Level clock in time units
    pub time_left: u32,
    /// Seconds accumulated toward the next time unit
    pub(crate) clock: f32,
    /// Seconds spent in the current death or fireworks sequence
    pub(crate) phase_timer: f32,
    pub frame: u64,

    /// Events raised during the last frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl World {
    /// Empty level with only a player and a flagpole beyond `level_width`
    pub fn new(viewport: Rect, level_width: i32, player: Player) -> Self {
        Self {
            phase: GamePhase::Playing,
            viewport,
            level_width,
            castle_door_x: level_width,
            player,
            obstacles: ObstacleRegistry::new(),
            enemies: Vec::new(),
            shells: Vec::new(),
            dying: Vec::new(),
            powerups: Vec::new(),
            coins: Vec::new(),
            debris: Vec::new(),
            popups: Vec::new(),
            enemy_groups: Vec::new(),
            checkpoints: Vec::new(),
            flagpole: Flagpole::new(level_width, 0, viewport.bottom(), viewport.bottom()),
            score: 0,
            coin_total: 0,
            lives: 3,
            time_left: 400,
            clock: 0.0,
            phase_timer: 0.0,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn outcome(&self) -> Option<LevelOutcome> {
        match self.phase {
            GamePhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} at frame {}", self.phase, phase, self.frame);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    pub fn sound(&mut self, effect: SoundEffect) {
        self.events.push(GameEvent::Sound(effect));
    }

    /// Add points and float a popup from the top of `at`
    pub fn award(&mut self, points: u32, at: Rect) {
        self.score += points;
        self.popups.push(ScorePopup::new(
            IVec2::new(at.centerx(), at.top()),
            PopupValue::Points(points),
        ));
    }

    pub fn award_life(&mut self, at: Rect) {
        self.lives += 1;
        self.popups
            .push(ScorePopup::new(IVec2::new(at.centerx(), at.top()), PopupValue::OneUp));
    }

    /// Knock enemy `index` off screen toward `direction`
    pub fn kill_enemy(&mut self, index: usize, direction: Direction, points: u32) {
        let Some(enemy) = self.enemies.get_mut(index).filter(|e| e.alive) else {
            return;
        };
        enemy.alive = false;
        let rect = enemy.body.rect();
        let corpse = enemy.clone().into_death_jump(direction);
        self.dying.push(corpse);
        self.sound(SoundEffect::Kick);
        if points > 0 {
            self.award(points, rect);
        }
    }

    /// Knock shell `index` off screen toward `direction`
    pub fn kill_shell(&mut self, index: usize, direction: Direction, points: u32) {
        let Some(shell) = self.shells.get_mut(index).filter(|s| s.alive) else {
            return;
        };
        shell.alive = false;
        let rect = shell.body.rect();
        let corpse = shell.clone().into_death_jump(direction);
        self.dying.push(corpse);
        self.sound(SoundEffect::Kick);
        if points > 0 {
            self.award(points, rect);
        }
    }

    /// Hand out what a bumped block released
    pub fn release_from_block(&mut self, block: Rect, release: Release) {
        match release {
            Release::Coin => {
                self.sound(SoundEffect::Coin);
                self.coin_total += 1;
                self.coins.push(Coin::pop_from(block));
                self.award(COIN_SCORE, block);
            }
            Release::Powerup(kind) => {
                self.sound(SoundEffect::PowerupAppears);
                self.powerups.push(Powerup::reveal_from(kind, block));
            }
        }
    }

    /// Report a player collision for diagnostics
    pub fn record_collision(&mut self, axis: Axis, outcome: &CollisionOutcome) {
        let Some(contact) = outcome.contact() else {
            return;
        };
        let record = CollisionRecord {
            axis,
            category: contact.category,
            name: self.contact_name(contact),
            mover: self.player.body.rect(),
            other: contact.rect,
        };
        self.events.push(GameEvent::Collision(record));
    }

    fn contact_name(&self, contact: &Contact) -> Option<String> {
        self.obstacles
            .category(contact.category)
            .get(contact.index)
            .map(|o| o.name.clone())
    }

    /// Drop everything flagged dead this frame
    pub fn cull(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.shells.retain(|s| s.alive);
        self.dying.retain(|d| d.alive);
        self.powerups.retain(|p| p.alive);
        self.coins.retain(|c| c.alive);
        self.debris.retain(|d| d.alive);
        self.popups.retain(|p| p.alive);
        self.player.fireballs.retain(|f| f.alive);
        self.obstacles.retain_alive();
    }
}
