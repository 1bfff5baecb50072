//! Level layouts
//!
//! A layout is configuration data: where the obstacles, coins, dormant enemy
//! groups and checkpoints are. It is validated once and then turned into a
//! fresh [`World`].

use std::collections::HashSet;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::entity::Direction;
use super::flagpole::Flagpole;
use super::item::Coin;
use super::obstacle::{Contents, Obstacle, ObstacleKind};
use super::player::Player;
use super::rect::Rect;
use super::state::{Checkpoint, Trigger, World};
use crate::error::LayoutError;
use crate::progress::Progress;

const BUILTIN: &str = include_str!("../../levels/underground.json");

fn default_time_limit() -> u32 {
    400
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: i32,
    pub height: i32,
}

/// Player spawn: left edge and feet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub x: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub kind: ObstacleKind,
    pub name: String,
    pub rect: Rect,
    #[serde(default)]
    pub contents: Option<Contents>,
}

/// Top-left of a resting coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinSpec {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub kind: EnemyKind,
    pub x: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyGroupSpec {
    pub name: String,
    pub enemies: Vec<EnemySpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointSpec {
    pub name: String,
    pub x: i32,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagpoleSpec {
    pub x: i32,
    pub top: i32,
    pub flag_bottom: i32,
    pub pole_bottom: i32,
}

/// Everything needed to set up a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub name: String,
    pub viewport: ViewportSize,
    #[serde(default)]
    pub camera_start_x: i32,
    pub level_width: i32,
    /// Top of the ground line; nothing spawns below it
    pub ground_height: i32,
    #[serde(default = "default_time_limit")]
    pub time_limit: u32,
    pub player_start: Spawn,
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub coins: Vec<CoinSpec>,
    #[serde(default)]
    pub enemy_groups: Vec<EnemyGroupSpec>,
    #[serde(default)]
    pub checkpoints: Vec<CheckpointSpec>,
    pub flagpole: Option<FlagpoleSpec>,
    pub castle_door_x: i32,
}

impl LevelLayout {
    /// The level shipped with the crate
    pub fn builtin() -> Result<Self, LayoutError> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Reject layouts the simulation cannot run
    pub fn validate(&self) -> Result<(), LayoutError> {
        let ViewportSize { width, height } = self.viewport;
        if width <= 0 || height <= 0 || self.level_width < width {
            return Err(LayoutError::InvalidViewport {
                width,
                height,
                level_width: self.level_width,
            });
        }

        if self.ground_height <= 0 || self.ground_height > height {
            return Err(LayoutError::InvalidViewport {
                width,
                height,
                level_width: self.level_width,
            });
        }
        let spawns = std::iter::once(("player_start".to_string(), self.player_start.bottom)).chain(
            self.enemy_groups.iter().flat_map(|group| {
                group
                    .enemies
                    .iter()
                    .enumerate()
                    .map(move |(i, e)| (format!("{}[{i}]", group.name), e.bottom))
            }),
        );
        for (name, bottom) in spawns {
            if bottom > self.ground_height {
                return Err(LayoutError::BelowGround {
                    name,
                    bottom,
                    ground_height: self.ground_height,
                });
            }
        }

        for spec in &self.obstacles {
            if !spec.rect.is_valid() {
                return Err(LayoutError::DegenerateRect {
                    name: spec.name.clone(),
                    rect: spec.rect,
                });
            }
        }
        for (i, a) in self.obstacles.iter().enumerate() {
            if let Some(b) = self.obstacles[i + 1..]
                .iter()
                .find(|b| a.rect.intersects(&b.rect))
            {
                return Err(LayoutError::OverlappingObstacles {
                    first: a.name.clone(),
                    second: b.name.clone(),
                });
            }
        }

        let mut names = HashSet::new();
        let mut groups = HashSet::new();
        let mut has_flag_trigger = false;
        for checkpoint in &self.checkpoints {
            if !names.insert(checkpoint.name.as_str()) {
                return Err(LayoutError::DuplicateCheckpoint {
                    name: checkpoint.name.clone(),
                });
            }
            match checkpoint.trigger {
                Trigger::EnemyGroup(group) if group >= self.enemy_groups.len() => {
                    return Err(LayoutError::UnknownEnemyGroup {
                        checkpoint: checkpoint.name.clone(),
                        group,
                        available: self.enemy_groups.len(),
                    });
                }
                Trigger::EnemyGroup(group) => {
                    if !groups.insert(group) {
                        return Err(LayoutError::DuplicateCheckpoint {
                            name: checkpoint.name.clone(),
                        });
                    }
                }
                Trigger::Flagpole => has_flag_trigger = true,
            }
        }

        if self.flagpole.is_none() || !has_flag_trigger {
            return Err(LayoutError::MissingFlagpole);
        }
        Ok(())
    }

    /// Fresh world for this layout, carrying the counters in `progress`
    pub fn build(&self, progress: &Progress) -> Result<World, LayoutError> {
        self.validate()?;
        let flag = self.flagpole.ok_or(LayoutError::MissingFlagpole)?;

        let ViewportSize { width, height } = self.viewport;
        let camera_x = progress
            .camera_start_x
            .max(self.camera_start_x)
            .clamp(0, self.level_width - width);
        let viewport = Rect::new(camera_x, 0, width, height);
        let player = Player::new(camera_x + self.player_start.x, self.player_start.bottom);

        let mut world = World::new(viewport, self.level_width, player);
        for (id, spec) in self.obstacles.iter().enumerate() {
            world.obstacles.insert(
                Obstacle::new(id as u32, spec.name.clone(), spec.kind, spec.rect).with_contents(spec.contents),
            );
        }
        world.coins = self
            .coins
            .iter()
            .map(|c| Coin::resting(IVec2::new(c.x, c.y)))
            .collect();
        world.enemy_groups = self
            .enemy_groups
            .iter()
            .map(|group| {
                group
                    .enemies
                    .iter()
                    .map(|e| Enemy::new(e.kind, e.x, e.bottom, Direction::Left))
                    .collect()
            })
            .collect();
        world.checkpoints = self
            .checkpoints
            .iter()
            .map(|c| Checkpoint::new(c.name.clone(), c.x, height, c.trigger))
            .collect();
        world.flagpole = Flagpole::new(flag.x, flag.top, flag.flag_bottom, flag.pole_bottom);
        world.castle_door_x = self.castle_door_x;

        world.score = progress.score;
        world.coin_total = progress.coin_total;
        world.lives = progress.lives;
        world.time_left = self.time_limit;

        log::info!(
            "Level '{}' built: {} obstacles, {} coins, {} enemy groups, {} checkpoints",
            self.name,
            world.obstacles.len(),
            world.coins.len(),
            world.enemy_groups.len(),
            world.checkpoints.len()
        );
        Ok(world)
    }
}
