//! Static and semi-static collidables
//!
//! Ground, pipes and steps never change. Bricks and item boxes carry a small
//! state machine (resting, bumped, opened) and optional contents that are
//! released when the block is struck from below.

use serde::{Deserialize, Serialize};

use super::collision::Category;
use super::item::PowerupKind;
use super::rect::Rect;
use crate::consts::*;
use crate::displacement;

/// Obstacle categories as they appear in level layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Ground,
    Pipe,
    Step,
    Brick,
    ItemBox,
}

impl ObstacleKind {
    /// Collision category the obstacle is resolved under
    pub fn category(self) -> Category {
        match self {
            ObstacleKind::Ground | ObstacleKind::Pipe | ObstacleKind::Step => Category::Terrain,
            ObstacleKind::Brick => Category::Brick,
            ObstacleKind::ItemBox => Category::ItemBox,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Ground => "ground",
            ObstacleKind::Pipe => "pipe",
            ObstacleKind::Step => "step",
            ObstacleKind::Brick => "brick",
            ObstacleKind::ItemBox => "item_box",
        }
    }
}

/// What a brick or item box releases when bumped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contents {
    Coin,
    Mushroom,
    FireFlower,
    Star,
    SixCoins,
    LifeMushroom,
}

impl Contents {
    /// Powerup spawned for this content, if it is not a coin
    pub fn powerup(self) -> Option<PowerupKind> {
        match self {
            Contents::Coin | Contents::SixCoins => None,
            Contents::Mushroom => Some(PowerupKind::Mushroom),
            Contents::FireFlower => Some(PowerupKind::FireFlower),
            Contents::Star => Some(PowerupKind::Star),
            Contents::LifeMushroom => Some(PowerupKind::LifeMushroom),
        }
    }
}

/// Block animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockState {
    #[default]
    Resting,
    /// Struck from below, bouncing up and back
    Bumped,
    /// Emptied; solid but inert
    Opened,
}

/// Something a block hands to the level when bumped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Coin,
    Powerup(PowerupKind),
}

/// A collidable obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub name: String,
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub contents: Option<Contents>,
    pub state: BlockState,
    /// Resting y position (blocks move while bumped)
    rest_y: i32,
    bump_vel: f32,
    coins_left: u8,
    /// Whether the block started with contents (empty bricks never open)
    filled: bool,
    pub alive: bool,
}

impl Obstacle {
    pub fn new(id: u32, name: impl Into<String>, kind: ObstacleKind, rect: Rect) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            rect,
            contents: None,
            state: BlockState::Resting,
            rest_y: rect.y,
            bump_vel: 0.0,
            coins_left: 0,
            filled: false,
            alive: true,
        }
    }

    pub fn with_contents(mut self, contents: Option<Contents>) -> Self {
        self.contents = contents;
        self.filled = contents.is_some();
        self.coins_left = match contents {
            Some(Contents::SixCoins) => SIX_COINS,
            Some(_) => 1,
            None => 0,
        };
        self
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// Begin the bump animation. Coins come out immediately; powerups wait
    /// until the block settles.
    pub fn start_bump(&mut self) -> Option<Release> {
        if self.state != BlockState::Resting {
            return None;
        }
        self.state = BlockState::Bumped;
        self.bump_vel = BUMP_VEL;

        match self.contents {
            Some(Contents::Coin) => {
                self.contents = None;
                Some(Release::Coin)
            }
            Some(Contents::SixCoins) => {
                self.coins_left = self.coins_left.saturating_sub(1);
                if self.coins_left == 0 {
                    self.contents = None;
                }
                Some(Release::Coin)
            }
            _ => None,
        }
    }

    /// Advance the bump animation by one frame
    pub fn advance(&mut self) -> Option<Release> {
        if self.state != BlockState::Bumped {
            return None;
        }
        self.rect.y += displacement(self.bump_vel);
        self.bump_vel += BUMP_GRAVITY;

        if self.bump_vel <= 0.0 || self.rect.y < self.rest_y {
            return None;
        }

        self.rect.y = self.rest_y;
        self.bump_vel = 0.0;
        let release = self.contents.and_then(Contents::powerup).map(|kind| {
            self.contents = None;
            Release::Powerup(kind)
        });
        let emptied = self.contents.is_none() && (self.filled || self.kind == ObstacleKind::ItemBox);
        self.state = if emptied {
            BlockState::Opened
        } else {
            BlockState::Resting
        };
        release
    }

    /// Swap one kind of content for another (power state changes what blocks hold)
    pub fn morph_contents(&mut self, from: Contents, to: Contents) {
        if self.contents == Some(from) {
            self.contents = Some(to);
        }
    }
}

/// Obstacles partitioned by collision category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRegistry {
    pub terrain: Vec<Obstacle>,
    pub bricks: Vec<Obstacle>,
    pub item_boxes: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// File an obstacle under its category
    pub fn insert(&mut self, obstacle: Obstacle) {
        match obstacle.kind {
            ObstacleKind::Ground | ObstacleKind::Pipe | ObstacleKind::Step => self.terrain.push(obstacle),
            ObstacleKind::Brick => self.bricks.push(obstacle),
            ObstacleKind::ItemBox => self.item_boxes.push(obstacle),
        }
    }

    /// Obstacles in one category (empty for mover categories)
    pub fn category(&self, category: Category) -> &[Obstacle] {
        match category {
            Category::Terrain => &self.terrain,
            Category::Brick => &self.bricks,
            Category::ItemBox => &self.item_boxes,
            Category::Enemy | Category::Shell | Category::Powerup | Category::Coin => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.terrain
            .iter()
            .chain(self.bricks.iter())
            .chain(self.item_boxes.iter())
    }

    pub fn len(&self) -> usize {
        self.terrain.len() + self.bricks.len() + self.item_boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace `from` contents with `to` in every brick and item box
    pub fn morph_contents(&mut self, from: Contents, to: Contents) {
        for block in self.bricks.iter_mut().chain(self.item_boxes.iter_mut()) {
            block.morph_contents(from, to);
        }
    }

    /// Drop destroyed blocks
    pub fn retain_alive(&mut self) {
        self.bricks.retain(|b| b.alive);
    }
}
