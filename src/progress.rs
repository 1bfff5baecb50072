//! Carry-over record between levels
//!
//! Read when a level is set up, written back when it ends. Also decides
//! which scene follows the level.

use serde::{Deserialize, Serialize};

use crate::sim::{LevelOutcome, World};

/// What the game shows after a level ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextScene {
    GameOver,
    /// Replay the same level
    Retry,
    MainMenu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub score: u32,
    pub top_score: u32,
    pub coin_total: u32,
    pub lives: u32,
    /// Level clock carried over (the layout's limit when starting fresh)
    pub time_left: u32,
    pub player_dead: bool,
    /// Where the camera starts on a retry; set by dying past the midpoint
    pub camera_start_x: i32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            score: 0,
            top_score: 0,
            coin_total: 0,
            lives: 3,
            time_left: 400,
            player_dead: false,
            camera_start_x: 0,
        }
    }
}

impl Progress {
    /// Copy the end-of-level counters out of `world`
    pub fn record(&mut self, world: &World) {
        self.score = world.score;
        self.top_score = self.top_score.max(world.score);
        self.coin_total = world.coin_total;
        self.lives = world.lives;
        self.time_left = world.time_left;
        self.player_dead = world.player.dead;

        if !world.player.dead {
            self.camera_start_x = 0;
        } else if world.player.body.rect().centerx() >= world.level_width / 2 {
            self.camera_start_x = self.camera_start_x.max(world.viewport.x);
        }
    }

    /// Charge a life for a death and pick the next scene
    pub fn finish(&mut self, outcome: LevelOutcome) -> NextScene {
        self.player_dead = outcome == LevelOutcome::Died;
        if self.player_dead {
            self.lives = self.lives.saturating_sub(1);
        }

        let next = if self.lives == 0 {
            self.camera_start_x = 0;
            NextScene::GameOver
        } else {
            match outcome {
                LevelOutcome::Died => NextScene::Retry,
                LevelOutcome::Cleared => NextScene::MainMenu,
            }
        };
        log::info!(
            "Level ended ({:?}): score={} lives={} -> {:?}",
            outcome,
            self.score,
            self.lives,
            next
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_costs_a_life() {
        let mut progress = Progress::default();
        assert_eq!(progress.finish(LevelOutcome::Died), NextScene::Retry);
        assert_eq!(progress.lives, 2);
        assert!(progress.player_dead);
    }

    #[test]
    fn test_last_life_is_game_over() {
        let mut progress = Progress {
            lives: 1,
            ..Progress::default()
        };
        assert_eq!(progress.finish(LevelOutcome::Died), NextScene::GameOver);
        assert_eq!(progress.lives, 0);
    }

    #[test]
    fn test_clearing_returns_to_menu() {
        let mut progress = Progress::default();
        assert_eq!(progress.finish(LevelOutcome::Cleared), NextScene::MainMenu);
        assert_eq!(progress.lives, 3);
        assert!(!progress.player_dead);
    }

    #[test]
    fn test_top_score_only_rises() {
        let mut progress = Progress {
            top_score: 5000,
            ..Progress::default()
        };
        let mut world = World::new(
            crate::sim::Rect::new(0, 0, 800, 600),
            4000,
            crate::sim::Player::new(110, 538),
        );
        world.score = 1200;
        progress.record(&world);
        assert_eq!(progress.score, 1200);
        assert_eq!(progress.top_score, 5000);

        world.score = 9000;
        progress.record(&world);
        assert_eq!(progress.top_score, 9000);
    }

    fn world_at(camera_x: i32, dead: bool) -> World {
        let mut world = World::new(
            crate::sim::Rect::new(camera_x, 0, 800, 600),
            4000,
            crate::sim::Player::new(camera_x + 300, 538),
        );
        if dead {
            world.player.start_death_jump();
        }
        world
    }

    #[test]
    fn test_death_past_midpoint_sets_restart_camera() {
        let mut progress = Progress::default();
        progress.record(&world_at(1000, true));
        assert_eq!(progress.camera_start_x, 0);

        progress.record(&world_at(2100, true));
        assert_eq!(progress.camera_start_x, 2100);
        assert_eq!(progress.finish(LevelOutcome::Died), NextScene::Retry);
        assert_eq!(progress.camera_start_x, 2100);

        // an earlier death on the retry keeps the restart point
        progress.record(&world_at(1900, true));
        assert_eq!(progress.camera_start_x, 2100);
    }

    #[test]
    fn test_restart_camera_cleared_on_clear_and_game_over() {
        let mut progress = Progress {
            camera_start_x: 2100,
            ..Progress::default()
        };
        progress.record(&world_at(3200, false));
        assert_eq!(progress.camera_start_x, 0);

        let mut progress = Progress {
            camera_start_x: 2100,
            lives: 1,
            ..Progress::default()
        };
        progress.record(&world_at(2500, true));
        assert_eq!(progress.finish(LevelOutcome::Died), NextScene::GameOver);
        assert_eq!(progress.camera_start_x, 0);
    }
}
