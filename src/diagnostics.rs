//! Structured diagnostics
//!
//! A [`Level`](crate::sim::Level) reports setup, collisions and player
//! positions to an injected [`DiagnosticSink`]. Sinks observe only; they
//! cannot influence the simulation.

use std::collections::VecDeque;

use crate::settings::DiagnosticsLevel;
use crate::sim::{CollisionRecord, Obstacle, PlayerState, Rect};

/// Player positions kept by [`LogSink`]
pub const POSITION_HISTORY: usize = 100;
/// Obstacles this close to the player (centre to centre, per axis) are reported
pub const NEAR_DISTANCE: i32 = 50;

/// Receiver for level diagnostics. Every method defaults to a no-op.
pub trait DiagnosticSink {
    fn level_setup(&mut self, _level: &str) {}
    fn obstacle_registered(&mut self, _obstacle: &Obstacle) {}
    /// A dormant enemy group was created
    fn group_registered(&mut self, _name: &str, _count: usize) {}
    fn collision(&mut self, _record: &CollisionRecord) {}
    fn position(&mut self, _rect: Rect, _state: PlayerState) {}
    /// End of level
    fn summary(&mut self) {}
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {}

#[derive(Debug, Clone, PartialEq)]
struct RegisteredObstacle {
    name: String,
    kind: &'static str,
    rect: Rect,
}

/// Writes diagnostics through `log` under the `map` and `collisions` targets
#[derive(Debug)]
pub struct LogSink {
    level: DiagnosticsLevel,
    obstacles: Vec<RegisteredObstacle>,
    positions: VecDeque<(Rect, PlayerState)>,
    collisions: u64,
}

impl LogSink {
    pub fn new(level: DiagnosticsLevel) -> Self {
        Self {
            level,
            obstacles: Vec::new(),
            positions: VecDeque::with_capacity(POSITION_HISTORY),
            collisions: 0,
        }
    }

    pub fn collision_count(&self) -> u64 {
        self.collisions
    }

    pub fn positions(&self) -> impl Iterator<Item = &(Rect, PlayerState)> {
        self.positions.iter()
    }

    /// Registered obstacles within [`NEAR_DISTANCE`] of `rect`
    pub fn near(&self, rect: Rect) -> Vec<&str> {
        self.obstacles
            .iter()
            .filter(|o| {
                (o.rect.centerx() - rect.centerx()).abs() <= NEAR_DISTANCE
                    && (o.rect.centery() - rect.centery()).abs() <= NEAR_DISTANCE
            })
            .map(|o| o.name.as_str())
            .collect()
    }

    fn enabled(&self) -> bool {
        self.level != DiagnosticsLevel::Off
    }
}

impl DiagnosticSink for LogSink {
    fn level_setup(&mut self, level: &str) {
        self.obstacles.clear();
        self.positions.clear();
        self.collisions = 0;
        if self.enabled() {
            log::info!(target: "map", "=== level setup: {level} ===");
        }
    }

    fn obstacle_registered(&mut self, obstacle: &Obstacle) {
        let rect = obstacle.rect;
        if self.enabled() {
            log::info!(
                target: "map",
                "obstacle registered: {} at ({}, {}) size {}x{} name {}",
                obstacle.kind.as_str(),
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                obstacle.name
            );
        }
        self.obstacles.push(RegisteredObstacle {
            name: obstacle.name.clone(),
            kind: obstacle.kind.as_str(),
            rect,
        });
    }

    fn group_registered(&mut self, name: &str, count: usize) {
        if self.enabled() {
            log::info!(target: "map", "group {name}: {count} sprites");
        }
    }

    fn collision(&mut self, record: &CollisionRecord) {
        self.collisions += 1;
        if !self.enabled() {
            return;
        }
        log::debug!(
            target: "collisions",
            "collision #{}: player ({}, {}) with {} '{}' at ({}, {}) [{}]",
            self.collisions,
            record.mover.x,
            record.mover.y,
            record.category.as_str(),
            record.name.as_deref().unwrap_or("-"),
            record.other.x,
            record.other.y,
            record.axis.as_str()
        );
    }

    fn position(&mut self, rect: Rect, state: PlayerState) {
        if self.positions.len() == POSITION_HISTORY {
            self.positions.pop_front();
        }
        self.positions.push_back((rect, state));

        if self.level != DiagnosticsLevel::Verbose {
            return;
        }
        log::debug!(target: "map", "player at ({}, {}) state {:?}", rect.x, rect.y, state);
        let near = self.near(rect);
        if !near.is_empty() {
            log::debug!(target: "map", "player near {} obstacles: {}", near.len(), near.join(", "));
        }
    }

    fn summary(&mut self) {
        if !self.enabled() {
            return;
        }
        log::info!(target: "map", "=== map summary ===");
        log::info!(target: "map", "obstacles registered: {}", self.obstacles.len());
        log::info!(target: "map", "collisions detected: {}", self.collisions);
        log::info!(target: "map", "positions recorded: {}", self.positions.len());
        for o in &self.obstacles {
            log::debug!(
                target: "map",
                "  {}: ({}, {}) {}x{} {}",
                o.kind,
                o.rect.x,
                o.rect.y,
                o.rect.width,
                o.rect.height,
                o.name
            );
        }
        if let Some((rect, state)) = self.positions.back() {
            log::info!(target: "map", "last player position: ({}, {}) state {:?}", rect.x, rect.y, state);
        }
    }
}

/// One call received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticRecord {
    LevelSetup(String),
    Obstacle(String),
    Group { name: String, count: usize },
    Collision(CollisionRecord),
    Position(Rect, PlayerState),
    Summary,
}

/// Keeps every call, for tests
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<DiagnosticRecord>,
}

impl RecordingSink {
    pub fn collisions(&self) -> impl Iterator<Item = &CollisionRecord> {
        self.records.iter().filter_map(|r| match r {
            DiagnosticRecord::Collision(c) => Some(c),
            _ => None,
        })
    }
}

impl DiagnosticSink for RecordingSink {
    fn level_setup(&mut self, level: &str) {
        self.records.push(DiagnosticRecord::LevelSetup(level.to_string()));
    }

    fn obstacle_registered(&mut self, obstacle: &Obstacle) {
        self.records.push(DiagnosticRecord::Obstacle(obstacle.name.clone()));
    }

    fn group_registered(&mut self, name: &str, count: usize) {
        self.records.push(DiagnosticRecord::Group {
            name: name.to_string(),
            count,
        });
    }

    fn collision(&mut self, record: &CollisionRecord) {
        self.records.push(DiagnosticRecord::Collision(record.clone()));
    }

    fn position(&mut self, rect: Rect, state: PlayerState) {
        self.records.push(DiagnosticRecord::Position(rect, state));
    }

    fn summary(&mut self) {
        self.records.push(DiagnosticRecord::Summary);
    }
}

/// Lets a caller keep ownership of a sink while a level borrows it
impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn level_setup(&mut self, level: &str) {
        (**self).level_setup(level)
    }
    fn obstacle_registered(&mut self, obstacle: &Obstacle) {
        (**self).obstacle_registered(obstacle)
    }
    fn group_registered(&mut self, name: &str, count: usize) {
        (**self).group_registered(name, count)
    }
    fn collision(&mut self, record: &CollisionRecord) {
        (**self).collision(record)
    }
    fn position(&mut self, rect: Rect, state: PlayerState) {
        (**self).position(rect, state)
    }
    fn summary(&mut self) {
        (**self).summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Axis, Category, ObstacleKind};

    fn pipe() -> Obstacle {
        Obstacle::new(1, "pipe_1", ObstacleKind::Pipe, Rect::new(1200, 452, 83, 86))
    }

    #[test]
    fn test_log_sink_keeps_last_positions() {
        let mut sink = LogSink::new(DiagnosticsLevel::Summary);
        for x in 0..150 {
            sink.position(Rect::new(x, 0, 10, 10), PlayerState::Walk);
        }
        assert_eq!(sink.positions().count(), POSITION_HISTORY);
        assert_eq!(sink.positions().next().map(|(r, _)| r.x), Some(50));
    }

    #[test]
    fn test_log_sink_counts_collisions() {
        let mut sink = LogSink::new(DiagnosticsLevel::Off);
        let record = CollisionRecord {
            axis: Axis::Horizontal,
            category: Category::Terrain,
            name: Some("pipe_1".into()),
            mover: Rect::new(1180, 495, 32, 43),
            other: pipe().rect,
        };
        sink.collision(&record);
        sink.collision(&record);
        assert_eq!(sink.collision_count(), 2);

        sink.level_setup("again");
        assert_eq!(sink.collision_count(), 0);
    }

    #[test]
    fn test_near_obstacles() {
        let mut sink = LogSink::new(DiagnosticsLevel::Verbose);
        sink.obstacle_registered(&pipe());
        assert_eq!(sink.near(Rect::new(1200, 470, 32, 43)), vec!["pipe_1"]);
        assert!(sink.near(Rect::new(100, 470, 32, 43)).is_empty());
    }

    #[test]
    fn test_recording_sink_through_reference() {
        let mut recorder = RecordingSink::default();
        {
            let mut sink: Box<dyn DiagnosticSink + '_> = Box::new(&mut recorder);
            sink.level_setup("underground");
            sink.group_registered("enemy_group_1", 1);
            sink.summary();
        }
        assert_eq!(
            recorder.records,
            vec![
                DiagnosticRecord::LevelSetup("underground".into()),
                DiagnosticRecord::Group {
                    name: "enemy_group_1".into(),
                    count: 1
                },
                DiagnosticRecord::Summary,
            ]
        );
    }
}
