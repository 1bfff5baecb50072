//! A running level
//!
//! Pairs the [`World`] with the diagnostics sink the host injected, and
//! forwards what happened each frame to it.

use super::layout::LevelLayout;
use super::state::{GameEvent, World};
use super::tick::{TickInput, tick};
use crate::diagnostics::DiagnosticSink;
use crate::error::LayoutError;
use crate::progress::{NextScene, Progress};

pub struct Level<S: DiagnosticSink> {
    pub name: String,
    world: World,
    sink: S,
    summarized: bool,
}

impl<S: DiagnosticSink> Level<S> {
    /// Set up `layout` with the counters carried in `progress`
    pub fn new(layout: &LevelLayout, progress: &Progress, mut sink: S) -> Result<Self, LayoutError> {
        let world = layout.build(progress)?;

        sink.level_setup(&layout.name);
        for obstacle in world.obstacles.iter() {
            sink.obstacle_registered(obstacle);
        }
        for group in &layout.enemy_groups {
            sink.group_registered(&group.name, group.enemies.len());
        }

        Ok(Self {
            name: layout.name.clone(),
            world,
            sink,
            summarized: false,
        })
    }

    /// Advance one frame
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        tick(&mut self.world, input, dt);

        for event in &self.world.events {
            if let GameEvent::Collision(record) = event {
                self.sink.collision(record);
            }
        }
        self.sink
            .position(self.world.player.body.rect(), self.world.player.state);

        if self.world.is_finished() && !self.summarized {
            self.summarized = true;
            self.sink.summary();
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Events raised by the last [`step`](Self::step)
    pub fn events(&self) -> &[GameEvent] {
        &self.world.events
    }

    pub fn is_finished(&self) -> bool {
        self.world.is_finished()
    }

    /// Write the results into `progress` and pick the next scene.
    /// `None` while the level is still running.
    pub fn finish(&self, progress: &mut Progress) -> Option<NextScene> {
        let outcome = self.world.outcome()?;
        progress.record(&self.world);
        Some(progress.finish(outcome))
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
