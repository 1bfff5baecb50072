//! Error types
//!
//! Only configuration can fail. Runtime rule violations are programming
//! errors and are caught with debug assertions instead.

use crate::sim::Rect;

/// Problems found while loading or validating a level layout
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// An obstacle, coin or trigger rectangle has negative size.
    #[error("'{name}' has a degenerate rectangle {rect:?}")]
    DegenerateRect { name: String, rect: Rect },

    /// Two static obstacles share pixels.
    #[error("obstacles '{first}' and '{second}' overlap")]
    OverlappingObstacles { first: String, second: String },

    /// No flagpole was placed, so the level can never be cleared.
    #[error("layout has no flagpole")]
    MissingFlagpole,

    /// A checkpoint names an enemy group the layout does not define.
    #[error("checkpoint '{checkpoint}' activates enemy group {group}, but only {available} groups exist")]
    UnknownEnemyGroup {
        checkpoint: String,
        group: usize,
        available: usize,
    },

    /// Two checkpoints share a name or an enemy group is triggered twice.
    #[error("duplicate checkpoint '{name}'")]
    DuplicateCheckpoint { name: String },

    /// The player or an enemy would spawn underneath the ground line.
    #[error("'{name}' spawns with its feet at {bottom}, below the ground at {ground_height}")]
    BelowGround {
        name: String,
        bottom: i32,
        ground_height: i32,
    },

    /// Viewport or level dimensions cannot hold a camera, or the ground
    /// line lies outside the viewport.
    #[error("invalid viewport {width}x{height} for level width {level_width}")]
    InvalidViewport {
        width: i32,
        height: i32,
        level_width: i32,
    },

    #[error("failed to parse layout: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Problems reading or writing the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
