//! Level configuration consumed once at match start.

use icebound_core::{CollectibleKind, Flavor, GridPos, HazardKind, HostileKind, MatchMode};
use thiserror::Error;

/// Static description of one playable level.
///
/// Levels are plain data: dimensions, a time budget, and spawn lists. The
/// match reads a config once at start and never refers back to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    /// Board width in cells.
    pub width: i32,
    /// Board height in cells.
    pub height: i32,
    /// Countdown budget in whole seconds.
    pub time_budget: u32,
    /// Spawn cell for the primary actor.
    pub primary_spawn: GridPos,
    /// Spawn cell for the secondary actor, where the level supports co-op.
    pub secondary_spawn: Option<GridPos>,
    /// Hostile spawns in spawn order.
    pub hostiles: Vec<(HostileKind, GridPos)>,
    /// Collectible spawns in creation order.
    pub collectibles: Vec<(CollectibleKind, GridPos)>,
    /// Static impassable cells.
    pub obstacles: Vec<GridPos>,
    /// Hazard spawns with their phase period.
    pub hazards: Vec<(HazardKind, GridPos, u32)>,
}

impl LevelConfig {
    /// Looks up a built-in level by number.
    pub fn builtin(number: u32) -> Result<Self, LevelError> {
        match number {
            1 => Ok(Self {
                width: 12,
                height: 10,
                time_budget: 120,
                primary_spawn: GridPos::new(1, 1),
                secondary_spawn: Some(GridPos::new(10, 1)),
                hostiles: vec![
                    (HostileKind::Patroller, GridPos::new(6, 5)),
                    (HostileKind::Wanderer, GridPos::new(9, 7)),
                ],
                collectibles: vec![
                    (CollectibleKind::Banana, GridPos::new(3, 3)),
                    (CollectibleKind::Grape, GridPos::new(8, 2)),
                    (CollectibleKind::Banana, GridPos::new(5, 7)),
                ],
                obstacles: vec![
                    GridPos::new(4, 4),
                    GridPos::new(4, 5),
                    GridPos::new(7, 4),
                    GridPos::new(7, 5),
                ],
                hazards: Vec::new(),
            }),
            2 => Ok(Self {
                width: 14,
                height: 12,
                time_budget: 150,
                primary_spawn: GridPos::new(1, 10),
                secondary_spawn: Some(GridPos::new(12, 10)),
                hostiles: vec![
                    (HostileKind::Ambusher, GridPos::new(6, 3)),
                    (HostileKind::Demolisher, GridPos::new(11, 6)),
                    (HostileKind::Drifter, GridPos::new(2, 2)),
                ],
                collectibles: vec![
                    (CollectibleKind::Cherry, GridPos::new(4, 6)),
                    (CollectibleKind::Pineapple, GridPos::new(9, 2)),
                    (CollectibleKind::Grape, GridPos::new(12, 1)),
                    (CollectibleKind::Grape, GridPos::new(1, 1)),
                ],
                obstacles: vec![
                    GridPos::new(5, 5),
                    GridPos::new(6, 5),
                    GridPos::new(7, 5),
                    GridPos::new(8, 5),
                ],
                hazards: vec![(HazardKind::Flame, GridPos::new(7, 8), 4)],
            }),
            3 => Ok(Self {
                width: 16,
                height: 12,
                time_budget: 180,
                primary_spawn: GridPos::new(1, 6),
                secondary_spawn: Some(GridPos::new(14, 6)),
                hostiles: vec![
                    (HostileKind::Patroller, GridPos::new(4, 2)),
                    (HostileKind::Ambusher, GridPos::new(8, 9)),
                    (HostileKind::Wanderer, GridPos::new(12, 3)),
                    (HostileKind::Demolisher, GridPos::new(10, 6)),
                    (HostileKind::Drifter, GridPos::new(6, 10)),
                ],
                collectibles: vec![
                    (CollectibleKind::Melon, GridPos::new(8, 6)),
                    (CollectibleKind::Pineapple, GridPos::new(2, 10)),
                    (CollectibleKind::Cherry, GridPos::new(13, 10)),
                    (CollectibleKind::Banana, GridPos::new(2, 2)),
                    (CollectibleKind::Banana, GridPos::new(13, 1)),
                ],
                obstacles: vec![
                    GridPos::new(5, 4),
                    GridPos::new(5, 5),
                    GridPos::new(5, 6),
                    GridPos::new(10, 4),
                    GridPos::new(11, 4),
                ],
                hazards: vec![
                    (HazardKind::Flame, GridPos::new(3, 8), 5),
                    (HazardKind::HeatTile, GridPos::new(12, 8), 1),
                ],
            }),
            other => Err(LevelError::UnknownLevel(other)),
        }
    }

    /// Checks internal consistency. A config that passes can always be
    /// turned into a board.
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(LevelError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let in_bounds = |pos: GridPos| {
            pos.x() >= 0 && pos.x() < self.width && pos.y() >= 0 && pos.y() < self.height
        };

        let mut occupied: Vec<GridPos> = Vec::new();
        let claim = |pos: GridPos, occupied: &mut Vec<GridPos>| {
            if !in_bounds(pos) {
                return Err(LevelError::OutOfBounds { x: pos.x(), y: pos.y() });
            }
            if occupied.contains(&pos) {
                return Err(LevelError::OverlappingSpawns { x: pos.x(), y: pos.y() });
            }
            occupied.push(pos);
            Ok(())
        };

        claim(self.primary_spawn, &mut occupied)?;
        if let Some(spawn) = self.secondary_spawn {
            claim(spawn, &mut occupied)?;
        }
        for (_, pos) in &self.hostiles {
            claim(*pos, &mut occupied)?;
        }
        for pos in &self.obstacles {
            claim(*pos, &mut occupied)?;
        }
        for (_, pos) in &self.collectibles {
            claim(*pos, &mut occupied)?;
        }
        for (_, pos, period) in &self.hazards {
            if !in_bounds(*pos) {
                return Err(LevelError::OutOfBounds { x: pos.x(), y: pos.y() });
            }
            if *period == 0 {
                return Err(LevelError::ZeroHazardPeriod { x: pos.x(), y: pos.y() });
            }
        }
        if self.collectibles.is_empty() {
            return Err(LevelError::NoCollectibles);
        }
        Ok(())
    }
}

/// Per-match configuration layered over a level's defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchSetup {
    /// Match topology.
    pub mode: MatchMode,
    /// Flavor of the primary actor.
    pub primary_flavor: Flavor,
    /// Flavor of the secondary actor, required in co-op.
    pub secondary_flavor: Option<Flavor>,
    /// Decision strategy steering the autonomous actor, by name.
    /// Defaults to `"expert"` in spectator mode when unset.
    pub decision: Option<String>,
    /// Replaces the level's hostile spawns when set.
    pub hostiles: Option<Vec<(HostileKind, GridPos)>>,
    /// Replaces the level's collectible spawns when set.
    pub collectibles: Option<Vec<(CollectibleKind, GridPos)>>,
    /// Seed for the match's deterministic random stream.
    pub seed: u64,
}

impl MatchSetup {
    /// A single-actor setup with the given flavor and seed.
    #[must_use]
    pub fn solo(flavor: Flavor, seed: u64) -> Self {
        Self {
            mode: MatchMode::Solo,
            primary_flavor: flavor,
            secondary_flavor: None,
            decision: None,
            hostiles: None,
            collectibles: None,
            seed,
        }
    }

    /// A cooperative setup with one flavor per actor.
    #[must_use]
    pub fn coop(primary: Flavor, secondary: Flavor, seed: u64) -> Self {
        Self {
            mode: MatchMode::Coop,
            primary_flavor: primary,
            secondary_flavor: Some(secondary),
            decision: None,
            hostiles: None,
            collectibles: None,
            seed,
        }
    }

    /// A spectator setup whose actor side is steered by the named
    /// decision strategy.
    #[must_use]
    pub fn spectator(flavor: Flavor, decision: &str, seed: u64) -> Self {
        Self {
            mode: MatchMode::Spectator,
            primary_flavor: flavor,
            secondary_flavor: None,
            decision: Some(decision.to_owned()),
            hostiles: None,
            collectibles: None,
            seed,
        }
    }
}

/// Why a level or match configuration was refused.
#[derive(Debug, Error)]
pub enum LevelError {
    /// No built-in level carries this number.
    #[error("no built-in level numbered {0}")]
    UnknownLevel(u32),
    /// Width or height is not positive.
    #[error("level dimensions must be positive, got {width}x{height}")]
    ZeroDimensions {
        /// Configured width.
        width: i32,
        /// Configured height.
        height: i32,
    },
    /// A spawn or hazard cell lies outside the board.
    #[error("spawn cell ({x}, {y}) is out of bounds")]
    OutOfBounds {
        /// Cell x coordinate.
        x: i32,
        /// Cell y coordinate.
        y: i32,
    },
    /// Two spawn entries claim the same cell.
    #[error("two spawns claim cell ({x}, {y})")]
    OverlappingSpawns {
        /// Cell x coordinate.
        x: i32,
        /// Cell y coordinate.
        y: i32,
    },
    /// A hazard was configured with a zero phase period.
    #[error("hazard at ({x}, {y}) has a zero period")]
    ZeroHazardPeriod {
        /// Cell x coordinate.
        x: i32,
        /// Cell y coordinate.
        y: i32,
    },
    /// The level has no collectibles, so it could never be won.
    #[error("level has no collectibles")]
    NoCollectibles,
    /// A cooperative match was requested on a level without a secondary
    /// spawn, or without a secondary flavor.
    #[error("cooperative match needs a secondary spawn cell and flavor")]
    MissingSecondary,
    /// The configured decision strategy name resolves to nothing.
    #[error("unknown decision strategy {0:?}")]
    UnknownStrategy(String),
    /// `start_level` was called while a match is in progress.
    #[error("a level can only start from the menu or a finished match")]
    InvalidState,
}
