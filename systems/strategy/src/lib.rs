#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure behavior policies for Icebound agents.
//!
//! Three interchangeable strategy families live here: movement strategies
//! for hostiles, decision strategies for autonomous actors, and motion
//! behaviors for collectibles. Strategies are closed enums holding only
//! internal phase counters; they observe the world through an immutable
//! [`Observation`] plus a passability predicate and resolve to a
//! [`StrategyAction`](icebound_core::StrategyAction), falling back to
//! `Stay` whenever the agent is fully enclosed. Control systems bridge the
//! board's query surface to per-agent observations and emit order buffers,
//! never mutating the board themselves.

mod control;
mod decision;
mod drift;
mod movement;

pub use control::{ActorControl, CollectibleDrift, DriftProposal, HostileControl, HostileOrder};
pub use decision::DecisionStrategy;
pub use drift::CollectibleBehavior;
pub use movement::MovementStrategy;

use icebound_core::{
    CollectibleKind, DecisionKind, Direction, GridPos, HostileKind, MotionKind, MovementKind,
};

/// Read-only view of the world assembled for a single agent invocation.
#[derive(Clone, Copy, Debug)]
pub struct Observation<'a> {
    origin: GridPos,
    actors: &'a [GridPos],
    hostiles: &'a [GridPos],
    collectibles: &'a [GridPos],
    barriers: &'a [GridPos],
}

impl<'a> Observation<'a> {
    /// Creates an observation centered on the deciding agent.
    ///
    /// `actors` lists live actors primary-first, `hostiles` lists live
    /// hostiles in spawn order excluding the deciding agent itself, and
    /// `collectibles` lists uncollected collectibles in creation order.
    #[must_use]
    pub const fn new(
        origin: GridPos,
        actors: &'a [GridPos],
        hostiles: &'a [GridPos],
        collectibles: &'a [GridPos],
        barriers: &'a [GridPos],
    ) -> Self {
        Self {
            origin,
            actors,
            hostiles,
            collectibles,
            barriers,
        }
    }

    /// Cell occupied by the deciding agent.
    #[must_use]
    pub const fn origin(&self) -> GridPos {
        self.origin
    }

    /// Live actor positions, primary first.
    #[must_use]
    pub const fn actors(&self) -> &'a [GridPos] {
        self.actors
    }

    /// Live hostile positions in spawn order, excluding the decider.
    #[must_use]
    pub const fn hostiles(&self) -> &'a [GridPos] {
        self.hostiles
    }

    /// Uncollected collectible positions in creation order.
    #[must_use]
    pub const fn collectibles(&self) -> &'a [GridPos] {
        self.collectibles
    }

    /// Intact barrier cells.
    #[must_use]
    pub const fn barriers(&self) -> &'a [GridPos] {
        self.barriers
    }
}

/// Immutable strategy lookup built once at startup and passed explicitly
/// to match construction. Owns the tuning parameters for every strategy
/// family so agents can be rebuilt from persisted kind tags.
#[derive(Clone, Debug)]
pub struct StrategyCatalog {
    ambush_trigger_radius: u32,
    ambush_turbo_duration: u32,
    expert_danger_radius: u32,
    teleport_period: u32,
}

impl StrategyCatalog {
    /// The standard tuning shipped with the engine.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            ambush_trigger_radius: 3,
            ambush_turbo_duration: 6,
            expert_danger_radius: 4,
            teleport_period: 8,
        }
    }

    /// Movement strategy kind bound to a hostile variant.
    #[must_use]
    pub const fn movement_for(&self, kind: HostileKind) -> MovementKind {
        kind.movement()
    }

    /// Constructs a fresh movement strategy instance from its kind tag.
    #[must_use]
    pub fn movement_strategy(&self, kind: MovementKind) -> MovementStrategy {
        match kind {
            MovementKind::Circuit => MovementStrategy::circuit(),
            MovementKind::RandomWander => MovementStrategy::random_wander(),
            MovementKind::Chase => MovementStrategy::chase(),
            MovementKind::Ambush => MovementStrategy::ambush(
                self.ambush_trigger_radius,
                self.ambush_turbo_duration,
            ),
            MovementKind::RandomPatrol => MovementStrategy::random_patrol(),
        }
    }

    /// Constructs a fresh decision strategy instance from its kind tag.
    #[must_use]
    pub fn decision_strategy(&self, kind: DecisionKind) -> DecisionStrategy {
        match kind {
            DecisionKind::Hungry => DecisionStrategy::Hungry,
            DecisionKind::Fearful => DecisionStrategy::Fearful,
            DecisionKind::Expert => DecisionStrategy::Expert {
                danger_radius: self.expert_danger_radius,
            },
        }
    }

    /// Resolves a decision strategy identifier from configuration text.
    #[must_use]
    pub fn decision_by_name(&self, name: &str) -> Option<DecisionKind> {
        match name.to_ascii_lowercase().as_str() {
            "hungry" => Some(DecisionKind::Hungry),
            "fearful" => Some(DecisionKind::Fearful),
            "expert" => Some(DecisionKind::Expert),
            _ => None,
        }
    }

    /// Constructs the motion behavior bound to a collectible variant.
    #[must_use]
    pub fn behavior_for(&self, kind: CollectibleKind) -> CollectibleBehavior {
        match kind.motion() {
            MotionKind::Stationary => CollectibleBehavior::stationary(),
            MotionKind::Patrol => CollectibleBehavior::patrol(),
            MotionKind::Teleport => CollectibleBehavior::teleport(self.teleport_period),
        }
    }
}

impl Default for StrategyCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Nearest target by Manhattan distance, ties broken by slice order.
pub(crate) fn nearest(from: GridPos, targets: &[GridPos]) -> Option<GridPos> {
    targets
        .iter()
        .enumerate()
        .min_by_key(|(index, target)| (from.manhattan_distance(**target), *index))
        .map(|(_, target)| *target)
}

/// Greedy axis preference toward `to`: the axis with the greater absolute
/// offset first, horizontal first on ties; axes with zero offset are
/// omitted.
pub(crate) fn axis_directions(from: GridPos, to: GridPos) -> Vec<Direction> {
    let dx = to.x() - from.x();
    let dy = to.y() - from.y();
    let horizontal = match dx.signum() {
        1 => Some(Direction::East),
        -1 => Some(Direction::West),
        _ => None,
    };
    let vertical = match dy.signum() {
        1 => Some(Direction::South),
        -1 => Some(Direction::North),
        _ => None,
    };
    let ordered = if dx.abs() >= dy.abs() {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };
    ordered.into_iter().flatten().collect()
}
