#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Icebound engine.
//!
//! This crate defines the grid primitives, entity identifiers, and closed
//! variant tags that connect the authoritative board, the pure strategy
//! systems, the match session, and persistence. Each variant tag carries its
//! parameter table as `const` accessors so that behavior differences between
//! variants stay data, not hierarchy.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the engine boots.
pub const WELCOME_BANNER: &str = "Welcome to Icebound.";

/// Location of a single grid cell expressed as signed x/y coordinates.
///
/// Positions are immutable values; every movement produces a new position so
/// that "current" and "previous" snapshots used during collision comparison
/// can never alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate, growing eastward.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate, growing southward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Produces the neighboring position one step in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cardinal movement directions available to actors and hostiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing y.
    North,
    /// Movement toward increasing x.
    East,
    /// Movement toward increasing y.
    South,
    /// Movement toward decreasing x.
    West,
}

impl Direction {
    /// All directions in the fixed evaluation order used by circuits.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset applied to a position when stepping this way.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// The direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to an actor (ice cream).
    ActorId
);
entity_id!(
    /// Unique identifier assigned to a hostile agent.
    HostileId
);
entity_id!(
    /// Unique identifier assigned to a collectible.
    CollectibleId
);
entity_id!(
    /// Unique identifier assigned to a destructible barrier cell.
    BarrierId
);
entity_id!(
    /// Unique identifier assigned to a hazard.
    HazardId
);

/// Actor slot addressed by controller intents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorSlot {
    /// The always-present first actor.
    Primary,
    /// The second actor, populated only in cooperative matches.
    Secondary,
}

/// Ice cream variants, distinguished by barrier footprint and speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flavor {
    /// Raises the longest barrier runs but steps slowest.
    Chocolate,
    /// Middle of the road in both footprint and cadence.
    Vanilla,
    /// Single-cell barriers, fastest autonomous cadence.
    Strawberry,
}

impl Flavor {
    /// Number of contiguous barrier cells claimed by one create action.
    #[must_use]
    pub const fn barrier_span(self) -> u32 {
        match self {
            Self::Chocolate => 3,
            Self::Vanilla => 2,
            Self::Strawberry => 1,
        }
    }

    /// Ticks between autonomous steps; smaller is faster.
    #[must_use]
    pub const fn step_interval(self) -> u64 {
        match self {
            Self::Chocolate => 3,
            Self::Vanilla => 2,
            Self::Strawberry => 1,
        }
    }
}

/// Hostile agent variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostileKind {
    /// Walks a fixed circuit, turning only when blocked.
    Patroller,
    /// Lies dormant, then sprints when an actor comes near.
    Ambusher,
    /// Wanders at random and walks straight over barriers.
    Wanderer,
    /// Chases the nearest actor and demolishes barriers in its way.
    Demolisher,
    /// Drifts in a straight line until blocked, then picks a random heading.
    Drifter,
}

impl HostileKind {
    /// Movement strategy bound to this kind by default.
    #[must_use]
    pub const fn movement(self) -> MovementKind {
        match self {
            Self::Patroller => MovementKind::Circuit,
            Self::Ambusher => MovementKind::Ambush,
            Self::Wanderer => MovementKind::RandomWander,
            Self::Demolisher => MovementKind::Chase,
            Self::Drifter => MovementKind::RandomPatrol,
        }
    }

    /// Consecutive fully-enclosed ticks before the hostile is eliminated.
    ///
    /// `None` marks kinds that cannot be trapped: the Wanderer treats
    /// barriers as open ground and the Demolisher breaks them down.
    #[must_use]
    pub const fn enclosure_threshold(self) -> Option<u32> {
        match self {
            Self::Patroller => Some(3),
            Self::Ambusher => Some(2),
            Self::Wanderer => None,
            Self::Demolisher => None,
            Self::Drifter => Some(3),
        }
    }

    /// Whether intact barriers block this kind's movement.
    #[must_use]
    pub const fn blocked_by_barriers(self) -> bool {
        !matches!(self, Self::Wanderer)
    }
}

/// Collectible (fruit) variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Stationary, lowest value.
    Banana,
    /// Stationary, modest value.
    Grape,
    /// Shuttles between adjacent cells.
    Cherry,
    /// Shuttles between adjacent cells, higher value.
    Pineapple,
    /// Teleports to a fresh cell on a fixed period.
    Melon,
}

impl CollectibleKind {
    /// Points awarded when the collectible is picked up.
    #[must_use]
    pub const fn point_value(self) -> u32 {
        match self {
            Self::Banana => 10,
            Self::Grape => 15,
            Self::Cherry => 20,
            Self::Pineapple => 25,
            Self::Melon => 30,
        }
    }

    /// Motion policy bound to this kind.
    #[must_use]
    pub const fn motion(self) -> MotionKind {
        match self {
            Self::Banana | Self::Grape => MotionKind::Stationary,
            Self::Cherry | Self::Pineapple => MotionKind::Patrol,
            Self::Melon => MotionKind::Teleport,
        }
    }
}

/// Motion policies available to collectibles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    /// Never moves.
    Stationary,
    /// Shuttles between adjacent passable cells.
    Patrol,
    /// Jumps to a pseudo-random free cell on a fixed period.
    Teleport,
}

/// Identifiers for the hostile movement strategy family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKind {
    /// Fixed direction sequence, advanced only when blocked.
    Circuit,
    /// Uniform choice among passable directions.
    RandomWander,
    /// Manhattan-greedy pursuit with barrier demolition.
    Chase,
    /// Dormant until triggered, then an elevated step count.
    Ambush,
    /// Straight-line drift with random re-heading when blocked.
    RandomPatrol,
}

/// Identifiers for the autonomous-actor decision strategy family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    /// Greedy movement toward the nearest uncollected collectible.
    Hungry,
    /// Greedy movement away from the nearest live hostile.
    Fearful,
    /// Hungry unless a hostile is within the danger radius, then Fearful.
    Expert,
}

/// Environmental hazard variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Toggles its active flag on a fixed period.
    Flame,
    /// Always active while present.
    HeatTile,
}

/// Match topology selected at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    /// One human-addressable actor versus hostiles.
    Solo,
    /// Two cooperating human-addressable actors versus hostiles.
    Coop,
    /// No human-addressable actor; an autonomous actor plays out the round.
    Spectator,
}

impl MatchMode {
    /// Whether the given slot accepts controller intents in this mode.
    #[must_use]
    pub const fn slot_addressable(self, slot: ActorSlot) -> bool {
        match self {
            Self::Solo => matches!(slot, ActorSlot::Primary),
            Self::Coop => true,
            Self::Spectator => false,
        }
    }
}

/// Match state machine states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchState {
    /// Constructed, no level started yet.
    Menu,
    /// Simulation advancing on every tick.
    Playing,
    /// Clock and simulation suspended, resumable.
    Paused,
    /// Terminal victory. No further transitions.
    Won,
    /// Terminal defeat. No further transitions.
    Lost,
}

impl MatchState {
    /// Whether the state is terminal (`Won` or `Lost`).
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Action resolved by a strategy for a single invocation.
///
/// Strategies never fail: a fully enclosed agent resolves to
/// [`StrategyAction::Stay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyAction {
    /// Remain in place this invocation.
    Stay,
    /// Step one cell in the given direction.
    Move(Direction),
    /// Demolish the barrier one cell away in the given direction.
    Demolish(Direction),
}
