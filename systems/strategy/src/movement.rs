//! Movement strategies assigned to hostile agents.

use icebound_core::{Direction, GridPos, MovementKind, StrategyAction};
use rand::Rng;

use crate::{axis_directions, nearest, Observation};

/// Pluggable per-tick movement policy for a hostile agent.
///
/// Each variant holds only its own phase counters; the deciding agent and
/// the world are observed, never referenced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovementStrategy {
    /// Cycles the fixed N/E/S/W sequence, advancing only when blocked.
    Circuit {
        /// Index into [`Direction::ALL`] currently walked.
        index: usize,
    },
    /// Uniform choice among passable directions.
    RandomWander,
    /// Manhattan-greedy pursuit of the nearest live actor, demolishing
    /// barriers that block the preferred direction.
    Chase,
    /// Dormant until an actor comes near, then sprints toward it.
    Ambush {
        /// Manhattan radius that wakes the ambusher.
        trigger_radius: u32,
        /// Ticks a triggered sprint lasts.
        turbo_duration: u32,
        /// Remaining sprint ticks; zero while dormant.
        turbo_left: u32,
    },
    /// Keeps a heading until blocked, then re-rolls a random passable one.
    RandomPatrol {
        /// Current drift heading, if any.
        heading: Option<Direction>,
    },
}

impl MovementStrategy {
    /// A circuit strategy starting at the first sequence entry.
    #[must_use]
    pub const fn circuit() -> Self {
        Self::Circuit { index: 0 }
    }

    /// A uniform random wander strategy.
    #[must_use]
    pub const fn random_wander() -> Self {
        Self::RandomWander
    }

    /// A chase strategy.
    #[must_use]
    pub const fn chase() -> Self {
        Self::Chase
    }

    /// A dormant ambush strategy with the given tuning.
    #[must_use]
    pub const fn ambush(trigger_radius: u32, turbo_duration: u32) -> Self {
        Self::Ambush {
            trigger_radius,
            turbo_duration,
            turbo_left: 0,
        }
    }

    /// A random patrol strategy with no heading yet.
    #[must_use]
    pub const fn random_patrol() -> Self {
        Self::RandomPatrol { heading: None }
    }

    /// The kind tag identifying this strategy for persistence.
    #[must_use]
    pub const fn kind(&self) -> MovementKind {
        match self {
            Self::Circuit { .. } => MovementKind::Circuit,
            Self::RandomWander => MovementKind::RandomWander,
            Self::Chase => MovementKind::Chase,
            Self::Ambush { .. } => MovementKind::Ambush,
            Self::RandomPatrol { .. } => MovementKind::RandomPatrol,
        }
    }

    /// Steps proposed per tick: two while an ambusher sprints, one
    /// otherwise.
    #[must_use]
    pub const fn step_count(&self) -> u32 {
        match self {
            Self::Ambush { turbo_left, .. } if *turbo_left > 0 => 2,
            _ => 1,
        }
    }

    /// Resolves one invocation. Never fails: a fully enclosed agent
    /// resolves to [`StrategyAction::Stay`].
    pub fn decide<F, R>(
        &mut self,
        observation: &Observation<'_>,
        passable: F,
        rng: &mut R,
    ) -> StrategyAction
    where
        F: Fn(GridPos) -> bool,
        R: Rng,
    {
        let origin = observation.origin();
        match self {
            Self::Circuit { index } => {
                for _ in 0..Direction::ALL.len() {
                    let direction = Direction::ALL[*index];
                    if passable(origin.step(direction)) {
                        return StrategyAction::Move(direction);
                    }
                    *index = (*index + 1) % Direction::ALL.len();
                }
                StrategyAction::Stay
            }
            Self::RandomWander => random_passable(origin, &passable, rng)
                .map_or(StrategyAction::Stay, StrategyAction::Move),
            Self::Chase => chase_action(observation, &passable),
            Self::Ambush {
                trigger_radius,
                turbo_duration,
                turbo_left,
            } => {
                let actor_near = observation
                    .actors()
                    .iter()
                    .any(|actor| origin.manhattan_distance(*actor) <= *trigger_radius);
                if *turbo_left == 0 {
                    if !actor_near {
                        return StrategyAction::Stay;
                    }
                    *turbo_left = *turbo_duration;
                }
                pursue_action(observation, &passable)
            }
            Self::RandomPatrol { heading } => {
                if let Some(direction) = *heading {
                    if passable(origin.step(direction)) {
                        return StrategyAction::Move(direction);
                    }
                }
                match random_passable(origin, &passable, rng) {
                    Some(direction) => {
                        *heading = Some(direction);
                        StrategyAction::Move(direction)
                    }
                    None => {
                        *heading = None;
                        StrategyAction::Stay
                    }
                }
            }
        }
    }

    /// Advances per-tick phase counters after the agent's steps resolved.
    pub fn end_tick(&mut self) {
        if let Self::Ambush { turbo_left, .. } = self {
            *turbo_left = turbo_left.saturating_sub(1);
        }
    }
}

fn random_passable<F, R>(origin: GridPos, passable: &F, rng: &mut R) -> Option<Direction>
where
    F: Fn(GridPos) -> bool,
    R: Rng,
{
    let open: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|direction| passable(origin.step(*direction)))
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.gen_range(0..open.len())])
}

/// Chase resolution: preferred axis first, demolish when a barrier blocks
/// the preferred direction, fall through to the secondary axis, then stay.
fn chase_action<F>(observation: &Observation<'_>, passable: &F) -> StrategyAction
where
    F: Fn(GridPos) -> bool,
{
    let origin = observation.origin();
    let Some(target) = nearest(origin, observation.actors()) else {
        return StrategyAction::Stay;
    };
    for (rank, direction) in axis_directions(origin, target).into_iter().enumerate() {
        let destination = origin.step(direction);
        if passable(destination) {
            return StrategyAction::Move(direction);
        }
        if rank == 0 && observation.barriers().contains(&destination) {
            return StrategyAction::Demolish(direction);
        }
    }
    StrategyAction::Stay
}

/// Ambush pursuit: like chase but without the demolish ability.
fn pursue_action<F>(observation: &Observation<'_>, passable: &F) -> StrategyAction
where
    F: Fn(GridPos) -> bool,
{
    let origin = observation.origin();
    let Some(target) = nearest(origin, observation.actors()) else {
        return StrategyAction::Stay;
    };
    for direction in axis_directions(origin, target) {
        if passable(origin.step(direction)) {
            return StrategyAction::Move(direction);
        }
    }
    StrategyAction::Stay
}
