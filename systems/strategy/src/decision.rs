//! Decision strategies governing autonomous (computer-controlled) actors.

use icebound_core::{DecisionKind, Direction, GridPos, StrategyAction};
use rand::Rng;

use crate::{axis_directions, nearest, Observation};

/// Pluggable per-tick decision policy for an autonomous actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionStrategy {
    /// Greedy movement toward the nearest uncollected collectible, ties
    /// broken by creation order.
    Hungry,
    /// Greedy movement maximizing distance to the nearest live hostile,
    /// random tie-break among equally safe directions.
    Fearful,
    /// Hungry unless a hostile is within the danger radius, in which case
    /// Fearful overrides. Evaluated fresh each tick.
    Expert {
        /// Manhattan radius at which flight overrides foraging.
        danger_radius: u32,
    },
}

impl DecisionStrategy {
    /// The kind tag identifying this strategy for persistence.
    #[must_use]
    pub const fn kind(&self) -> DecisionKind {
        match self {
            Self::Hungry => DecisionKind::Hungry,
            Self::Fearful => DecisionKind::Fearful,
            Self::Expert { .. } => DecisionKind::Expert,
        }
    }

    /// Resolves one invocation. Never fails: with nothing passable the
    /// actor stays put.
    pub fn decide<F, R>(
        &self,
        observation: &Observation<'_>,
        passable: F,
        rng: &mut R,
    ) -> StrategyAction
    where
        F: Fn(GridPos) -> bool,
        R: Rng,
    {
        match self {
            Self::Hungry => hungry_action(observation, &passable),
            Self::Fearful => fearful_action(observation, &passable, rng),
            Self::Expert { danger_radius } => {
                let origin = observation.origin();
                let endangered = observation
                    .hostiles()
                    .iter()
                    .any(|hostile| origin.manhattan_distance(*hostile) <= *danger_radius);
                if endangered {
                    fearful_action(observation, &passable, rng)
                } else {
                    hungry_action(observation, &passable)
                }
            }
        }
    }
}

fn hungry_action<F>(observation: &Observation<'_>, passable: &F) -> StrategyAction
where
    F: Fn(GridPos) -> bool,
{
    let origin = observation.origin();
    let Some(target) = nearest(origin, observation.collectibles()) else {
        return StrategyAction::Stay;
    };
    for direction in axis_directions(origin, target) {
        if passable(origin.step(direction)) {
            return StrategyAction::Move(direction);
        }
    }
    StrategyAction::Stay
}

fn fearful_action<F, R>(observation: &Observation<'_>, passable: &F, rng: &mut R) -> StrategyAction
where
    F: Fn(GridPos) -> bool,
    R: Rng,
{
    let origin = observation.origin();
    if observation.hostiles().is_empty() {
        return StrategyAction::Stay;
    }

    let mut best: Vec<Direction> = Vec::new();
    let mut best_distance: Option<u32> = None;
    for direction in Direction::ALL {
        let destination = origin.step(direction);
        if !passable(destination) {
            continue;
        }
        let distance = observation
            .hostiles()
            .iter()
            .map(|hostile| destination.manhattan_distance(*hostile))
            .min()
            .unwrap_or(u32::MAX);
        match best_distance {
            Some(current) if distance < current => {}
            Some(current) if distance == current => best.push(direction),
            _ => {
                best_distance = Some(distance);
                best.clear();
                best.push(direction);
            }
        }
    }

    if best.is_empty() {
        return StrategyAction::Stay;
    }
    StrategyAction::Move(best[rng.gen_range(0..best.len())])
}
