//! Motion behaviors governing how collectibles drift between ticks.

use icebound_core::{Direction, GridPos, MotionKind};
use rand::Rng;

/// Pluggable per-tick motion policy for a collectible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectibleBehavior {
    /// Never moves.
    Stationary,
    /// Shuttles along one axis, turning around when blocked. A blocked
    /// shuttle turns on the current tick and moves on the next.
    Patrol {
        /// Current shuttle heading.
        heading: Direction,
    },
    /// Jumps to a pseudo-random passable cell every full period.
    Teleport {
        /// Ticks between jumps.
        period: u32,
        /// Ticks accumulated toward the next jump.
        phase: u32,
    },
}

impl CollectibleBehavior {
    /// A behavior that keeps the collectible in place.
    #[must_use]
    pub const fn stationary() -> Self {
        Self::Stationary
    }

    /// A shuttle behavior starting eastward.
    #[must_use]
    pub const fn patrol() -> Self {
        Self::Patrol {
            heading: Direction::East,
        }
    }

    /// A teleport behavior with the given period.
    #[must_use]
    pub const fn teleport(period: u32) -> Self {
        Self::Teleport { period, phase: 0 }
    }

    /// The motion tag identifying this behavior.
    #[must_use]
    pub const fn motion(&self) -> MotionKind {
        match self {
            Self::Stationary => MotionKind::Stationary,
            Self::Patrol { .. } => MotionKind::Patrol,
            Self::Teleport { .. } => MotionKind::Teleport,
        }
    }

    /// Proposes the collectible's next cell, or `None` to remain in place.
    ///
    /// `dimensions` bounds the teleport sampling; `passable` must also
    /// exclude cells holding other uncollected collectibles.
    pub fn propose<F, R>(
        &mut self,
        current: GridPos,
        dimensions: (i32, i32),
        passable: F,
        rng: &mut R,
    ) -> Option<GridPos>
    where
        F: Fn(GridPos) -> bool,
        R: Rng,
    {
        match self {
            Self::Stationary => None,
            Self::Patrol { heading } => {
                let destination = current.step(*heading);
                if passable(destination) {
                    Some(destination)
                } else {
                    *heading = heading.opposite();
                    None
                }
            }
            Self::Teleport { period, phase } => {
                *phase += 1;
                if *phase < *period {
                    return None;
                }
                *phase = 0;
                sample_free_cell(current, dimensions, &passable, rng)
            }
        }
    }
}

const TELEPORT_ATTEMPTS: u32 = 32;

fn sample_free_cell<F, R>(
    current: GridPos,
    (width, height): (i32, i32),
    passable: &F,
    rng: &mut R,
) -> Option<GridPos>
where
    F: Fn(GridPos) -> bool,
    R: Rng,
{
    if width <= 0 || height <= 0 {
        return None;
    }
    for _ in 0..TELEPORT_ATTEMPTS {
        let candidate = GridPos::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if candidate != current && passable(candidate) {
            return Some(candidate);
        }
    }
    None
}
