//! Control systems bridging board queries to strategy invocations.
//!
//! Each control owns the strategy instances for one agent family, builds
//! per-agent observations from the board's read-only query surface, and
//! appends proposals to an output buffer. Applying the proposals is the
//! session's responsibility, keeping these systems pure with respect to
//! board state.

use icebound_board::{query, Board};
use icebound_core::{
    ActorSlot, CollectibleId, DecisionKind, GridPos, HostileId, MovementKind, StrategyAction,
};
use rand::Rng;

use crate::{CollectibleBehavior, DecisionStrategy, MovementStrategy, Observation, StrategyCatalog};

/// A single proposed hostile action, emitted in stable spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HostileOrder {
    /// Hostile the order applies to.
    pub hostile: HostileId,
    /// Action the hostile's strategy resolved.
    pub action: StrategyAction,
}

/// A proposed collectible relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriftProposal {
    /// Collectible the proposal applies to.
    pub collectible: CollectibleId,
    /// Cell the collectible wants to occupy.
    pub destination: GridPos,
}

/// Owns one movement strategy per hostile, keyed in spawn order.
#[derive(Clone, Debug, Default)]
pub struct HostileControl {
    assignments: Vec<(HostileId, MovementStrategy)>,
}

impl HostileControl {
    /// Creates an empty control with no assignments.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Rebuilds assignments from persisted kind tags via the catalog.
    #[must_use]
    pub fn from_kinds(catalog: &StrategyCatalog, kinds: &[(HostileId, MovementKind)]) -> Self {
        Self {
            assignments: kinds
                .iter()
                .map(|(id, kind)| (*id, catalog.movement_strategy(*kind)))
                .collect(),
        }
    }

    /// Binds a strategy to a hostile. Call in spawn order.
    pub fn assign(&mut self, hostile: HostileId, strategy: MovementStrategy) {
        self.assignments.push((hostile, strategy));
    }

    /// Current kind tags in spawn order, for persistence.
    #[must_use]
    pub fn kinds(&self) -> Vec<(HostileId, MovementKind)> {
        self.assignments
            .iter()
            .map(|(id, strategy)| (*id, strategy.kind()))
            .collect()
    }

    /// Invokes every live hostile's strategy and appends its proposals in
    /// stable spawn order. Sprinting strategies emit multiple orders.
    pub fn handle<R: Rng>(&mut self, board: &Board, rng: &mut R, out: &mut Vec<HostileOrder>) {
        let actors = query::live_actor_positions(board);
        let collectibles = query::uncollected_positions(board);
        let barriers: Vec<GridPos> = query::barrier_snapshots(board)
            .iter()
            .map(|snapshot| snapshot.pos)
            .collect();
        let snapshots = query::hostile_snapshots(board);

        for (id, strategy) in &mut self.assignments {
            let Some(snapshot) = snapshots
                .iter()
                .find(|snapshot| snapshot.id == *id && snapshot.alive)
            else {
                continue;
            };
            let peers: Vec<GridPos> = snapshots
                .iter()
                .filter(|other| other.alive && other.id != *id)
                .map(|other| other.pos)
                .collect();
            let observation = Observation::new(
                snapshot.pos,
                &actors,
                &peers,
                &collectibles,
                &barriers,
            );
            let kind = snapshot.kind;
            // The step budget is re-read after each invocation so a sprint
            // that triggers mid-tick already runs at its elevated count.
            let mut steps = 0;
            loop {
                let action = strategy.decide(
                    &observation,
                    |cell| query::hostile_can_enter(board, kind, cell),
                    rng,
                );
                out.push(HostileOrder {
                    hostile: *id,
                    action,
                });
                steps += 1;
                if steps >= strategy.step_count() {
                    break;
                }
            }
            strategy.end_tick();
        }
    }
}

/// Owns the decision strategy steering one autonomous actor slot.
#[derive(Clone, Copy, Debug)]
pub struct ActorControl {
    slot: ActorSlot,
    strategy: DecisionStrategy,
}

impl ActorControl {
    /// Creates a control for the given slot from a kind tag.
    #[must_use]
    pub fn from_kind(catalog: &StrategyCatalog, slot: ActorSlot, kind: DecisionKind) -> Self {
        Self {
            slot,
            strategy: catalog.decision_strategy(kind),
        }
    }

    /// The kind tag of the bound strategy, for persistence.
    #[must_use]
    pub const fn kind(&self) -> DecisionKind {
        self.strategy.kind()
    }

    /// Slot this control steers.
    #[must_use]
    pub const fn slot(&self) -> ActorSlot {
        self.slot
    }

    /// Resolves the controlled actor's action for this tick. `Stay` when
    /// the actor is missing or dead.
    pub fn handle<R: Rng>(&self, board: &Board, rng: &mut R) -> StrategyAction {
        let Some(origin) = query::live_actor_position(board, self.slot) else {
            return StrategyAction::Stay;
        };
        let actors = query::live_actor_positions(board);
        let hostiles = query::live_hostile_positions(board);
        let collectibles = query::uncollected_positions(board);
        let observation = Observation::new(origin, &actors, &hostiles, &collectibles, &[]);
        let blocked: Vec<GridPos> = actors
            .iter()
            .copied()
            .filter(|pos| *pos != origin)
            .collect();
        self.strategy.decide(
            &observation,
            |cell| query::is_passable(board, cell) && !blocked.contains(&cell),
            rng,
        )
    }
}

/// Owns one motion behavior per collectible, keyed in creation order.
#[derive(Clone, Debug, Default)]
pub struct CollectibleDrift {
    behaviors: Vec<(CollectibleId, CollectibleBehavior)>,
}

impl CollectibleDrift {
    /// Creates an empty drift system.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            behaviors: Vec::new(),
        }
    }

    /// Binds a behavior to a collectible. Call in creation order.
    pub fn assign(&mut self, collectible: CollectibleId, behavior: CollectibleBehavior) {
        self.behaviors.push((collectible, behavior));
    }

    /// Invokes every uncollected collectible's behavior and appends
    /// relocation proposals in creation order.
    pub fn handle<R: Rng>(&mut self, board: &Board, rng: &mut R, out: &mut Vec<DriftProposal>) {
        let (width, height) = query::dimensions(board);
        let snapshots = query::collectible_snapshots(board);

        for (id, behavior) in &mut self.behaviors {
            let Some(snapshot) = snapshots
                .iter()
                .find(|snapshot| snapshot.id == *id && !snapshot.collected)
            else {
                continue;
            };
            let occupied: Vec<GridPos> = snapshots
                .iter()
                .filter(|other| !other.collected && other.id != *id)
                .map(|other| other.pos)
                .collect();
            let proposal = behavior.propose(
                snapshot.pos,
                (width, height),
                |cell| query::is_passable(board, cell) && !occupied.contains(&cell),
                rng,
            );
            if let Some(destination) = proposal {
                out.push(DriftProposal {
                    collectible: *id,
                    destination,
                });
            }
        }
    }
}
