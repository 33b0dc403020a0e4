#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for Icebound.
//!
//! The board owns every entity on a fixed grid and resolves all spatial
//! interactions: move acceptance, barrier creation and destruction, hazard
//! phases, the collision pass, and enclosed-hostile elimination. Mutations
//! report their outcome as a return value or append [`BoardEvent`] values to
//! a caller-provided buffer; read access goes through the [`query`] module.

mod reachability;

use icebound_core::{
    ActorId, ActorSlot, BarrierId, CollectibleId, CollectibleKind, Direction, Flavor, GridPos,
    HazardId, HazardKind, HostileId, HostileKind,
};

/// Outcomes of a resolution pass, broadcast for the session to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardEvent {
    /// A live actor shared a cell with a live hostile or an active hazard.
    ActorFelled {
        /// Actor that was eliminated.
        actor: ActorId,
        /// What eliminated it.
        cause: FellCause,
    },
    /// A live actor picked up an uncollected collectible.
    CollectibleCollected {
        /// Collectible that was picked up.
        collectible: CollectibleId,
        /// Actor that picked it up.
        by: ActorId,
        /// Points awarded for the pickup.
        points: u32,
    },
    /// A hostile stayed fully enclosed for its variant's threshold of ticks.
    HostileEliminated {
        /// Hostile that was removed from play.
        hostile: HostileId,
    },
}

/// Source of an actor elimination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FellCause {
    /// Contact with a live hostile.
    Hostile(HostileId),
    /// Contact with an active hazard.
    Hazard(HazardId),
}

#[derive(Clone, Debug)]
struct Actor {
    id: ActorId,
    slot: ActorSlot,
    flavor: Flavor,
    pos: GridPos,
    facing: Direction,
    alive: bool,
}

#[derive(Clone, Debug)]
struct Hostile {
    id: HostileId,
    kind: HostileKind,
    pos: GridPos,
    alive: bool,
    enclosed_ticks: u32,
}

#[derive(Clone, Debug)]
struct Collectible {
    id: CollectibleId,
    kind: CollectibleKind,
    pos: GridPos,
    collected: bool,
}

#[derive(Clone, Copy, Debug)]
struct Barrier {
    id: BarrierId,
    pos: GridPos,
}

#[derive(Clone, Debug)]
struct Hazard {
    id: HazardId,
    kind: HazardKind,
    pos: GridPos,
    period: u32,
    phase: u32,
    active: bool,
}

/// Authoritative Icebound board.
#[derive(Clone, Debug)]
pub struct Board {
    width: i32,
    height: i32,
    primary: Option<Actor>,
    secondary: Option<Actor>,
    hostiles: Vec<Hostile>,
    collectibles: Vec<Collectible>,
    barriers: Vec<Barrier>,
    obstacles: Vec<GridPos>,
    hazards: Vec<Hazard>,
    next_barrier_id: u32,
}

impl Board {
    /// Creates an empty board with the provided dimensions.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            primary: None,
            secondary: None,
            hostiles: Vec::new(),
            collectibles: Vec::new(),
            barriers: Vec::new(),
            obstacles: Vec::new(),
            hazards: Vec::new(),
            next_barrier_id: 0,
        }
    }

    /// Reports whether a position lies within the board bounds.
    #[must_use]
    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x() >= 0 && pos.y() >= 0 && pos.x() < self.width && pos.y() < self.height
    }

    /// Reports whether an actor may stand on the cell: in bounds, free of
    /// static obstacles, free of intact barriers.
    #[must_use]
    pub fn is_passable(&self, pos: GridPos) -> bool {
        self.in_bounds(pos)
            && !self.obstacles.contains(&pos)
            && self.barrier_at(pos).is_none()
    }

    // ── Spawning ────────────────────────────────────────────────────────

    /// Places an actor in the given slot. Fails on an occupied or
    /// impassable cell, or when the slot is already populated.
    pub fn spawn_actor(
        &mut self,
        slot: ActorSlot,
        flavor: Flavor,
        pos: GridPos,
    ) -> Option<ActorId> {
        if !self.is_passable(pos) || self.agent_at(pos) {
            return None;
        }
        let (storage, id) = match slot {
            ActorSlot::Primary => (&mut self.primary, ActorId::new(0)),
            ActorSlot::Secondary => (&mut self.secondary, ActorId::new(1)),
        };
        if storage.is_some() {
            return None;
        }
        *storage = Some(Actor {
            id,
            slot,
            flavor,
            pos,
            facing: Direction::South,
            alive: true,
        });
        Some(id)
    }

    /// Spawns a hostile of the given kind. Spawn order is stable: the
    /// returned ids ascend with every call.
    pub fn spawn_hostile(&mut self, kind: HostileKind, pos: GridPos) -> Option<HostileId> {
        if !self.is_passable(pos) || self.agent_at(pos) {
            return None;
        }
        let id = HostileId::new(self.hostiles.len() as u32);
        self.hostiles.push(Hostile {
            id,
            kind,
            pos,
            alive: true,
            enclosed_ticks: 0,
        });
        Some(id)
    }

    /// Spawns a collectible. Creation order is stable and observable.
    pub fn spawn_collectible(
        &mut self,
        kind: CollectibleKind,
        pos: GridPos,
    ) -> Option<CollectibleId> {
        if !self.is_passable(pos) {
            return None;
        }
        let id = CollectibleId::new(self.collectibles.len() as u32);
        self.collectibles.push(Collectible {
            id,
            kind,
            pos,
            collected: false,
        });
        Some(id)
    }

    /// Registers a static obstacle cell.
    pub fn add_obstacle(&mut self, pos: GridPos) -> bool {
        if !self.in_bounds(pos) || self.obstacles.contains(&pos) || self.agent_at(pos) {
            return false;
        }
        self.obstacles.push(pos);
        true
    }

    /// Registers a hazard. Flame hazards start inactive and toggle every
    /// `period` ticks; heat tiles ignore the period and are always active.
    pub fn add_hazard(&mut self, kind: HazardKind, pos: GridPos, period: u32) -> Option<HazardId> {
        if !self.in_bounds(pos) || period == 0 {
            return None;
        }
        let id = HazardId::new(self.hazards.len() as u32);
        self.hazards.push(Hazard {
            id,
            kind,
            pos,
            period,
            phase: 0,
            active: matches!(kind, HazardKind::HeatTile),
        });
        Some(id)
    }

    // ── Movement ────────────────────────────────────────────────────────

    /// Attempts to step the actor one cell. The facing always turns toward
    /// the requested direction; the position changes iff the destination is
    /// passable and free of other actors, and the return value reports
    /// exactly that.
    pub fn move_actor(&mut self, slot: ActorSlot, direction: Direction) -> bool {
        let Some(pos) = self.actor(slot).filter(|actor| actor.alive).map(|a| a.pos) else {
            return false;
        };
        let destination = pos.step(direction);
        let accepted = self.is_passable(destination) && !self.actor_at(destination);
        if let Some(actor) = self.actor_mut(slot) {
            actor.facing = direction;
            if accepted {
                actor.pos = destination;
            }
        }
        accepted
    }

    /// Attempts to step a hostile one cell. Barriers block every kind that
    /// reports [`HostileKind::blocked_by_barriers`]; other live hostiles
    /// always block.
    pub fn move_hostile(&mut self, id: HostileId, direction: Direction) -> bool {
        let Some((kind, pos)) = self
            .hostiles
            .iter()
            .find(|hostile| hostile.id == id && hostile.alive)
            .map(|hostile| (hostile.kind, hostile.pos))
        else {
            return false;
        };
        let destination = pos.step(direction);
        if !self.hostile_can_enter(kind, destination) {
            return false;
        }
        if let Some(hostile) = self.hostiles.iter_mut().find(|hostile| hostile.id == id) {
            hostile.pos = destination;
        }
        true
    }

    fn hostile_can_enter(&self, kind: HostileKind, destination: GridPos) -> bool {
        if !self.in_bounds(destination) || self.obstacles.contains(&destination) {
            return false;
        }
        if kind.blocked_by_barriers() && self.barrier_at(destination).is_some() {
            return false;
        }
        !self
            .hostiles
            .iter()
            .any(|other| other.alive && other.pos == destination)
    }

    /// Removes the barrier one cell away from the hostile in the given
    /// direction, if one exists. The Demolisher's special ability.
    pub fn demolish_toward(&mut self, id: HostileId, direction: Direction) -> bool {
        let Some(pos) = self
            .hostiles
            .iter()
            .find(|hostile| hostile.id == id && hostile.alive)
            .map(|hostile| hostile.pos)
        else {
            return false;
        };
        self.remove_barrier_at(pos.step(direction))
    }

    /// Moves an uncollected collectible to a new cell. The destination must
    /// be passable and free of other collectibles; behavior systems drive
    /// this between hazard advance and the collision pass.
    pub fn relocate_collectible(&mut self, id: CollectibleId, destination: GridPos) -> bool {
        if !self.is_passable(destination) {
            return false;
        }
        if self
            .collectibles
            .iter()
            .any(|other| other.id != id && !other.collected && other.pos == destination)
        {
            return false;
        }
        match self
            .collectibles
            .iter_mut()
            .find(|collectible| collectible.id == id && !collectible.collected)
        {
            Some(collectible) => {
                collectible.pos = destination;
                true
            }
            None => false,
        }
    }

    // ── Barriers ────────────────────────────────────────────────────────

    /// Raises a run of barrier cells ahead of the actor's facing.
    ///
    /// The claim starts one cell ahead and extends up to the flavor's
    /// barrier span, stopping early at the first cell that is out of
    /// bounds, a static obstacle, an existing barrier, or occupied by a
    /// live agent. Returns the number of cells claimed; `0` when nothing
    /// could be placed or when the fairness rule rejects the placement
    /// because it would cut every barrier-free route to an uncollected
    /// collectible.
    pub fn place_barriers(&mut self, slot: ActorSlot) -> i32 {
        let Some((pos, facing, span)) = self
            .actor(slot)
            .filter(|actor| actor.alive)
            .map(|actor| (actor.pos, actor.facing, actor.flavor.barrier_span()))
        else {
            return 0;
        };

        let mut claimed = Vec::with_capacity(span as usize);
        let mut cursor = pos;
        for _ in 0..span {
            cursor = cursor.step(facing);
            if !self.is_passable(cursor) || self.agent_at(cursor) {
                break;
            }
            claimed.push(cursor);
        }
        if claimed.is_empty() {
            return 0;
        }
        if self.placement_seals_collectibles(pos, &claimed) {
            return 0;
        }

        for cell in &claimed {
            let id = BarrierId::new(self.next_barrier_id);
            self.next_barrier_id += 1;
            self.barriers.push(Barrier { id, pos: *cell });
        }
        claimed.len() as i32
    }

    /// Breaks the nearest barrier along the actor's facing within its
    /// interaction range (the flavor's barrier span). Returns whether a
    /// barrier was removed.
    pub fn break_barrier(&mut self, slot: ActorSlot) -> bool {
        let Some((pos, facing, span)) = self
            .actor(slot)
            .filter(|actor| actor.alive)
            .map(|actor| (actor.pos, actor.facing, actor.flavor.barrier_span()))
        else {
            return false;
        };
        let mut cursor = pos;
        for _ in 0..span {
            cursor = cursor.step(facing);
            if !self.in_bounds(cursor) || self.obstacles.contains(&cursor) {
                return false;
            }
            if self.remove_barrier_at(cursor) {
                return true;
            }
        }
        false
    }

    fn remove_barrier_at(&mut self, pos: GridPos) -> bool {
        match self.barriers.iter().position(|barrier| barrier.pos == pos) {
            Some(index) => {
                let _ = self.barriers.remove(index);
                true
            }
            None => false,
        }
    }

    fn placement_seals_collectibles(&self, origin: GridPos, claimed: &[GridPos]) -> bool {
        let goals: Vec<GridPos> = self
            .collectibles
            .iter()
            .filter(|collectible| !collectible.collected)
            .map(|collectible| collectible.pos)
            .collect();
        if goals.is_empty() {
            return false;
        }
        reachability::any_goal_sealed(origin, &goals, self.width, self.height, |cell| {
            self.is_passable(cell) && !claimed.contains(&cell)
        })
    }

    // ── Per-tick resolution ─────────────────────────────────────────────

    /// Advances every hazard's phase counter. Flame hazards toggle their
    /// active flag each full period; heat tiles remain active throughout.
    pub fn advance_hazards(&mut self) {
        for hazard in &mut self.hazards {
            match hazard.kind {
                HazardKind::Flame => {
                    hazard.phase += 1;
                    if hazard.phase >= hazard.period {
                        hazard.phase = 0;
                        hazard.active = !hazard.active;
                    }
                }
                HazardKind::HeatTile => hazard.active = true,
            }
        }
    }

    /// Evaluates collisions for the primary then the secondary actor:
    /// death by live hostile, death by active hazard, then pickups in
    /// collectible creation order. The collected flag is monotonic.
    pub fn resolve_collisions(&mut self, out_events: &mut Vec<BoardEvent>) {
        for slot in [ActorSlot::Primary, ActorSlot::Secondary] {
            let Some((actor_id, pos)) = self
                .actor(slot)
                .filter(|actor| actor.alive)
                .map(|actor| (actor.id, actor.pos))
            else {
                continue;
            };

            let cause = self
                .hostiles
                .iter()
                .find(|hostile| hostile.alive && hostile.pos == pos)
                .map(|hostile| FellCause::Hostile(hostile.id))
                .or_else(|| {
                    self.hazards
                        .iter()
                        .find(|hazard| hazard.active && hazard.pos == pos)
                        .map(|hazard| FellCause::Hazard(hazard.id))
                });

            if let Some(cause) = cause {
                if let Some(actor) = self.actor_mut(slot) {
                    actor.alive = false;
                }
                out_events.push(BoardEvent::ActorFelled {
                    actor: actor_id,
                    cause,
                });
                continue;
            }

            for collectible in &mut self.collectibles {
                if !collectible.collected && collectible.pos == pos {
                    collectible.collected = true;
                    out_events.push(BoardEvent::CollectibleCollected {
                        collectible: collectible.id,
                        by: actor_id,
                        points: collectible.kind.point_value(),
                    });
                }
            }
        }
    }

    /// Accrues enclosure ticks for hostiles whose four neighbors are all
    /// blocked with at least one barrier among them, and eliminates any
    /// hostile that reaches its variant's threshold. Kinds without a
    /// threshold are never eliminated this way.
    pub fn eliminate_enclosed_hostiles(&mut self, out_events: &mut Vec<BoardEvent>) {
        let mut eliminated = Vec::new();
        let snapshot: Vec<(HostileId, HostileKind, GridPos)> = self
            .hostiles
            .iter()
            .filter(|hostile| hostile.alive)
            .map(|hostile| (hostile.id, hostile.kind, hostile.pos))
            .collect();

        for (id, kind, pos) in snapshot {
            let Some(threshold) = kind.enclosure_threshold() else {
                continue;
            };
            let neighbors = Direction::ALL.map(|direction| pos.step(direction));
            let fully_blocked = neighbors.iter().all(|cell| !self.is_passable(*cell));
            let touches_barrier = neighbors
                .iter()
                .any(|cell| self.barrier_at(*cell).is_some());

            let Some(hostile) = self.hostiles.iter_mut().find(|hostile| hostile.id == id)
            else {
                continue;
            };
            if fully_blocked && touches_barrier {
                hostile.enclosed_ticks += 1;
                if hostile.enclosed_ticks >= threshold {
                    hostile.alive = false;
                    eliminated.push(id);
                }
            } else {
                hostile.enclosed_ticks = 0;
            }
        }

        for hostile in eliminated {
            out_events.push(BoardEvent::HostileEliminated { hostile });
        }
    }

    // ── Internal helpers ────────────────────────────────────────────────

    fn actor(&self, slot: ActorSlot) -> Option<&Actor> {
        match slot {
            ActorSlot::Primary => self.primary.as_ref(),
            ActorSlot::Secondary => self.secondary.as_ref(),
        }
    }

    fn actor_mut(&mut self, slot: ActorSlot) -> Option<&mut Actor> {
        match slot {
            ActorSlot::Primary => self.primary.as_mut(),
            ActorSlot::Secondary => self.secondary.as_mut(),
        }
    }

    fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.primary.iter().chain(self.secondary.iter())
    }

    fn actor_at(&self, pos: GridPos) -> bool {
        self.actors().any(|actor| actor.alive && actor.pos == pos)
    }

    fn agent_at(&self, pos: GridPos) -> bool {
        self.actor_at(pos)
            || self
                .hostiles
                .iter()
                .any(|hostile| hostile.alive && hostile.pos == pos)
    }

    fn barrier_at(&self, pos: GridPos) -> Option<BarrierId> {
        self.barriers
            .iter()
            .find(|barrier| barrier.pos == pos)
            .map(|barrier| barrier.id)
    }
}

/// Query functions that provide read-only access to the board state.
pub mod query {
    use serde::{Deserialize, Serialize};

    use super::Board;
    use icebound_core::{
        ActorId, ActorSlot, BarrierId, CollectibleId, CollectibleKind, Direction, Flavor,
        GridPos, HazardId, HazardKind, HostileId, HostileKind,
    };

    /// Immutable representation of a single actor's state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ActorSnapshot {
        /// Identifier assigned to the actor.
        pub id: ActorId,
        /// Slot the actor occupies.
        pub slot: ActorSlot,
        /// Variant selected at match start.
        pub flavor: Flavor,
        /// Cell currently occupied.
        pub pos: GridPos,
        /// Direction the actor faces.
        pub facing: Direction,
        /// Whether the actor is still in play.
        pub alive: bool,
    }

    /// Immutable representation of a single hostile's state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HostileSnapshot {
        /// Identifier assigned at spawn; ascends in spawn order.
        pub id: HostileId,
        /// Variant of the hostile.
        pub kind: HostileKind,
        /// Cell currently occupied.
        pub pos: GridPos,
        /// Whether the hostile is still in play.
        pub alive: bool,
        /// Consecutive ticks spent fully enclosed.
        pub enclosed_ticks: u32,
    }

    /// Immutable representation of a single collectible's state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CollectibleSnapshot {
        /// Identifier assigned at creation; ascends in creation order.
        pub id: CollectibleId,
        /// Variant of the collectible.
        pub kind: CollectibleKind,
        /// Cell currently occupied.
        pub pos: GridPos,
        /// Whether the collectible has been picked up. Monotonic.
        pub collected: bool,
    }

    /// Immutable representation of a single barrier cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BarrierSnapshot {
        /// Identifier assigned at placement.
        pub id: BarrierId,
        /// Cell the barrier occupies.
        pub pos: GridPos,
    }

    /// Immutable representation of a single hazard.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct HazardSnapshot {
        /// Identifier assigned at level load.
        pub id: HazardId,
        /// Variant of the hazard.
        pub kind: HazardKind,
        /// Cell the hazard occupies.
        pub pos: GridPos,
        /// Phase period in ticks.
        pub period: u32,
        /// Current phase counter.
        pub phase: u32,
        /// Whether the hazard damages on contact right now.
        pub active: bool,
    }

    /// Board dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(board: &Board) -> (i32, i32) {
        (board.width, board.height)
    }

    /// Reports whether an actor may stand on the cell.
    #[must_use]
    pub fn is_passable(board: &Board, pos: GridPos) -> bool {
        board.is_passable(pos)
    }

    /// Reports whether a hostile of the given kind may enter the cell.
    #[must_use]
    pub fn hostile_can_enter(board: &Board, kind: HostileKind, pos: GridPos) -> bool {
        board.hostile_can_enter(kind, pos)
    }

    /// Current position of a live actor in the given slot.
    #[must_use]
    pub fn live_actor_position(board: &Board, slot: ActorSlot) -> Option<GridPos> {
        board
            .actor(slot)
            .filter(|actor| actor.alive)
            .map(|actor| actor.pos)
    }

    /// Positions of all live actors, primary first.
    #[must_use]
    pub fn live_actor_positions(board: &Board) -> Vec<GridPos> {
        board
            .actors()
            .filter(|actor| actor.alive)
            .map(|actor| actor.pos)
            .collect()
    }

    /// Positions of all live hostiles in spawn order.
    #[must_use]
    pub fn live_hostile_positions(board: &Board) -> Vec<GridPos> {
        board
            .hostiles
            .iter()
            .filter(|hostile| hostile.alive)
            .map(|hostile| hostile.pos)
            .collect()
    }

    /// Positions of all uncollected collectibles in creation order.
    #[must_use]
    pub fn uncollected_positions(board: &Board) -> Vec<GridPos> {
        board
            .collectibles
            .iter()
            .filter(|collectible| !collectible.collected)
            .map(|collectible| collectible.pos)
            .collect()
    }

    /// Whether every collectible on the board has been picked up.
    #[must_use]
    pub fn all_collected(board: &Board) -> bool {
        board
            .collectibles
            .iter()
            .all(|collectible| collectible.collected)
    }

    /// Captures actor snapshots, primary first.
    #[must_use]
    pub fn actor_snapshots(board: &Board) -> Vec<ActorSnapshot> {
        board
            .actors()
            .map(|actor| ActorSnapshot {
                id: actor.id,
                slot: actor.slot,
                flavor: actor.flavor,
                pos: actor.pos,
                facing: actor.facing,
                alive: actor.alive,
            })
            .collect()
    }

    /// Captures hostile snapshots in spawn order.
    #[must_use]
    pub fn hostile_snapshots(board: &Board) -> Vec<HostileSnapshot> {
        board
            .hostiles
            .iter()
            .map(|hostile| HostileSnapshot {
                id: hostile.id,
                kind: hostile.kind,
                pos: hostile.pos,
                alive: hostile.alive,
                enclosed_ticks: hostile.enclosed_ticks,
            })
            .collect()
    }

    /// Captures collectible snapshots in creation order.
    #[must_use]
    pub fn collectible_snapshots(board: &Board) -> Vec<CollectibleSnapshot> {
        board
            .collectibles
            .iter()
            .map(|collectible| CollectibleSnapshot {
                id: collectible.id,
                kind: collectible.kind,
                pos: collectible.pos,
                collected: collectible.collected,
            })
            .collect()
    }

    /// Captures barrier snapshots sorted by id.
    #[must_use]
    pub fn barrier_snapshots(board: &Board) -> Vec<BarrierSnapshot> {
        let mut snapshots: Vec<BarrierSnapshot> = board
            .barriers
            .iter()
            .map(|barrier| BarrierSnapshot {
                id: barrier.id,
                pos: barrier.pos,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures hazard snapshots in load order.
    #[must_use]
    pub fn hazard_snapshots(board: &Board) -> Vec<HazardSnapshot> {
        board
            .hazards
            .iter()
            .map(|hazard| HazardSnapshot {
                id: hazard.id,
                kind: hazard.kind,
                pos: hazard.pos,
                period: hazard.period,
                phase: hazard.phase,
                active: hazard.active,
            })
            .collect()
    }

    /// Static obstacle cells in load order.
    #[must_use]
    pub fn obstacles(board: &Board) -> &[GridPos] {
        &board.obstacles
    }
}

impl Board {
    /// Rebuilds a board from persisted snapshots. The inverse of the
    /// [`query`] snapshot accessors; used by the session's persistence
    /// round trip.
    #[must_use]
    pub fn restore(
        width: i32,
        height: i32,
        actors: &[query::ActorSnapshot],
        hostiles: &[query::HostileSnapshot],
        collectibles: &[query::CollectibleSnapshot],
        barriers: &[query::BarrierSnapshot],
        obstacles: &[GridPos],
        hazards: &[query::HazardSnapshot],
    ) -> Self {
        let mut board = Self::new(width, height);
        for snapshot in actors {
            let actor = Actor {
                id: snapshot.id,
                slot: snapshot.slot,
                flavor: snapshot.flavor,
                pos: snapshot.pos,
                facing: snapshot.facing,
                alive: snapshot.alive,
            };
            match snapshot.slot {
                ActorSlot::Primary => board.primary = Some(actor),
                ActorSlot::Secondary => board.secondary = Some(actor),
            }
        }
        board.hostiles = hostiles
            .iter()
            .map(|snapshot| Hostile {
                id: snapshot.id,
                kind: snapshot.kind,
                pos: snapshot.pos,
                alive: snapshot.alive,
                enclosed_ticks: snapshot.enclosed_ticks,
            })
            .collect();
        board.collectibles = collectibles
            .iter()
            .map(|snapshot| Collectible {
                id: snapshot.id,
                kind: snapshot.kind,
                pos: snapshot.pos,
                collected: snapshot.collected,
            })
            .collect();
        board.barriers = barriers
            .iter()
            .map(|snapshot| Barrier {
                id: snapshot.id,
                pos: snapshot.pos,
            })
            .collect();
        board.next_barrier_id = board
            .barriers
            .iter()
            .map(|barrier| barrier.id.get() + 1)
            .max()
            .unwrap_or(0);
        board.obstacles = obstacles.to_vec();
        board.hazards = hazards
            .iter()
            .map(|snapshot| Hazard {
                id: snapshot.id,
                kind: snapshot.kind,
                pos: snapshot.pos,
                period: snapshot.period,
                phase: snapshot.phase,
                active: snapshot.active,
            })
            .collect();
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use icebound_core::{ActorSlot, Direction, Flavor, GridPos, HostileKind};

    fn board_with_primary(flavor: Flavor) -> Board {
        let mut board = Board::new(8, 8);
        let _ = board
            .spawn_actor(ActorSlot::Primary, flavor, GridPos::new(4, 4))
            .expect("spawn primary");
        board
    }

    #[test]
    fn move_into_bounds_changes_position() {
        let mut board = board_with_primary(Flavor::Vanilla);
        assert!(board.move_actor(ActorSlot::Primary, Direction::North));
        assert_eq!(
            query::live_actor_position(&board, ActorSlot::Primary),
            Some(GridPos::new(4, 3))
        );
    }

    #[test]
    fn move_off_the_edge_is_a_no_op() {
        let mut board = Board::new(3, 3);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(0, 0))
            .expect("spawn primary");
        assert!(!board.move_actor(ActorSlot::Primary, Direction::North));
        assert_eq!(
            query::live_actor_position(&board, ActorSlot::Primary),
            Some(GridPos::new(0, 0))
        );
    }

    #[test]
    fn facing_turns_even_when_the_move_is_rejected() {
        let mut board = Board::new(3, 3);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(0, 0))
            .expect("spawn primary");
        assert!(!board.move_actor(ActorSlot::Primary, Direction::West));
        let snapshot = query::actor_snapshots(&board)[0];
        assert_eq!(snapshot.facing, Direction::West);
    }

    #[test]
    fn barrier_run_stops_at_obstacles() {
        let mut board = board_with_primary(Flavor::Chocolate);
        assert!(board.move_actor(ActorSlot::Primary, Direction::East));
        assert!(board.add_obstacle(GridPos::new(7, 4)));
        // Actor at (5,4) facing east; span 3 but the obstacle at (7,4)
        // truncates the run to a single cell.
        assert_eq!(board.place_barriers(ActorSlot::Primary), 1);
        assert_eq!(query::barrier_snapshots(&board).len(), 1);
        assert!(!board.is_passable(GridPos::new(6, 4)));
    }

    #[test]
    fn placement_rejected_when_first_cell_holds_a_barrier() {
        let mut board = board_with_primary(Flavor::Strawberry);
        assert!(board.move_actor(ActorSlot::Primary, Direction::East));
        assert_eq!(board.place_barriers(ActorSlot::Primary), 1);
        assert_eq!(board.place_barriers(ActorSlot::Primary), 0);
    }

    #[test]
    fn break_removes_the_nearest_barrier_on_the_facing_ray() {
        let mut board = board_with_primary(Flavor::Vanilla);
        assert!(board.move_actor(ActorSlot::Primary, Direction::East));
        assert_eq!(board.place_barriers(ActorSlot::Primary), 2);
        assert!(board.break_barrier(ActorSlot::Primary));
        assert!(board.is_passable(GridPos::new(6, 4)));
        assert!(!board.is_passable(GridPos::new(7, 4)));
    }

    #[test]
    fn placement_sealing_a_collectible_is_rejected_outright() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(3, 0))
            .expect("spawn primary");
        let _ = board
            .spawn_collectible(CollectibleKind::Banana, GridPos::new(0, 0))
            .expect("spawn banana");
        board.barriers.push(Barrier {
            id: BarrierId::new(900),
            pos: GridPos::new(0, 1),
        });

        // Facing west from (2,0) the claim would cover (1,0) and (0,0),
        // leaving the banana with no barrier-free route to it.
        assert!(board.move_actor(ActorSlot::Primary, Direction::West));
        assert_eq!(board.place_barriers(ActorSlot::Primary), 0);
        assert_eq!(query::barrier_snapshots(&board).len(), 1);
    }

    #[test]
    fn placement_beside_a_reachable_collectible_is_allowed() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(3, 0))
            .expect("spawn primary");
        let _ = board
            .spawn_collectible(CollectibleKind::Banana, GridPos::new(0, 0))
            .expect("spawn banana");

        // Same claim, but (0,1) stays open: the banana can still be freed
        // by breaking the covering barrier from below.
        assert!(board.move_actor(ActorSlot::Primary, Direction::West));
        assert_eq!(board.place_barriers(ActorSlot::Primary), 2);
    }

    #[test]
    fn hostiles_are_blocked_by_barriers_except_the_wanderer() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Strawberry, GridPos::new(0, 4))
            .expect("spawn primary");
        let blocked = board
            .spawn_hostile(HostileKind::Patroller, GridPos::new(2, 2))
            .expect("spawn patroller");
        let walker = board
            .spawn_hostile(HostileKind::Wanderer, GridPos::new(2, 0))
            .expect("spawn wanderer");
        // Wall off (2,1).
        board.barriers.push(Barrier {
            id: BarrierId::new(900),
            pos: GridPos::new(2, 1),
        });
        assert!(!board.move_hostile(blocked, Direction::North));
        assert!(board.move_hostile(walker, Direction::South));
    }

    #[test]
    fn sharing_a_cell_with_a_live_hostile_fells_the_actor() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(1, 2))
            .expect("spawn primary");
        let hostile = board
            .spawn_hostile(HostileKind::Demolisher, GridPos::new(2, 2))
            .expect("spawn demolisher");

        assert!(board.move_actor(ActorSlot::Primary, Direction::East));
        let mut events = Vec::new();
        board.resolve_collisions(&mut events);
        assert_eq!(
            events,
            vec![BoardEvent::ActorFelled {
                actor: ActorId::new(0),
                cause: FellCause::Hostile(hostile),
            }]
        );
        assert!(!query::actor_snapshots(&board)[0].alive);
        assert!(query::live_actor_position(&board, ActorSlot::Primary).is_none());
    }

    #[test]
    fn flame_hazards_fell_actors_only_while_active() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(2, 2))
            .expect("spawn primary");
        let flame = board
            .add_hazard(HazardKind::Flame, GridPos::new(2, 2), 2)
            .expect("add flame");

        let mut events = Vec::new();
        board.resolve_collisions(&mut events);
        assert!(events.is_empty(), "flames start dormant");

        board.advance_hazards();
        assert!(!query::hazard_snapshots(&board)[0].active);
        board.advance_hazards();
        assert!(query::hazard_snapshots(&board)[0].active);

        board.resolve_collisions(&mut events);
        assert_eq!(
            events,
            vec![BoardEvent::ActorFelled {
                actor: ActorId::new(0),
                cause: FellCause::Hazard(flame),
            }]
        );
    }

    #[test]
    fn heat_tiles_are_active_from_the_start() {
        let mut board = Board::new(5, 5);
        let _ = board
            .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(2, 2))
            .expect("spawn primary");
        let _ = board
            .add_hazard(HazardKind::HeatTile, GridPos::new(2, 1), 1)
            .expect("add heat tile");

        assert!(board.move_actor(ActorSlot::Primary, Direction::North));
        let mut events = Vec::new();
        board.resolve_collisions(&mut events);
        assert!(matches!(
            events.as_slice(),
            [BoardEvent::ActorFelled {
                cause: FellCause::Hazard(_),
                ..
            }]
        ));
    }

    #[test]
    fn enclosure_threshold_eliminates_after_consecutive_ticks() {
        let mut board = Board::new(3, 3);
        let hostile = board
            .spawn_hostile(HostileKind::Ambusher, GridPos::new(1, 1))
            .expect("spawn ambusher");
        for pos in [
            GridPos::new(1, 0),
            GridPos::new(2, 1),
            GridPos::new(1, 2),
            GridPos::new(0, 1),
        ] {
            board.barriers.push(Barrier {
                id: BarrierId::new(board.next_barrier_id),
                pos,
            });
            board.next_barrier_id += 1;
        }

        let mut events = Vec::new();
        board.eliminate_enclosed_hostiles(&mut events);
        assert!(events.is_empty(), "one tick is below the threshold");
        board.eliminate_enclosed_hostiles(&mut events);
        assert_eq!(events, vec![BoardEvent::HostileEliminated { hostile }]);
        assert!(query::live_hostile_positions(&board).is_empty());
    }

    #[test]
    fn enclosure_counter_resets_when_an_opening_appears() {
        let mut board = Board::new(3, 3);
        let _ = board
            .spawn_hostile(HostileKind::Ambusher, GridPos::new(1, 1))
            .expect("spawn ambusher");
        for pos in [
            GridPos::new(1, 0),
            GridPos::new(2, 1),
            GridPos::new(1, 2),
            GridPos::new(0, 1),
        ] {
            board.barriers.push(Barrier {
                id: BarrierId::new(board.next_barrier_id),
                pos,
            });
            board.next_barrier_id += 1;
        }

        let mut events = Vec::new();
        board.eliminate_enclosed_hostiles(&mut events);
        assert!(board.remove_barrier_at(GridPos::new(1, 0)));
        board.eliminate_enclosed_hostiles(&mut events);
        assert!(events.is_empty());
        assert_eq!(query::hostile_snapshots(&board)[0].enclosed_ticks, 0);
    }
}
