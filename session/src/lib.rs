#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match orchestration for Icebound.
//!
//! A [`Match`] owns the board, the strategy control systems, the seeded
//! random stream, the countdown clock, the score, and the state machine.
//! The tick function is the sole mutator and resolves every phase in a
//! fixed order so identical inputs always produce identical matches.

pub mod level;

pub use level::{LevelConfig, LevelError, MatchSetup};

use std::time::Duration;

use icebound_board::{query, Board, BoardEvent};
use icebound_core::{
    ActorSlot, CollectibleKind, DecisionKind, Direction, Flavor, GridPos, HostileId, HostileKind,
    MatchMode, MatchState, MovementKind, StrategyAction,
};
use icebound_strategy::{
    ActorControl, CollectibleDrift, DriftProposal, HostileControl, HostileOrder, StrategyCatalog,
};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single running (or finished) game.
#[derive(Debug)]
pub struct Match {
    catalog: StrategyCatalog,
    mode: MatchMode,
    state: MatchState,
    level: u32,
    primary_flavor: Flavor,
    secondary_flavor: Option<Flavor>,
    decision: Option<DecisionKind>,
    hostile_override: Option<Vec<(HostileKind, GridPos)>>,
    collectible_override: Option<Vec<(CollectibleKind, GridPos)>>,
    seed: u64,
    board: Board,
    hostile_control: HostileControl,
    actor_control: Option<ActorControl>,
    drift: CollectibleDrift,
    rng: ChaCha8Rng,
    score: u32,
    remaining_time: u32,
    clock_carry: Duration,
    tick_index: u64,
    orders: Vec<HostileOrder>,
    proposals: Vec<DriftProposal>,
    events: Vec<BoardEvent>,
}

impl Match {
    /// Builds a match in the menu state. Fails when the setup names an
    /// unknown decision strategy or a co-op setup lacks a second flavor.
    pub fn new(catalog: StrategyCatalog, setup: MatchSetup) -> Result<Self, LevelError> {
        let decision = match setup.mode {
            MatchMode::Spectator => Some(match &setup.decision {
                Some(name) => catalog
                    .decision_by_name(name)
                    .ok_or_else(|| LevelError::UnknownStrategy(name.clone()))?,
                None => DecisionKind::Expert,
            }),
            MatchMode::Solo | MatchMode::Coop => None,
        };
        if setup.mode == MatchMode::Coop && setup.secondary_flavor.is_none() {
            return Err(LevelError::MissingSecondary);
        }
        Ok(Self {
            catalog,
            mode: setup.mode,
            state: MatchState::Menu,
            level: 0,
            primary_flavor: setup.primary_flavor,
            secondary_flavor: setup.secondary_flavor,
            decision,
            hostile_override: setup.hostiles,
            collectible_override: setup.collectibles,
            seed: setup.seed,
            board: Board::new(0, 0),
            hostile_control: HostileControl::new(),
            actor_control: None,
            drift: CollectibleDrift::new(),
            rng: ChaCha8Rng::seed_from_u64(setup.seed),
            score: 0,
            remaining_time: 0,
            clock_carry: Duration::ZERO,
            tick_index: 0,
            orders: Vec::new(),
            proposals: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Starts the numbered built-in level, re-initializing board, score
    /// and clock. Valid only from the menu or a finished match.
    pub fn start_level(&mut self, number: u32) -> Result<(), LevelError> {
        if self.state != MatchState::Menu && !self.state.is_terminal() {
            log::warn!("rejected start_level({number}) while {:?}", self.state);
            return Err(LevelError::InvalidState);
        }
        let mut config = LevelConfig::builtin(number)?;
        if let Some(hostiles) = &self.hostile_override {
            config.hostiles = hostiles.clone();
        }
        if let Some(collectibles) = &self.collectible_override {
            config.collectibles = collectibles.clone();
        }
        config.validate()?;
        if self.mode == MatchMode::Coop && config.secondary_spawn.is_none() {
            return Err(LevelError::MissingSecondary);
        }

        let mut board = Board::new(config.width, config.height);
        for pos in &config.obstacles {
            let _ = board.add_obstacle(*pos);
        }
        let _ = board.spawn_actor(ActorSlot::Primary, self.primary_flavor, config.primary_spawn);
        if self.mode == MatchMode::Coop {
            if let (Some(flavor), Some(spawn)) = (self.secondary_flavor, config.secondary_spawn) {
                let _ = board.spawn_actor(ActorSlot::Secondary, flavor, spawn);
            }
        }
        let mut hostile_control = HostileControl::new();
        for (kind, pos) in &config.hostiles {
            if let Some(id) = board.spawn_hostile(*kind, *pos) {
                let movement = self.catalog.movement_for(*kind);
                hostile_control.assign(id, self.catalog.movement_strategy(movement));
            }
        }
        let mut drift = CollectibleDrift::new();
        for (kind, pos) in &config.collectibles {
            if let Some(id) = board.spawn_collectible(*kind, *pos) {
                drift.assign(id, self.catalog.behavior_for(*kind));
            }
        }
        for (kind, pos, period) in &config.hazards {
            let _ = board.add_hazard(*kind, *pos, *period);
        }

        self.board = board;
        self.hostile_control = hostile_control;
        self.drift = drift;
        self.actor_control = self
            .decision
            .map(|kind| ActorControl::from_kind(&self.catalog, ActorSlot::Primary, kind));
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.level = number;
        self.score = 0;
        self.remaining_time = config.time_budget;
        self.clock_carry = Duration::ZERO;
        self.tick_index = 0;
        self.state = MatchState::Playing;
        log::info!(
            "level {number} started: {:?}, {}s budget",
            self.mode,
            config.time_budget
        );
        Ok(())
    }

    /// Advances the simulation by one tick. A no-op outside the playing
    /// state; pause freezes everything including the clock.
    pub fn tick(&mut self, dt: Duration) {
        if self.state != MatchState::Playing {
            return;
        }
        self.tick_index += 1;

        self.resolve_autonomous_actor();
        self.resolve_hostiles();
        self.board.advance_hazards();
        self.resolve_drift();
        self.resolve_interactions();
        self.advance_clock(dt);
        self.evaluate_terminal();
    }

    fn resolve_autonomous_actor(&mut self) {
        let Some(control) = self.actor_control else {
            return;
        };
        if self.tick_index % self.primary_flavor.step_interval() != 0 {
            return;
        }
        match control.handle(&self.board, &mut self.rng) {
            StrategyAction::Move(direction) => {
                let _ = self.board.move_actor(control.slot(), direction);
            }
            StrategyAction::Stay | StrategyAction::Demolish(_) => {}
        }
    }

    fn resolve_hostiles(&mut self) {
        let mut orders = std::mem::take(&mut self.orders);
        orders.clear();
        self.hostile_control
            .handle(&self.board, &mut self.rng, &mut orders);
        for order in &orders {
            match order.action {
                StrategyAction::Move(direction) => {
                    let _ = self.board.move_hostile(order.hostile, direction);
                }
                StrategyAction::Demolish(direction) => {
                    let _ = self.board.demolish_toward(order.hostile, direction);
                }
                StrategyAction::Stay => {}
            }
        }
        self.orders = orders;
    }

    fn resolve_drift(&mut self) {
        let mut proposals = std::mem::take(&mut self.proposals);
        proposals.clear();
        self.drift.handle(&self.board, &mut self.rng, &mut proposals);
        for proposal in &proposals {
            let _ = self
                .board
                .relocate_collectible(proposal.collectible, proposal.destination);
        }
        self.proposals = proposals;
    }

    fn resolve_interactions(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        self.board.resolve_collisions(&mut events);
        self.board.eliminate_enclosed_hostiles(&mut events);
        for event in &events {
            match event {
                BoardEvent::CollectibleCollected { points, .. } => {
                    self.score = self.score.saturating_add(*points);
                }
                BoardEvent::ActorFelled { actor, cause } => {
                    log::debug!("actor {actor:?} felled by {cause:?}");
                }
                BoardEvent::HostileEliminated { hostile } => {
                    log::debug!("hostile {hostile:?} eliminated by enclosure");
                }
            }
        }
        self.events = events;
    }

    fn advance_clock(&mut self, dt: Duration) {
        self.clock_carry += dt;
        while self.clock_carry >= Duration::from_secs(1) && self.remaining_time > 0 {
            self.clock_carry -= Duration::from_secs(1);
            self.remaining_time -= 1;
        }
    }

    fn evaluate_terminal(&mut self) {
        let primary_alive = query::live_actor_position(&self.board, ActorSlot::Primary).is_some();
        let secondary_alive =
            query::live_actor_position(&self.board, ActorSlot::Secondary).is_some();
        let actors_defeated = match self.mode {
            MatchMode::Coop => !primary_alive && !secondary_alive,
            MatchMode::Solo | MatchMode::Spectator => !primary_alive,
        };

        let next = if self.remaining_time == 0 {
            Some(MatchState::Lost)
        } else if actors_defeated {
            Some(MatchState::Lost)
        } else if query::all_collected(&self.board) {
            Some(MatchState::Won)
        } else {
            None
        };
        if let Some(state) = next {
            log::info!(
                "match over after tick {}: {state:?} with score {}",
                self.tick_index,
                self.score
            );
            self.state = state;
        }
    }

    /// Moves the primary actor. False outside the playing state, in modes
    /// without an addressable primary, or when the step is rejected.
    pub fn move_ice_cream(&mut self, direction: Direction) -> bool {
        if self.state != MatchState::Playing
            || !self.mode.slot_addressable(ActorSlot::Primary)
        {
            return false;
        }
        self.board.move_actor(ActorSlot::Primary, direction)
    }

    /// Moves the secondary actor. False outside co-op.
    pub fn move_second_ice_cream(&mut self, direction: Direction) -> bool {
        if self.state != MatchState::Playing
            || !self.mode.slot_addressable(ActorSlot::Secondary)
        {
            return false;
        }
        self.board.move_actor(ActorSlot::Secondary, direction)
    }

    /// Raises a barrier run ahead of the primary actor. Returns the number
    /// of cells claimed, zero on rejection.
    pub fn toggle_ice_blocks(&mut self) -> i32 {
        self.toggle_ice_blocks_for(ActorSlot::Primary)
    }

    /// Raises a barrier run ahead of the actor in the given slot.
    pub fn toggle_ice_blocks_for(&mut self, slot: ActorSlot) -> i32 {
        if self.state != MatchState::Playing || !self.mode.slot_addressable(slot) {
            return 0;
        }
        self.board.place_barriers(slot)
    }

    /// Breaks the nearest barrier ahead of the primary actor.
    pub fn break_ice_block(&mut self) -> bool {
        self.break_ice_block_for(ActorSlot::Primary)
    }

    /// Breaks the nearest barrier ahead of the actor in the given slot.
    pub fn break_ice_block_for(&mut self, slot: ActorSlot) -> bool {
        if self.state != MatchState::Playing || !self.mode.slot_addressable(slot) {
            return false;
        }
        self.board.break_barrier(slot)
    }

    /// Toggles between playing and paused. An involution on those two
    /// states; false (and no transition) anywhere else.
    pub fn toggle_pause(&mut self) -> bool {
        let next = match self.state {
            MatchState::Playing => MatchState::Paused,
            MatchState::Paused => MatchState::Playing,
            MatchState::Menu | MatchState::Won | MatchState::Lost => return false,
        };
        log::info!("{:?} -> {next:?}", self.state);
        self.state = next;
        true
    }

    /// Adds to the score. Saturating; the score never decreases.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Whole seconds left on the countdown.
    #[must_use]
    pub const fn remaining_time(&self) -> u32 {
        self.remaining_time
    }

    /// Current state-machine state.
    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Match topology.
    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Flavors fielded by this match, primary first.
    #[must_use]
    pub const fn flavors(&self) -> (Flavor, Option<Flavor>) {
        (self.primary_flavor, self.secondary_flavor)
    }

    /// Read-only board access for renderers and tests.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Ticks resolved since the level started.
    #[must_use]
    pub const fn tick_index(&self) -> u64 {
        self.tick_index
    }

    /// Seed of the match's random stream.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Captures every observable attribute for persistence.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        let (width, height) = query::dimensions(&self.board);
        MatchSnapshot {
            mode: self.mode,
            state: self.state,
            level: self.level,
            primary_flavor: self.primary_flavor,
            secondary_flavor: self.secondary_flavor,
            decision: self
                .actor_control
                .map(|control| control.kind())
                .or(self.decision),
            score: self.score,
            remaining_time: self.remaining_time,
            tick_index: self.tick_index,
            seed: self.seed,
            width,
            height,
            actors: query::actor_snapshots(&self.board),
            hostiles: query::hostile_snapshots(&self.board),
            movements: self.hostile_control.kinds(),
            collectibles: query::collectible_snapshots(&self.board),
            barriers: query::barrier_snapshots(&self.board),
            obstacles: query::obstacles(&self.board).to_vec(),
            hazards: query::hazard_snapshots(&self.board),
        }
    }

    /// Rebuilds a match from a snapshot, rebinding persisted strategy kind
    /// tags to fresh instances through the catalog. Strategy identity is
    /// not preserved, only kind; the random stream restarts from the
    /// persisted seed.
    #[must_use]
    pub fn restore(snapshot: MatchSnapshot, catalog: &StrategyCatalog) -> Self {
        let board = Board::restore(
            snapshot.width,
            snapshot.height,
            &snapshot.actors,
            &snapshot.hostiles,
            &snapshot.collectibles,
            &snapshot.barriers,
            &snapshot.obstacles,
            &snapshot.hazards,
        );
        let mut drift = CollectibleDrift::new();
        for collectible in &snapshot.collectibles {
            drift.assign(collectible.id, catalog.behavior_for(collectible.kind));
        }
        Self {
            catalog: catalog.clone(),
            mode: snapshot.mode,
            state: snapshot.state,
            level: snapshot.level,
            primary_flavor: snapshot.primary_flavor,
            secondary_flavor: snapshot.secondary_flavor,
            decision: snapshot.decision,
            hostile_override: None,
            collectible_override: None,
            seed: snapshot.seed,
            board,
            hostile_control: HostileControl::from_kinds(catalog, &snapshot.movements),
            actor_control: snapshot
                .decision
                .map(|kind| ActorControl::from_kind(catalog, ActorSlot::Primary, kind)),
            drift,
            rng: ChaCha8Rng::seed_from_u64(snapshot.seed),
            score: snapshot.score,
            remaining_time: snapshot.remaining_time,
            clock_carry: Duration::ZERO,
            tick_index: snapshot.tick_index,
            orders: Vec::new(),
            proposals: Vec::new(),
            events: Vec::new(),
        }
    }
}

/// Serializable image of every observable match attribute.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Match topology.
    pub mode: MatchMode,
    /// State-machine state at capture time.
    pub state: MatchState,
    /// Built-in level number last started.
    pub level: u32,
    /// Primary actor flavor.
    pub primary_flavor: Flavor,
    /// Secondary actor flavor, co-op only.
    pub secondary_flavor: Option<Flavor>,
    /// Decision strategy steering the autonomous actor, spectator only.
    pub decision: Option<DecisionKind>,
    /// Score at capture time.
    pub score: u32,
    /// Whole seconds left on the countdown.
    pub remaining_time: u32,
    /// Ticks resolved since the level started.
    pub tick_index: u64,
    /// Seed of the match's random stream.
    pub seed: u64,
    /// Board width in cells.
    pub width: i32,
    /// Board height in cells.
    pub height: i32,
    /// Actor states, primary first.
    pub actors: Vec<query::ActorSnapshot>,
    /// Hostile states in spawn order.
    pub hostiles: Vec<query::HostileSnapshot>,
    /// Movement strategy kind per hostile, in spawn order.
    pub movements: Vec<(HostileId, MovementKind)>,
    /// Collectible states in creation order.
    pub collectibles: Vec<query::CollectibleSnapshot>,
    /// Barrier cells sorted by id.
    pub barriers: Vec<query::BarrierSnapshot>,
    /// Static obstacle cells.
    pub obstacles: Vec<GridPos>,
    /// Hazard states in load order.
    pub hazards: Vec<query::HazardSnapshot>,
}
