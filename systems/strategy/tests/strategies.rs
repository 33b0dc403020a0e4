use icebound_board::Board;
use icebound_core::{
    ActorSlot, CollectibleKind, Direction, Flavor, GridPos, HostileKind, MovementKind,
    StrategyAction,
};
use icebound_strategy::{
    CollectibleBehavior, DecisionStrategy, HostileControl, MovementStrategy, Observation,
    StrategyCatalog,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(7)
}

fn observation_at<'a>(origin: GridPos) -> Observation<'a> {
    Observation::new(origin, &[], &[], &[], &[])
}

#[test]
fn circuit_walks_its_heading_while_open() {
    let mut circuit = MovementStrategy::circuit();
    let observation = observation_at(GridPos::new(2, 2));

    let action = circuit.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::North));
    let action = circuit.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::North));
}

#[test]
fn circuit_advances_only_when_blocked() {
    let mut circuit = MovementStrategy::circuit();
    let origin = GridPos::new(2, 2);
    let observation = observation_at(origin);
    let north_blocked = |cell: GridPos| cell != origin.step(Direction::North);

    let action = circuit.decide(&observation, north_blocked, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
    // The advanced heading persists across invocations.
    let action = circuit.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
}

#[test]
fn circuit_stays_when_fully_enclosed() {
    let mut circuit = MovementStrategy::circuit();
    let observation = observation_at(GridPos::new(2, 2));
    assert_eq!(
        circuit.decide(&observation, |_| false, &mut rng()),
        StrategyAction::Stay
    );
}

#[test]
fn random_wander_only_proposes_passable_directions() {
    let mut wander = MovementStrategy::random_wander();
    let origin = GridPos::new(2, 2);
    let observation = observation_at(origin);
    let east_only = |cell: GridPos| cell == origin.step(Direction::East);

    let mut rng = rng();
    for _ in 0..16 {
        assert_eq!(
            wander.decide(&observation, east_only, &mut rng),
            StrategyAction::Move(Direction::East)
        );
    }
}

#[test]
fn random_wander_stays_when_enclosed() {
    let mut wander = MovementStrategy::random_wander();
    let observation = observation_at(GridPos::new(2, 2));
    assert_eq!(
        wander.decide(&observation, |_| false, &mut rng()),
        StrategyAction::Stay
    );
}

#[test]
fn chase_prefers_the_axis_with_the_larger_offset() {
    let mut chase = MovementStrategy::chase();
    let actors = [GridPos::new(6, 3)];
    let observation = Observation::new(GridPos::new(2, 2), &actors, &[], &[], &[]);

    let action = chase.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
}

#[test]
fn chase_breaks_axis_ties_horizontally() {
    let mut chase = MovementStrategy::chase();
    let actors = [GridPos::new(5, 5)];
    let observation = Observation::new(GridPos::new(2, 2), &actors, &[], &[], &[]);

    let action = chase.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
}

#[test]
fn chase_demolishes_a_barrier_blocking_the_preferred_direction() {
    let mut chase = MovementStrategy::chase();
    let origin = GridPos::new(2, 2);
    let actors = [GridPos::new(6, 2)];
    let barrier = origin.step(Direction::East);
    let barriers = [barrier];
    let observation = Observation::new(origin, &actors, &[], &[], &barriers);

    let action = chase.decide(&observation, |cell| cell != barrier, &mut rng());
    assert_eq!(action, StrategyAction::Demolish(Direction::East));
}

#[test]
fn chase_falls_back_to_the_secondary_axis_behind_an_obstacle() {
    let mut chase = MovementStrategy::chase();
    let origin = GridPos::new(2, 2);
    let actors = [GridPos::new(6, 3)];
    let blocked = origin.step(Direction::East);
    // No barrier listed at the blocked cell, so it reads as a wall.
    let observation = Observation::new(origin, &actors, &[], &[], &[]);

    let action = chase.decide(&observation, |cell| cell != blocked, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::South));
}

#[test]
fn ambush_stays_dormant_until_an_actor_comes_near() {
    let catalog = StrategyCatalog::standard();
    let mut ambush = catalog.movement_strategy(icebound_core::MovementKind::Ambush);
    let far_actor = [GridPos::new(9, 9)];
    let observation = Observation::new(GridPos::new(1, 1), &far_actor, &[], &[], &[]);

    assert_eq!(
        ambush.decide(&observation, |_| true, &mut rng()),
        StrategyAction::Stay
    );
    assert_eq!(ambush.step_count(), 1);
}

#[test]
fn ambush_sprints_after_a_trigger_and_reverts_when_spent() {
    let mut ambush = MovementStrategy::ambush(3, 2);
    let near_actor = [GridPos::new(3, 1)];
    let observation = Observation::new(GridPos::new(1, 1), &near_actor, &[], &[], &[]);

    let action = ambush.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
    assert_eq!(ambush.step_count(), 2);

    ambush.end_tick();
    assert_eq!(ambush.step_count(), 2);
    ambush.end_tick();
    assert_eq!(ambush.step_count(), 1);

    // Dormant again once spent: a distant actor keeps it still.
    let far_actor = [GridPos::new(9, 9)];
    let observation = Observation::new(GridPos::new(1, 1), &far_actor, &[], &[], &[]);
    assert_eq!(
        ambush.decide(&observation, |_| true, &mut rng()),
        StrategyAction::Stay
    );
}

#[test]
fn a_triggered_ambusher_sprints_on_the_trigger_tick() {
    let mut board = Board::new(7, 7);
    let _ = board
        .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(1, 1))
        .expect("spawn primary");
    let ambusher = board
        .spawn_hostile(HostileKind::Ambusher, GridPos::new(3, 1))
        .expect("spawn ambusher");
    let catalog = StrategyCatalog::standard();
    let mut control = HostileControl::new();
    control.assign(ambusher, catalog.movement_strategy(MovementKind::Ambush));

    // The actor is already within the trigger radius, so the very first
    // tick runs at the elevated step count.
    let mut orders = Vec::new();
    control.handle(&board, &mut rng(), &mut orders);
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|order| order.hostile == ambusher));
}

#[test]
fn a_dormant_ambusher_emits_a_single_order() {
    let mut board = Board::new(12, 12);
    let _ = board
        .spawn_actor(ActorSlot::Primary, Flavor::Vanilla, GridPos::new(1, 1))
        .expect("spawn primary");
    let ambusher = board
        .spawn_hostile(HostileKind::Ambusher, GridPos::new(10, 10))
        .expect("spawn ambusher");
    let catalog = StrategyCatalog::standard();
    let mut control = HostileControl::new();
    control.assign(ambusher, catalog.movement_strategy(MovementKind::Ambush));

    let mut orders = Vec::new();
    control.handle(&board, &mut rng(), &mut orders);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].action, StrategyAction::Stay);
}

#[test]
fn catalog_behaviors_carry_the_collectible_motion_tags() {
    let catalog = StrategyCatalog::standard();
    for kind in [
        CollectibleKind::Banana,
        CollectibleKind::Grape,
        CollectibleKind::Cherry,
        CollectibleKind::Pineapple,
        CollectibleKind::Melon,
    ] {
        assert_eq!(catalog.behavior_for(kind).motion(), kind.motion());
    }
}

#[test]
fn random_patrol_keeps_its_heading_until_blocked() {
    let mut patrol = MovementStrategy::random_patrol();
    let origin = GridPos::new(2, 2);
    let observation = observation_at(origin);

    let mut rng = rng();
    let first = patrol.decide(&observation, |_| true, &mut rng);
    let StrategyAction::Move(heading) = first else {
        panic!("patrol must move on an open board");
    };
    for _ in 0..8 {
        assert_eq!(
            patrol.decide(&observation, |_| true, &mut rng),
            StrategyAction::Move(heading)
        );
    }
}

#[test]
fn hungry_moves_toward_the_nearest_collectible_with_creation_order_ties() {
    let hungry = DecisionStrategy::Hungry;
    let collectibles = [GridPos::new(5, 2), GridPos::new(2, 5)];
    let observation = Observation::new(GridPos::new(2, 2), &[], &[], &collectibles, &[]);

    let action = hungry.decide(&observation, |_| true, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
}

#[test]
fn fearful_maximizes_distance_to_the_nearest_hostile() {
    let fearful = DecisionStrategy::Fearful;
    let hostiles = [GridPos::new(0, 2)];
    let observation = Observation::new(GridPos::new(2, 2), &[], &hostiles, &[], &[]);

    // A corridor along y == 2 leaves exactly one safest direction.
    let action = fearful.decide(&observation, |cell| cell.y() == 2, &mut rng());
    assert_eq!(action, StrategyAction::Move(Direction::East));
}

#[test]
fn fearful_stays_when_nothing_is_passable() {
    let fearful = DecisionStrategy::Fearful;
    let hostiles = [GridPos::new(0, 2)];
    let observation = Observation::new(GridPos::new(2, 2), &[], &hostiles, &[], &[]);

    assert_eq!(
        fearful.decide(&observation, |_| false, &mut rng()),
        StrategyAction::Stay
    );
}

#[test]
fn expert_forages_when_safe_and_flees_when_threatened() {
    let catalog = StrategyCatalog::standard();
    let expert = catalog.decision_strategy(icebound_core::DecisionKind::Expert);
    let collectibles = [GridPos::new(6, 2)];

    let safe_hostiles = [GridPos::new(2, 9)];
    let observation = Observation::new(GridPos::new(2, 2), &[], &safe_hostiles, &collectibles, &[]);
    assert_eq!(
        expert.decide(&observation, |_| true, &mut rng()),
        StrategyAction::Move(Direction::East)
    );

    let close_hostiles = [GridPos::new(2, 4)];
    let observation =
        Observation::new(GridPos::new(2, 2), &[], &close_hostiles, &collectibles, &[]);
    // Restricted to the vertical corridor, flight has one clear answer.
    assert_eq!(
        expert.decide(&observation, |cell| cell.x() == 2, &mut rng()),
        StrategyAction::Move(Direction::North)
    );
}

#[test]
fn patrol_behavior_turns_around_when_blocked() {
    let mut behavior = CollectibleBehavior::patrol();
    let current = GridPos::new(3, 3);
    let east = current.step(Direction::East);

    // Blocked eastward: turn this tick, move west the next.
    let proposal = behavior.propose(current, (8, 8), |cell| cell != east, &mut rng());
    assert_eq!(proposal, None);
    let proposal = behavior.propose(current, (8, 8), |cell| cell != east, &mut rng());
    assert_eq!(proposal, Some(current.step(Direction::West)));
}

#[test]
fn teleport_behavior_waits_out_its_period_then_jumps() {
    let mut behavior = CollectibleBehavior::teleport(3);
    let current = GridPos::new(1, 1);
    let mut rng = rng();

    assert_eq!(behavior.propose(current, (8, 8), |_| true, &mut rng), None);
    assert_eq!(behavior.propose(current, (8, 8), |_| true, &mut rng), None);
    let jump = behavior.propose(current, (8, 8), |_| true, &mut rng);
    let destination = jump.expect("period elapsed, the melon jumps");
    assert_ne!(destination, current);
    assert!(destination.x() >= 0 && destination.x() < 8);
    assert!(destination.y() >= 0 && destination.y() < 8);
}
