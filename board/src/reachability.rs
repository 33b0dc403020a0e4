//! Breadth-first reachability used by the barrier fairness rule.

use std::collections::VecDeque;

use icebound_core::{Direction, GridPos};

/// Reports whether any goal would become unreachable from `origin` when
/// only `passable` cells may be traversed.
///
/// A goal counts as reachable when the search visits its cell or any of
/// its cardinal neighbors: a collectible iced over by the pending claim can
/// still be freed by an actor breaking the barrier from an adjacent cell.
pub(crate) fn any_goal_sealed<F>(
    origin: GridPos,
    goals: &[GridPos],
    width: i32,
    height: i32,
    passable: F,
) -> bool
where
    F: Fn(GridPos) -> bool,
{
    if width <= 0 || height <= 0 {
        return !goals.is_empty();
    }
    let cells = (width as usize) * (height as usize);
    let index = |pos: GridPos| -> Option<usize> {
        if pos.x() < 0 || pos.y() < 0 || pos.x() >= width || pos.y() >= height {
            return None;
        }
        Some((pos.y() as usize) * (width as usize) + pos.x() as usize)
    };

    let mut visited = vec![false; cells];
    let mut queue = VecDeque::new();
    if let Some(start) = index(origin) {
        visited[start] = true;
        queue.push_back(origin);
    }

    while let Some(current) = queue.pop_front() {
        for direction in Direction::ALL {
            let neighbor = current.step(direction);
            let Some(slot) = index(neighbor) else {
                continue;
            };
            if visited[slot] || !passable(neighbor) {
                continue;
            }
            visited[slot] = true;
            queue.push_back(neighbor);
        }
    }

    goals.iter().any(|goal| {
        let on_goal = index(*goal).map_or(false, |slot| visited[slot]);
        let beside_goal = Direction::ALL.iter().any(|direction| {
            index(goal.step(*direction)).map_or(false, |slot| visited[slot])
        });
        !(on_goal || beside_goal)
    })
}
