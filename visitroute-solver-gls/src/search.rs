//! Guided local search over closed tours.
//!
//! Routes are stored closed (`[0, .., 0]`). Moves only touch the interior
//! positions, so the depot stays anchored at both ends.
//!
//! The search descends on an augmented objective: the true arc costs plus
//! `lambda` times a per-arc penalty. Each time the descent reaches a local
//! optimum, the arcs of that tour with the highest utility
//! `cost / (1 + penalty)` have their penalty raised, which pushes the next
//! descent away from them. The best tour by true cost seen at any point is
//! kept and returned.

use std::cmp::Ordering;
use std::time::Instant;

use log::debug;
use visitroute_core::CostMatrix;

use crate::construction::arc_cost;
use crate::solver::GlsConfig;

/// A neighbourhood move on a closed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    /// Reverse the route between two interior positions, inclusive.
    TwoOpt { first: usize, last: usize },
    /// Take the stop at one interior position and reinsert it at another.
    Relocate { from: usize, to: usize },
}

impl Move {
    fn apply(self, route: &mut Vec<usize>) {
        match self {
            Self::TwoOpt { first, last } => {
                if let Some(segment) = route.get_mut(first..=last) {
                    segment.reverse();
                }
            }
            Self::Relocate { from, to } => {
                if from < route.len() {
                    let stop = route.remove(from);
                    route.insert(to.min(route.len()), stop);
                }
            }
        }
    }
}

/// Every 2-opt and relocate move for a closed route over `stops` stops.
///
/// Interior positions run from `1` to `stops - 1`.
fn neighbourhood(stops: usize) -> impl Iterator<Item = Move> {
    let two_opt = (1..stops).flat_map(move |first| {
        (first.saturating_add(1)..stops).map(move |last| Move::TwoOpt { first, last })
    });
    let relocate = (1..stops).flat_map(move |from| {
        (1..stops)
            .filter(move |&to| to != from)
            .map(move |to| Move::Relocate { from, to })
    });
    two_opt.chain(relocate)
}

/// Best route by true cost seen so far.
#[derive(Debug)]
struct Incumbent {
    route: Vec<usize>,
    cost: u64,
}

impl Incumbent {
    fn new(matrix: &CostMatrix, route: &[usize]) -> Self {
        Self {
            route: route.to_vec(),
            cost: matrix.path_cost(route).unwrap_or(u64::MAX),
        }
    }

    fn offer(&mut self, matrix: &CostMatrix, route: &[usize]) {
        let cost = matrix.path_cost(route).unwrap_or(u64::MAX);
        if cost < self.cost {
            self.route.clear();
            self.route.extend_from_slice(route);
            self.cost = cost;
        }
    }
}

struct GuidedSearch<'a> {
    matrix: &'a CostMatrix,
    stops: usize,
    penalties: Vec<u64>,
    lambda: u64,
    deadline: Option<Instant>,
}

impl<'a> GuidedSearch<'a> {
    fn new(matrix: &'a CostMatrix, deadline: Option<Instant>) -> Self {
        let stops = matrix.len();
        Self {
            matrix,
            stops,
            penalties: vec![0; stops.saturating_mul(stops)],
            lambda: 0,
            deadline,
        }
    }

    fn expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    fn penalty(&self, from: usize, to: usize) -> u64 {
        self.penalties
            .get(from.saturating_mul(self.stops).saturating_add(to))
            .copied()
            .unwrap_or(0)
    }

    fn raise_penalty(&mut self, from: usize, to: usize) {
        let slot = from.saturating_mul(self.stops).saturating_add(to);
        if let Some(penalty) = self.penalties.get_mut(slot) {
            *penalty = penalty.saturating_add(1);
        }
    }

    /// Set `lambda` from the cost of the first local optimum, scaled by
    /// `percent` and averaged over the tour's arcs. Never below one.
    fn calibrate(&mut self, local_optimum_cost: u64, percent: u64) {
        let arcs = u64::try_from(self.stops).unwrap_or(u64::MAX).max(1);
        self.lambda = local_optimum_cost
            .saturating_mul(percent)
            .checked_div(arcs.saturating_mul(100))
            .unwrap_or(0)
            .max(1);
    }

    fn augmented_cost(&self, route: &[usize]) -> u64 {
        route.windows(2).fold(0_u64, |total, leg| match leg {
            [from, to] => total
                .saturating_add(arc_cost(self.matrix, *from, *to))
                .saturating_add(self.lambda.saturating_mul(self.penalty(*from, *to))),
            _ => total,
        })
    }

    /// Compare the utilities `cost / (1 + penalty)` of two arcs exactly.
    fn compare_utility(&self, left: (usize, usize), right: (usize, usize)) -> Ordering {
        let left_cost = u128::from(arc_cost(self.matrix, left.0, left.1));
        let right_cost = u128::from(arc_cost(self.matrix, right.0, right.1));
        let left_weight = u128::from(self.penalty(left.0, left.1)).saturating_add(1);
        let right_weight = u128::from(self.penalty(right.0, right.1)).saturating_add(1);
        left_cost
            .saturating_mul(right_weight)
            .cmp(&right_cost.saturating_mul(left_weight))
    }

    /// Raise the penalty of every arc in `route` that shares the highest
    /// utility.
    fn penalise(&mut self, route: &[usize]) {
        let arcs: Vec<(usize, usize)> = route
            .windows(2)
            .filter_map(|leg| match leg {
                [from, to] => Some((*from, *to)),
                _ => None,
            })
            .collect();
        let Some(top) = arcs
            .iter()
            .copied()
            .max_by(|left, right| self.compare_utility(*left, *right))
        else {
            return;
        };
        let chosen: Vec<(usize, usize)> = arcs
            .into_iter()
            .filter(|arc| self.compare_utility(*arc, top) == Ordering::Equal)
            .collect();
        for (from, to) in chosen {
            self.raise_penalty(from, to);
        }
    }

    /// First-improvement descent on the augmented objective.
    ///
    /// Returns `false` when the deadline interrupted the descent.
    fn descend(&self, route: &mut Vec<usize>, best: &mut Incumbent) -> bool {
        let mut current = self.augmented_cost(route);
        let mut candidate = route.clone();
        'improve: loop {
            for step in neighbourhood(self.stops) {
                if self.expired() {
                    return false;
                }
                candidate.clone_from(route);
                step.apply(&mut candidate);
                let cost = self.augmented_cost(&candidate);
                if cost < current {
                    std::mem::swap(route, &mut candidate);
                    current = cost;
                    best.offer(self.matrix, route);
                    continue 'improve;
                }
            }
            return true;
        }
    }
}

/// Improve a closed `initial` route with guided local search.
///
/// Always returns a closed route over the same stops; when the budget runs
/// out immediately, that is `initial` itself.
pub(crate) fn improve(matrix: &CostMatrix, config: &GlsConfig, initial: Vec<usize>) -> Vec<usize> {
    let started_at = Instant::now();
    let deadline = started_at.checked_add(config.time_limit);
    let mut search = GuidedSearch::new(matrix, deadline);
    let mut best = Incumbent::new(matrix, &initial);
    let mut route = initial;

    if !search.descend(&mut route, &mut best) {
        debug!("guided local search stopped before the first local optimum");
        return best.route;
    }
    search.calibrate(best.cost, config.penalty_factor_percent);

    let mut iterations = 0_usize;
    while iterations < config.max_iterations {
        search.penalise(&route);
        iterations = iterations.saturating_add(1);
        if !search.descend(&mut route, &mut best) {
            break;
        }
    }

    debug!(
        "guided local search ran {iterations} iterations in {:?}; best cost {}",
        started_at.elapsed(),
        best.cost
    );
    best.route
}
