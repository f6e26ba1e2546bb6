//! Initial tour construction.

use visitroute_core::{CostMatrix, DEPOT, UNREACHABLE_COST};

/// Cost of the arc `from -> to`, treating out-of-range indices as
/// unreachable.
pub(crate) fn arc_cost(matrix: &CostMatrix, from: usize, to: usize) -> u64 {
    matrix.get(from, to).unwrap_or(UNREACHABLE_COST)
}

/// Walk from the depot, always taking the cheapest arc to an unvisited stop.
///
/// Ties go to the lowest stop index. The returned route is closed: it starts
/// and ends at the depot.
pub(crate) fn path_cheapest_arc(matrix: &CostMatrix) -> Vec<usize> {
    let mut remaining: Vec<usize> = (0..matrix.len()).filter(|&stop| stop != DEPOT).collect();
    let mut route = Vec::with_capacity(matrix.len().saturating_add(1));
    route.push(DEPOT);

    let mut current = DEPOT;
    while let Some(position) = remaining
        .iter()
        .enumerate()
        .min_by_key(|&(_, &next)| (arc_cost(matrix, current, next), next))
        .map(|(position, _)| position)
    {
        current = remaining.remove(position);
        route.push(current);
    }

    route.push(DEPOT);
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn follows_the_cheapest_outgoing_arc() {
        let matrix = CostMatrix::from_rows(vec![
            vec![0, 9, 2, 7],
            vec![3, 0, 8, 1],
            vec![6, 4, 0, 9],
            vec![5, 2, 6, 0],
        ])
        .expect("valid matrix");

        assert_eq!(path_cheapest_arc(&matrix), vec![0, 2, 1, 3, 0]);
    }

    #[rstest]
    fn breaks_ties_by_lowest_index() {
        let matrix = CostMatrix::from_fn(4, |_, _| 5);
        assert_eq!(path_cheapest_arc(&matrix), vec![0, 1, 2, 3, 0]);
    }

    #[rstest]
    fn two_stops_go_out_and_back() {
        let matrix = CostMatrix::from_fn(2, |_, _| 3);
        assert_eq!(path_cheapest_arc(&matrix), vec![0, 1, 0]);
    }
}
