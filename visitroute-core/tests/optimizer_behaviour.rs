//! Behavioural tests for `RouteOptimizer`.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use visitroute_core::test_support::{
    FailingSolver, FixedTourSolver, StubCostSource, stop, stop_with_latitude,
};
use visitroute_core::{
    CostMatrix, OptimizationFailure, OptimizationResult, RouteOptimizer, RouteSolver, Stop,
    TravelCostMatrixBuilder,
};

struct OptimizerWorld {
    optimizer: RefCell<Option<RouteOptimizer<Box<dyn RouteSolver>>>>,
    source: StubCostSource,
    stops: RefCell<Vec<Stop>>,
    result: RefCell<Option<OptimizationResult>>,
}

impl OptimizerWorld {
    fn new() -> Self {
        Self {
            optimizer: RefCell::new(None),
            source: StubCostSource::with_matrix(CostMatrix::from_fn(3, |_, _| 1)),
            stops: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn install(&self, builder: TravelCostMatrixBuilder, solver: Box<dyn RouteSolver>) {
        *self.optimizer.borrow_mut() = Some(RouteOptimizer::new(builder, solver));
    }

    fn result(&self) -> OptimizationResult {
        self.result.borrow().clone().expect("optimiser was run")
    }
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::new()
}

fn three_stops() -> Vec<Stop> {
    vec![
        stop(1, 4.60971, -74.08175),
        stop(2, 4.65, -74.05),
        stop(3, 4.5, -74.2),
    ]
}

fn ids(stops: &[Stop]) -> Vec<Value> {
    stops.iter().filter_map(|s| s.get("id")).cloned().collect()
}

#[given("an optimizer without a primary cost source")]
fn optimizer_without_primary(#[from(world)] world: &OptimizerWorld) {
    world.install(
        TravelCostMatrixBuilder::new(),
        Box::new(FixedTourSolver::identity()),
    );
}

#[given("an optimizer with a counting primary cost source")]
fn optimizer_with_primary(#[from(world)] world: &OptimizerWorld) {
    world.install(
        TravelCostMatrixBuilder::new().with_primary(world.source.clone()),
        Box::new(FixedTourSolver::identity()),
    );
}

#[given("an optimizer whose solver finds no tour")]
fn optimizer_with_failing_solver(#[from(world)] world: &OptimizerWorld) {
    world.install(TravelCostMatrixBuilder::new(), Box::new(FailingSolver));
}

#[given("no stops")]
fn no_stops(#[from(world)] world: &OptimizerWorld) {
    world.stops.borrow_mut().clear();
}

#[given("a single stop in Bogota")]
fn single_stop(#[from(world)] world: &OptimizerWorld) {
    *world.stops.borrow_mut() = vec![stop(1, 4.60971, -74.08175)];
}

#[given("three stops with distinct coordinates")]
fn distinct_stops(#[from(world)] world: &OptimizerWorld) {
    *world.stops.borrow_mut() = three_stops();
}

#[given("three stops where one latitude is not a number")]
fn stops_with_bad_latitude(#[from(world)] world: &OptimizerWorld) {
    let mut stops = three_stops();
    if let Some(last) = stops.last_mut() {
        *last = stop_with_latitude(3, json!("not-a-number"), -74.2);
    }
    *world.stops.borrow_mut() = stops;
}

#[given("three stops where the second has no latitude")]
fn stops_without_latitude(#[from(world)] world: &OptimizerWorld) {
    let mut stops = three_stops();
    if let Some(second) = stops.get_mut(1) {
        *second = serde_json::from_value(json!({"id": 2, "longitud": -74.05}))
            .expect("stop without latitude");
    }
    *world.stops.borrow_mut() = stops;
}

#[when("I optimise the stops")]
fn run_optimizer(#[from(world)] world: &OptimizerWorld) {
    let optimizer = world.optimizer.borrow();
    let optimizer = optimizer.as_ref().expect("optimizer configured");
    let result = optimizer.optimize(&world.stops.borrow());
    *world.result.borrow_mut() = Some(result);
}

#[then("the result is an empty list")]
fn empty_result(#[from(world)] world: &OptimizerWorld) {
    let result = world.result();
    assert_eq!(result, OptimizationResult::Empty);
    assert_eq!(serde_json::to_value(&result).expect("serialise"), json!([]));
}

#[then("the result is the single stop unchanged")]
fn single_result(#[from(world)] world: &OptimizerWorld) {
    let expected = world.stops.borrow().clone();
    let value = serde_json::to_value(world.result()).expect("serialise");
    assert_eq!(value, serde_json::to_value(&expected).expect("serialise"));
    assert_eq!(
        value,
        json!([{"id": 1, "latitud": 4.60971, "longitud": -74.08175}])
    );
}

#[then("the result is a closed tour over all three stops")]
fn closed_tour(#[from(world)] world: &OptimizerWorld) {
    let result = world.result();
    let stops = result.stops().expect("tour");
    assert_eq!(stops.len(), 4);
    assert_eq!(stops.first(), stops.last());
    let mut visited = ids(stops.get(..3).expect("open tour"));
    visited.sort_by_key(Value::to_string);
    assert_eq!(visited, vec![json!(1), json!(2), json!(3)]);
}

#[then("the result is an invalid coordinate error for stop {index}")]
fn invalid_coordinates(#[from(world)] world: &OptimizerWorld, index: usize) {
    let result = world.result();
    match &result {
        OptimizationResult::Failed(OptimizationFailure::InvalidCoordinates {
            index: reported,
            ..
        }) => assert_eq!(*reported, index),
        other => panic!("expected InvalidCoordinates, found {other:?}"),
    }
    assert_eq!(
        serde_json::to_value(&result).expect("serialise"),
        json!({"error": "invalid coordinate data"})
    );
}

#[then("the primary cost source was not called")]
fn primary_not_called(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(world.source.calls(), 0);
}

#[then("the result is a no feasible solution error")]
fn no_feasible_solution(#[from(world)] world: &OptimizerWorld) {
    assert_eq!(
        world.result(),
        OptimizationResult::Failed(OptimizationFailure::NoFeasibleSolution)
    );
}

macro_rules! register_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/route_optimizer.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: OptimizerWorld) {
            let _ = world;
        }
    };
}

register_scenario!(optimise_no_stops, "optimising no stops");
register_scenario!(optimise_single_stop, "optimising a single stop");
register_scenario!(
    optimise_three_stops,
    "optimising three stops with the fallback estimate"
);
register_scenario!(
    reject_non_numeric_latitude,
    "rejecting a stop with a non-numeric latitude"
);
register_scenario!(
    reject_missing_latitude,
    "rejecting a stop without a latitude"
);
register_scenario!(report_no_tour, "reporting a solver that finds no tour");
