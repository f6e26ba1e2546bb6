//! Behaviour-driven step definitions driving the optimize CLI scenarios.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use super::helpers::{StubSolverBuilder, Workspace, bogota_stops, printed_ids};
use super::*;
use crate::optimize::{DefaultRouteSolverBuilder, RouteSolverBuilder, run_optimize_with};

#[derive(Debug)]
struct OptimizeWorld {
    workspace: Workspace,
    stops_path: RefCell<Option<camino::Utf8PathBuf>>,
    cli_args: RefCell<Vec<String>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl OptimizeWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            stops_path: RefCell::new(None),
            cli_args: RefCell::new(Vec::new()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["visitroute".to_owned(), "optimize".to_owned()];
        if let Some(path) = self.stops_path.borrow().as_ref() {
            argv.push(path.as_str().to_owned());
        }
        argv.extend(self.cli_args.borrow().iter().cloned());
        argv
    }

    fn run_with(&self, builder: &dyn RouteSolverBuilder) {
        let parsed = Cli::try_parse_from(self.build_command_line()).map_err(CliError::from);
        let outcome = parsed.and_then(|cli| match cli.command {
            Command::Optimize(args) => {
                let mut buffer = self.stdout.borrow_mut();
                run_optimize_with(args, builder, &mut *buffer)
            }
            Command::Matrix(_) => panic!("expected the optimize command"),
        });
        self.result.replace(Some(outcome));
    }

    fn expect_success(&self) {
        let borrowed = self.result.borrow();
        match borrowed.as_ref().expect("result recorded") {
            Ok(()) => {}
            Err(err) => panic!("expected success, found {err:?}"),
        }
    }
}

#[fixture]
fn optimize_world() -> OptimizeWorld {
    OptimizeWorld::new()
}

#[given("a stops file with three stops in Bogota")]
fn stops_file_in_bogota(#[from(optimize_world)] world: &OptimizeWorld) {
    let path = world.workspace.write_stops("stops.json", &bogota_stops());
    world.stops_path.replace(Some(path));
}

#[given("a stops file where one latitude is not a number")]
fn stops_file_with_bad_latitude(#[from(optimize_world)] world: &OptimizeWorld) {
    let stops = json!([
        {"id": "c-1", "latitud": 4.60971, "longitud": -74.08175},
        {"id": "c-2", "latitud": "norte", "longitud": -74.0628},
        {"id": "c-3", "latitud": 4.6947, "longitud": -74.0309}
    ]);
    let path = world.workspace.write_stops("stops.json", &stops);
    world.stops_path.replace(Some(path));
}

#[given("I omit the stops path")]
fn omit_stops_path(#[from(optimize_world)] world: &OptimizeWorld) {
    world.stops_path.replace(None);
}

#[given("I request the visit list")]
fn request_visit_list(#[from(optimize_world)] world: &OptimizeWorld) {
    world.cli_args.borrow_mut().push("--visit-list".to_owned());
}

#[given("I select the gls solver with a 200 ms budget")]
fn select_gls_solver(#[from(optimize_world)] world: &OptimizeWorld) {
    world.cli_args.borrow_mut().extend([
        "--solver".to_owned(),
        "gls".to_owned(),
        format!("--{ARG_TIME_LIMIT_MS}"),
        "200".to_owned(),
    ]);
}

#[when("I run the optimize command")]
fn run_optimize_command(#[from(optimize_world)] world: &OptimizeWorld) {
    world.run_with(&StubSolverBuilder::Identity);
}

#[when("I run the optimize command with the configured solver")]
fn run_optimize_command_with_solver(#[from(optimize_world)] world: &OptimizeWorld) {
    world.run_with(&DefaultRouteSolverBuilder);
}

#[then("the output is a closed tour over the three stops")]
fn output_is_closed_tour(#[from(optimize_world)] world: &OptimizeWorld) {
    world.expect_success();
    let ids = printed_ids(&world.stdout.borrow());
    assert_eq!(ids.len(), 4);
    assert_eq!(ids.first(), Some(&json!("c-1")));
    assert_eq!(ids.last(), Some(&json!("c-1")));
    let mut visited: Vec<String> = ids
        .iter()
        .take(3)
        .filter_map(|id| id.as_str().map(str::to_owned))
        .collect();
    visited.sort();
    assert_eq!(visited, vec!["c-1", "c-2", "c-3"]);
}

#[then("the output lists each of the three stops once")]
fn output_lists_each_stop_once(#[from(optimize_world)] world: &OptimizeWorld) {
    world.expect_success();
    assert_eq!(
        printed_ids(&world.stdout.borrow()),
        vec![json!("c-1"), json!("c-2"), json!("c-3")]
    );
}

#[then("the output is the error object {message}")]
fn output_is_error_object(#[from(optimize_world)] world: &OptimizeWorld, message: String) {
    world.expect_success();
    let printed: Value =
        serde_json::from_slice(&world.stdout.borrow()).expect("output should be JSON");
    assert_eq!(printed, json!({"error": message.trim_matches('"')}));
}

#[then("the command fails with a missing stops argument")]
fn fails_with_missing_stops(#[from(optimize_world)] world: &OptimizeWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_STOPS),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_optimize_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/optimize_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(optimize_world)] world: OptimizeWorld) {
            let _ = world;
        }
    };
}

register_optimize_scenario!(optimize_happy_path, "optimising stops from a JSON file");
register_optimize_scenario!(optimize_visit_list, "printing the visit list");
register_optimize_scenario!(optimize_invalid_coordinates, "reporting invalid coordinates");
register_optimize_scenario!(optimize_missing_stops, "rejecting a missing stops path");
register_optimize_scenario!(
    optimize_with_gls,
    "optimising with the guided local search solver"
);
