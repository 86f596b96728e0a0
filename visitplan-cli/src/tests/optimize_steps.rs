//! Behaviour-driven step definitions driving the optimize CLI scenarios.

use super::helpers::{FixedMatrixSolverBuilder, two_monday_stops, write_request, write_utf8};
use super::*;
use crate::optimize::run_optimize_with;
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;
use visitplan_core::test_support::{stop, vehicle};
use visitplan_core::{
    InfeasibleReason, OptimizeRequest, OptimizeResponse, RequestValidationError, SolveError,
};

#[derive(Debug)]
struct OptimizeWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    output_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    write_to_file: RefCell<bool>,
    rows: RefCell<Vec<Vec<u32>>>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl OptimizeWorld {
    fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        Self {
            request_path: root.join("request.json"),
            output_path: root.join("response.json"),
            _tmp: tmp,
            include_request: RefCell::new(true),
            write_to_file: RefCell::new(false),
            rows: RefCell::new(FixedMatrixSolverBuilder::line().rows),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["visitplan".to_owned(), "optimize".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend([format!("--{ARG_MAX_ITERATIONS}"), "10".to_owned()]);
        if *self.write_to_file.borrow() {
            argv.extend([format!("--{ARG_OUTPUT}"), self.output_path.as_str().to_owned()]);
        }
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> OptimizeWorld {
    OptimizeWorld::new()
}

#[given("a request with two Monday stops exists on disk")]
fn two_stop_request(#[from(world)] world: &OptimizeWorld) {
    write_request(&world.request_path, &two_monday_stops());
}

#[given("I ask for the response to be written to a file")]
fn response_to_file(#[from(world)] world: &OptimizeWorld) {
    *world.write_to_file.borrow_mut() = true;
}

#[given("the request file contains invalid JSON")]
fn invalid_json(#[from(world)] world: &OptimizeWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("a request without vehicles exists on disk")]
fn request_without_vehicles(#[from(world)] world: &OptimizeWorld) {
    let request = OptimizeRequest::new(vec![stop(1, 0, 100)], Vec::new());
    write_request(&world.request_path, &request);
}

#[given("I omit the request path")]
fn omit_request_path(#[from(world)] world: &OptimizeWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("a request whose stop closes before it can be reached exists on disk")]
fn unreachable_request(#[from(world)] world: &OptimizeWorld) {
    let request = OptimizeRequest::new(vec![stop(42, 0, 20)], vec![vehicle("van-1")]);
    write_request(&world.request_path, &request);
    world.rows.replace(vec![vec![0, 30], vec![30, 0]]);
}

#[when("I run the optimize command")]
fn run_optimize_command(#[from(world)] world: &OptimizeWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Optimize(args) => {
            let builder = FixedMatrixSolverBuilder {
                rows: world.rows.borrow().clone(),
            };
            let mut buffer = world.stdout.borrow_mut();
            run_optimize_with(args, &builder, &mut *buffer)
        }
    });
    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints 2 visits")]
fn prints_two_visits(#[from(world)] world: &OptimizeWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    assert!(result.is_ok(), "expected success, got {result:?}");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let response: OptimizeResponse =
        serde_json::from_str(&stdout).expect("output should be a JSON response");
    assert_eq!(response.visit_count(), 2);
}

#[then("the output file holds 2 visits")]
fn output_file_holds_visits(#[from(world)] world: &OptimizeWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    assert!(result.is_ok(), "expected success, got {result:?}");

    let written =
        std::fs::read_to_string(world.output_path.as_std_path()).expect("output file written");
    let response: OptimizeResponse =
        serde_json::from_str(&written).expect("output should be a JSON response");
    assert_eq!(response.visit_count(), 2);
}

#[then("nothing is printed")]
fn nothing_printed(#[from(world)] world: &OptimizeWorld) {
    assert!(world.stdout.borrow().is_empty());
}

#[then("the command fails because the request JSON is invalid")]
fn fails_invalid_json(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::ParseRequest { .. } => {}
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[then("the command fails because the request has no vehicles")]
fn fails_no_vehicles(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::InvalidRequest { source, .. } => {
            assert_eq!(*source, RequestValidationError::NoVehicles);
        }
        other => panic!("expected InvalidRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn fails_missing_request_path(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[then("the command fails because stop 42 is unreachable")]
fn fails_unreachable(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::Solve { source } => assert_eq!(
            *source,
            SolveError::Infeasible(InfeasibleReason::UnreachableStops { stop_ids: vec![42] })
        ),
        other => panic!("expected Solve, found {other:?}"),
    }
}

#[scenario(path = "tests/features/optimize_command.feature", index = 0)]
fn optimize_happy_path(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimize_command.feature", index = 1)]
fn optimize_to_file(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimize_command.feature", index = 2)]
fn optimize_invalid_json(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimize_command.feature", index = 3)]
fn optimize_without_vehicles(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimize_command.feature", index = 4)]
fn optimize_missing_request(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/optimize_command.feature", index = 5)]
fn optimize_unreachable_stop(#[from(world)] world: OptimizeWorld) {
    let _ = world;
}
