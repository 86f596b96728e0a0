//! Behavioural tests for travel-time acquisition with fallback.
//!
//! These tests wrap [`StubTravelTimeProvider`] in a
//! [`FallbackTravelTimeProvider`] to verify behaviour without requiring a
//! running OSRM service.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use visitplan_core::{MatrixError, MatrixSource, TravelTimeMatrix, TravelTimeProvider};
use visitplan_data::routing::FallbackTravelTimeProvider;
use visitplan_data::routing::test_support::StubTravelTimeProvider;

/// Result cell holding the outcome of a travel time request.
type ResultCell = RefCell<Option<Result<TravelTimeMatrix, MatrixError>>>;

/// Provider under test.
type ProviderCell = RefCell<Option<FallbackTravelTimeProvider<StubTravelTimeProvider>>>;

#[fixture]
fn provider() -> ProviderCell {
    RefCell::new(None)
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn sample_locations() -> Vec<Coord<f64>> {
    vec![Coord { x: 10.2039, y: 56.1629 }, Coord { x: 10.25, y: 56.19 }]
}

fn install(provider: &ProviderCell, stub: StubTravelTimeProvider) {
    *provider.borrow_mut() = Some(FallbackTravelTimeProvider::with_great_circle(stub));
}

fn matrix_of(result: &ResultCell) -> TravelTimeMatrix {
    result
        .borrow()
        .clone()
        .expect("a request must have been made")
        .expect("expected Ok result")
}

// --- Given steps ---

#[given("a routing service returning valid durations")]
fn routing_service_ok(#[from(provider)] provider: &ProviderCell) {
    let matrix = TravelTimeMatrix::from_minutes(vec![vec![0, 4], vec![5, 0]], MatrixSource::Remote)
        .expect("square matrix");
    install(provider, StubTravelTimeProvider::with_matrix(matrix));
}

#[given("a routing service that fails with a network error")]
fn routing_service_network_error(#[from(provider)] provider: &ProviderCell) {
    install(
        provider,
        StubTravelTimeProvider::with_error(MatrixError::NetworkError {
            url: "http://example.com/table/v1/driving".to_owned(),
            message: "connection refused".to_owned(),
        }),
    );
}

#[given("a routing service that times out")]
fn routing_service_timeout(#[from(provider)] provider: &ProviderCell) {
    install(
        provider,
        StubTravelTimeProvider::with_error(MatrixError::Timeout {
            url: "http://example.com/table/v1/driving".to_owned(),
            timeout_secs: 30,
        }),
    );
}

#[given("a routing service returning an error response")]
fn routing_service_error(#[from(provider)] provider: &ProviderCell) {
    install(
        provider,
        StubTravelTimeProvider::with_error(MatrixError::ServiceError {
            code: "InvalidQuery".to_owned(),
            message: "Too many coordinates".to_owned(),
        }),
    );
}

#[given("a routing service returning null for unreachable pairs")]
fn routing_service_with_nulls(#[from(provider)] provider: &ProviderCell) {
    install(
        provider,
        StubTravelTimeProvider::with_error(MatrixError::UnroutablePair { from: 0, to: 1 }),
    );
}

// --- When steps ---

#[when("I request travel times for two locations")]
fn request_two(#[from(provider)] provider: &ProviderCell, #[from(result)] result: &ResultCell) {
    let guard = provider.borrow();
    let composed = guard.as_ref().expect("provider must be initialised");
    *result.borrow_mut() = Some(composed.get_travel_time_matrix(&sample_locations()));
}

#[when("I request travel times for no locations")]
fn request_none(#[from(provider)] provider: &ProviderCell, #[from(result)] result: &ResultCell) {
    let guard = provider.borrow();
    let composed = guard.as_ref().expect("provider must be initialised");
    *result.borrow_mut() = Some(composed.get_travel_time_matrix(&[]));
}

// --- Then steps ---

#[then("a 2x2 matrix is returned")]
fn then_matrix(#[from(result)] result: &ResultCell) {
    let matrix = matrix_of(result);
    assert_eq!(matrix.len(), 2, "expected 2 rows");
    assert!(
        matrix.rows().iter().all(|row| row.len() == 2),
        "expected 2 columns"
    );
    assert_eq!(matrix.duration(0, 0), Some(0), "diagonal should be zero");
    assert_eq!(matrix.duration(1, 1), Some(0), "diagonal should be zero");
}

#[then("the matrix came from the routing service")]
fn then_remote(#[from(result)] result: &ResultCell) {
    let matrix = matrix_of(result);
    assert_eq!(matrix.source(), MatrixSource::Remote);
    assert_eq!(matrix.duration(1, 0), Some(5));
}

#[then("the matrix is a symmetric great-circle estimate")]
fn then_fallback(#[from(result)] result: &ResultCell) {
    let matrix = matrix_of(result);
    assert_eq!(matrix.source(), MatrixSource::GreatCircle);
    assert!(matrix.is_symmetric(), "fallback must be symmetric");
    assert!(matrix.has_distances(), "fallback carries distances");
}

#[then("an empty input error is returned")]
fn then_empty_error(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(MatrixError::EmptyInput))),
        "expected EmptyInput error, got {borrowed:?}"
    );
}

#[then("a service error is returned")]
fn then_service_error(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(MatrixError::ServiceError { .. }))),
        "expected ServiceError, got {borrowed:?}"
    );
}

#[then("an unroutable pair error is returned")]
fn then_unroutable(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(MatrixError::UnroutablePair { .. }))),
        "expected UnroutablePair, got {borrowed:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/http_travel_time.feature", name = $title)]
        fn $fn_name(provider: ProviderCell, result: ResultCell) {
            let _ = (provider, result);
        }
    };
}

register_scenario!(
    returning_matrix_for_two_locations,
    "returning a travel time matrix for the depot and one stop"
);
register_scenario!(
    returning_error_for_empty_input,
    "returning an error for empty input"
);
register_scenario!(
    falling_back_when_unreachable,
    "falling back when the service is unreachable"
);
register_scenario!(
    falling_back_on_timeout,
    "falling back when the service times out"
);
register_scenario!(
    surfacing_service_error,
    "surfacing a service error response"
);
register_scenario!(surfacing_unreachable_pairs, "surfacing unreachable pairs");
