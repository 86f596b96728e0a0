//! Unit tests for benchmark helper functions.
//!
//! These tests verify that `generate_clustered_stops`,
//! `build_benchmark_request` and `generate_travel_time_matrix` produce
//! correct, deterministic outputs.

use rstest::rstest;

/// Include the benchmark support module from the benches directory.
/// The `dead_code` suppression is scoped to this module declaration because
/// not every helper is used in this file.
#[expect(dead_code, reason = "bench_support exports items not all used here")]
#[path = "../benches/bench_support.rs"]
mod bench_support;

use bench_support::{
    BENCHMARK_SEED, build_benchmark_request, generate_clustered_stops,
    generate_travel_time_matrix,
};

#[rstest]
#[case(0)]
#[case(1)]
#[case(10)]
#[case(100)]
fn generate_clustered_stops_handles_various_sizes(#[case] count: usize) {
    let stops = generate_clustered_stops(count, BENCHMARK_SEED);
    assert_eq!(stops.len(), count);
}

#[rstest]
fn generate_clustered_stops_is_deterministic() {
    let first = generate_clustered_stops(20, BENCHMARK_SEED);
    let second = generate_clustered_stops(20, BENCHMARK_SEED);
    assert_eq!(first, second);
}

#[rstest]
fn generate_clustered_stops_assigns_sequential_ids() {
    let stops = generate_clustered_stops(10, BENCHMARK_SEED);
    let ids: Vec<u64> = stops.iter().map(|stop| stop.id).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
}

#[rstest]
fn generate_clustered_stops_alternates_monday_and_tuesday() {
    let stops = generate_clustered_stops(6, BENCHMARK_SEED);
    let windows: Vec<(u32, u32)> = stops.iter().map(|stop| (stop.tw_start, stop.tw_end)).collect();
    assert_eq!(
        windows,
        vec![
            (480, 1020),
            (1920, 2300),
            (480, 1020),
            (1920, 2300),
            (480, 1020),
            (1920, 2300),
        ]
    );
    assert!(stops.iter().all(|stop| (10..=30).contains(&stop.service_minutes)));
}

#[rstest]
#[expect(
    clippy::float_cmp,
    reason = "Test checks float inequality for different seeds"
)]
fn generate_clustered_stops_different_seeds_produce_different_results() {
    let first = generate_clustered_stops(10, 42);
    let second = generate_clustered_stops(10, 43);

    let any_different = first
        .iter()
        .zip(second.iter())
        .any(|(a, b)| a.lat != b.lat || a.lon != b.lon);

    assert!(
        any_different,
        "Different seeds should produce different stop distributions"
    );
}

#[rstest]
#[case(1, 2)]
#[case(8, 2)]
#[case(9, 3)]
#[case(25, 5)]
fn build_benchmark_request_sizes_the_fleet(#[case] count: usize, #[case] vehicles: usize) {
    let request = build_benchmark_request(count, BENCHMARK_SEED);
    assert_eq!(request.stops.len(), count);
    assert_eq!(request.vehicles.len(), vehicles);
    assert!(request.validate().is_ok());
}

#[rstest]
fn generate_travel_time_matrix_covers_depot_and_stops() {
    let request = build_benchmark_request(5, BENCHMARK_SEED);
    let matrix = generate_travel_time_matrix(&request, BENCHMARK_SEED);

    assert_eq!(matrix.len(), 6);
    for (i, row) in matrix.iter().enumerate() {
        assert_eq!(row.len(), 6);
        for (j, minutes) in row.iter().enumerate() {
            if i == j {
                assert_eq!(*minutes, 0, "diagonal at {i}");
            } else {
                assert!(*minutes >= 1, "travel {i}->{j} should take time");
            }
        }
    }
}

#[rstest]
fn generate_travel_time_matrix_is_deterministic() {
    let request = build_benchmark_request(8, BENCHMARK_SEED);
    assert_eq!(
        generate_travel_time_matrix(&request, BENCHMARK_SEED),
        generate_travel_time_matrix(&request, BENCHMARK_SEED)
    );
}
