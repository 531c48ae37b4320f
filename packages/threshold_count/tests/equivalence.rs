//! Both aggregation strategies must agree with the sequential reference count for every grid,
//! threshold and worker count, including worker counts larger than the number of rows.

use rand::SeedableRng;
use rand::rngs::StdRng;
use threshold_count::{Grid, GridGenerator, Strategy, count_parallel};

fn assert_all_strategies_match(grid: &Grid, threshold: u8, max_workers: usize) {
    let expected = grid.count_above(threshold);

    for workers in 1..=max_workers {
        for &strategy in Strategy::all() {
            let actual = count_parallel(strategy, grid, threshold, workers).unwrap();

            assert_eq!(
                actual, expected,
                "{strategy} with {workers} workers on a {}x{} grid, threshold {threshold}",
                grid.rows(),
                grid.cols()
            );
        }
    }
}

#[test]
fn deterministic_grids_of_many_shapes() {
    for (rows, cols) in [(1, 1), (1, 300), (7, 3), (16, 16), (33, 65)] {
        let grid = GridGenerator::deterministic().generate(rows, cols).unwrap();

        for threshold in [0, 3, 127, 128, 254, 255] {
            assert_all_strategies_match(&grid, threshold, rows + 5);
        }
    }
}

#[test]
fn seeded_random_grids() {
    let mut generator = GridGenerator::random(StdRng::seed_from_u64(0x5eed));

    for _ in 0..4 {
        let grid = generator.generate(24, 40).unwrap();

        assert_all_strategies_match(&grid, 128, 29);
    }
}

#[test]
fn checkerboard_grid() {
    let grid = GridGenerator::checkerboard().generate(50, 50).unwrap();

    // 25 odd rows x 25 odd columns hold 150, everything else holds 100.
    assert_eq!(grid.count_above(128), 625);

    assert_all_strategies_match(&grid, 128, 12);
}

#[test]
fn reference_example_from_four_by_four_grid() {
    let grid = GridGenerator::deterministic().generate(4, 4).unwrap();

    assert_eq!(grid.count_above(3), 6);

    for &strategy in Strategy::all() {
        assert_eq!(count_parallel(strategy, &grid, 3, 2).unwrap(), 6);
    }
}

#[test]
fn two_rows_five_workers() {
    let grid = GridGenerator::deterministic().generate(2, 10).unwrap();
    let expected = grid.count_above(5);

    for &strategy in Strategy::all() {
        assert_eq!(count_parallel(strategy, &grid, 5, 5).unwrap(), expected);
    }
}

#[test]
fn large_grid_count_does_not_depend_on_thread_count() {
    let grid = GridGenerator::deterministic().generate(1000, 1000).unwrap();
    let expected = grid.count_above(128);

    for workers in [1, 2, 3, 8, 30] {
        for &strategy in Strategy::all() {
            assert_eq!(
                count_parallel(strategy, &grid, 128, workers).unwrap(),
                expected
            );
        }
    }
}
