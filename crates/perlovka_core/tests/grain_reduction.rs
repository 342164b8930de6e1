//! End-to-end behaviour of the public API.

use ndarray::{Array2, Array3};
use perlovka_core::channels::{clamp_to_u16, denoise_planes, merge_channels_u16, split_channels};
use perlovka_core::{
    denoise, denoise_array, DenoiseConfig, Grid, MatchMode, ResolveMode, SweepControl,
};

fn bump_config(grid: Grid) -> DenoiseConfig {
    DenoiseConfig {
        radius: 1,
        iterations: 1,
        grid,
        matching: MatchMode::Soft,
        resolver: ResolveMode::Minimal,
        field_matching: false,
    }
}

fn deviation_from_neighbours(plane: &[i32], width: usize, y: usize, x: usize) -> i32 {
    let center = plane[y * width + x];
    let neighbours = [
        plane[(y - 1) * width + x],
        plane[(y + 1) * width + x],
        plane[y * width + x - 1],
        plane[y * width + x + 1],
    ];
    neighbours.iter().map(|&n| (center - n).abs()).max().unwrap_or(0)
}

#[test]
fn single_pixel_grain_is_removed_by_even_grid() {
    let (width, height) = (5, 5);
    let mut plane = vec![100; width * height];
    plane[2 * width + 2] = 103;
    let before = deviation_from_neighbours(&plane, width, 2, 2);

    let stats = denoise(&mut plane, width, height, &bump_config(Grid::Even)).unwrap();

    assert!(stats.resolved >= 1);
    assert_eq!(stats.iterations_made, 1);
    assert!(deviation_from_neighbours(&plane, width, 2, 2) < before);
    assert!(plane.iter().all(|&v| v == 100), "plane: {:?}", plane);
}

#[test]
fn single_pixel_grain_is_found_by_both_grids() {
    let (width, height) = (7, 7);
    let mut plane = vec![100; width * height];
    plane[3 * width + 3] = 103;

    let stats = denoise(&mut plane, width, height, &bump_config(Grid::Both)).unwrap();

    assert_eq!(stats.resolved, 1);
    assert!(plane.iter().all(|&v| v == 100));
}

#[test]
fn two_by_two_grain_is_removed_by_odd_grid() {
    let (width, height) = (6, 6);
    let mut plane = vec![100; width * height];
    for y in 2..4 {
        for x in 2..4 {
            plane[y * width + x] = 103;
        }
    }

    let stats = denoise(&mut plane, width, height, &bump_config(Grid::Odd)).unwrap();

    assert!(stats.resolved >= 1);
    assert!(plane.iter().all(|&v| v == 100), "plane: {:?}", plane);
}

#[test]
fn single_pixel_grain_is_invisible_to_odd_grid() {
    let (width, height) = (5, 5);
    let mut plane = vec![100; width * height];
    plane[2 * width + 2] = 103;
    let original = plane.clone();

    let stats = denoise(&mut plane, width, height, &bump_config(Grid::Odd)).unwrap();

    assert_eq!(stats.resolved, 0);
    assert_eq!(plane, original);
}

#[test]
fn step_edge_is_preserved() {
    // A vertical edge differences into one-signed columns: nothing complements.
    let (width, height) = (16, 12);
    let plane: Vec<i32> = (0..width * height)
        .map(|i| if i % width < width / 2 { 40 } else { 200 })
        .collect();

    for grid in [Grid::Odd, Grid::Even, Grid::Both] {
        for field_matching in [false, true] {
            let mut work = plane.clone();
            let config = DenoiseConfig {
                radius: 3,
                iterations: 5,
                grid,
                matching: MatchMode::Soft,
                resolver: ResolveMode::Maximal,
                field_matching,
            };
            let stats = denoise(&mut work, width, height, &config).unwrap();

            assert_eq!(stats.resolved, 0, "{:?}", config);
            assert_eq!(work, plane, "{:?}", config);
        }
    }
}

#[test]
fn progress_abort_keeps_pixel_space() {
    let (width, height) = (5, 5);
    let mut plane = vec![100; width * height];
    plane[2 * width + 2] = 103;

    let config = DenoiseConfig {
        iterations: 10,
        ..bump_config(Grid::Even)
    };
    let stats =
        perlovka_core::denoise_with_progress(&mut plane, width, height, &config, |report| {
            assert_eq!(report.iteration, 1);
            SweepControl::Abort
        })
        .unwrap();

    assert!(stats.aborted);
    assert_eq!(stats.iterations_made, 1);
    assert!(plane.iter().all(|&v| v == 100));
}

#[test]
fn rgb_image_round_trip_through_channels() {
    let (rows, cols) = (9, 9);
    let mut image = Array3::<u16>::from_elem((rows, cols, 4), 1000);
    // Grain in the green channel only, alpha left alone.
    image[[4, 4, 1]] = 1012;
    image[[0, 0, 3]] = 7;

    let mut planes = split_channels(image.view()).unwrap();
    assert_eq!(planes.len(), 3);

    let stats = denoise_planes(&mut planes, &bump_config(Grid::Even)).unwrap();
    assert_eq!(stats[0].resolved, 0);
    assert_eq!(stats[1].resolved, 1);
    assert_eq!(stats[2].resolved, 0);

    for plane in planes.iter_mut() {
        clamp_to_u16(plane.view_mut());
    }
    let merged = merge_channels_u16(&planes).unwrap();

    assert_eq!(merged.dim(), (rows, cols, 3));
    assert!(merged.iter().all(|&v| v == 1000));
}

#[test]
fn array_and_slice_entry_points_agree() {
    let (rows, cols) = (24, 20);
    let mut state: u64 = 42;
    let original = Array2::from_shape_fn((rows, cols), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        500 + ((state >> 40) % 21) as i32 - 10
    });
    let config = DenoiseConfig {
        radius: 2,
        iterations: 4,
        grid: Grid::Both,
        matching: MatchMode::Strict,
        resolver: ResolveMode::LargestOfMin,
        field_matching: true,
    };

    let mut array = original.clone();
    let array_stats = denoise_array(&mut array, &config).unwrap();

    let mut flat = original.iter().copied().collect::<Vec<_>>();
    let flat_stats = denoise(&mut flat, cols, rows, &config).unwrap();

    assert_eq!(array_stats, flat_stats);
    assert_eq!(array.iter().copied().collect::<Vec<_>>(), flat);
}
