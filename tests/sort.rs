#![cfg(not(feature = "loom"))]

mod common;

use common::{executors, lcg, parallel};
use fjk::{Error, config::Grain, kernels::parallel_sort};
use proptest::prelude::*;

fn sorted_copy<T: Ord + Clone>(data: &[T]) -> Vec<T> {
    let mut copy = data.to_vec();
    copy.sort_unstable();
    copy
}

#[test]
fn sorts_random_input_across_grains() {
    let data: Vec<u64> = lcg(11, 200_000, 25_000).into_iter().map(|v| v + 1).collect();
    let expected = sorted_copy(&data);
    for executor in executors() {
        for grain in [1, 8, data.len() / 2] {
            let mut buffer = data.clone();
            parallel_sort(&executor, &mut buffer, 0, data.len(), Grain::new(grain)).unwrap();
            assert_eq!(buffer, expected, "grain {grain}");
        }
    }
}

#[test]
fn sorted_input_is_left_unchanged() {
    // Last-element pivot: sorted input recurses once per element.
    let data: Vec<i32> = (0..1500).collect();
    for executor in executors() {
        for grain in [1, 64] {
            let mut buffer = data.clone();
            parallel_sort(&executor, &mut buffer, 0, data.len(), Grain::new(grain)).unwrap();
            assert_eq!(buffer, data);
        }
    }
}

#[test]
fn reverse_sorted_and_constant_input() {
    let executor = parallel(4);
    let mut reversed: Vec<i32> = (0..1000).rev().collect();
    parallel_sort(&executor, &mut reversed, 0, 1000, Grain::ONE).unwrap();
    assert_eq!(reversed, (0..1000).collect::<Vec<_>>());

    let mut constant = vec![7_u8; 1000];
    parallel_sort(&executor, &mut constant, 0, 1000, Grain::ONE).unwrap();
    assert!(constant.iter().all(|&v| v == 7));
}

#[test]
fn empty_and_single_element_ranges_are_no_ops() {
    let executor = parallel(2);
    let mut empty: Vec<i32> = Vec::new();
    parallel_sort(&executor, &mut empty, 0, 0, Grain::ONE).unwrap();
    let mut single = vec![42];
    parallel_sort(&executor, &mut single, 0, 1, Grain::ONE).unwrap();
    assert_eq!(single, [42]);
    let mut data = vec![3, 2, 1];
    parallel_sort(&executor, &mut data, 1, 1, Grain::ONE).unwrap();
    assert_eq!(data, [3, 2, 1]);
}

#[test]
fn sorts_only_the_requested_range() {
    let executor = parallel(4);
    let mut data = vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0];
    parallel_sort(&executor, &mut data, 2, 8, Grain::ONE).unwrap();
    assert_eq!(data, [9, 8, 2, 3, 4, 5, 6, 7, 1, 0]);
}

#[test]
fn invalid_range_leaves_the_buffer_alone() {
    let executor = parallel(2);
    let mut data = vec![3, 1, 2];
    assert_eq!(
        parallel_sort(&executor, &mut data, 0, 5, Grain::ONE),
        Err(Error::InvalidRange {
            begin: 0,
            end: 5,
            len: 3
        })
    );
    assert_eq!(data, [3, 1, 2]);
}

#[test]
fn sorts_floats() {
    let executor = parallel(4);
    let mut data: Vec<f64> = lcg(5, 5000, 10_000)
        .into_iter()
        .map(|v| v as f64 / 7.0 - 500.0)
        .collect();
    let len = data.len();
    parallel_sort(&executor, &mut data, 0, len, Grain::new(8)).unwrap();
    assert!(data.windows(2).all(|pair| pair[0] <= pair[1]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn matches_a_serial_sort(
        data in prop::collection::vec(-1000i32..1000, 0..2000),
        grain in 1usize..64,
    ) {
        let executor = parallel(4);
        let expected = sorted_copy(&data);
        let mut buffer = data;
        let len = buffer.len();
        parallel_sort(&executor, &mut buffer, 0, len, Grain::new(grain)).unwrap();
        prop_assert_eq!(buffer, expected);
    }
}
