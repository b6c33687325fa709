//! Full-range permutation properties of the shuffle engine.

use rand::RngCore;
use rangeshuffle::{RangeShuffle, ShuffleError};

/// Assert that the engine maps `[0, n)` onto itself exactly once each, and
/// that every output maps back to its position.
fn assert_permutes(n: u64, seed: u64, rounds: u32) {
    let engine = RangeShuffle::new(n, seed, rounds).unwrap();
    let mut seen = vec![false; n as usize];

    for i in 0..n {
        let v = engine.shuffle(i).unwrap();
        assert!(v < n, "shuffle({i}) = {v} escaped the range (n = {n})");
        assert!(
            !seen[v as usize],
            "collision at {v} (n = {n}, seed = {seed:#x}, rounds = {rounds})"
        );
        seen[v as usize] = true;
        assert_eq!(engine.unshuffle(v).unwrap(), i);
    }
}

#[test]
fn tiny_ranges_permute() {
    // Sizes 1 through 8 take the fixed-factor table.
    for n in 1..=8 {
        for seed in [0u64, 1, 0xfeed] {
            for rounds in [1, 3, 4] {
                assert_permutes(n, seed, rounds);
            }
        }
    }
}

#[test]
fn mid_sized_ranges_permute() {
    for n in [9, 10, 15, 16, 100, 1000] {
        assert_permutes(n, 0x00c0_ffee, 4);
    }
}

#[test]
fn large_range_permutes_under_random_seeds() {
    let mut rng = rand::thread_rng();
    for _ in 0..3 {
        assert_permutes(9045, rng.next_u64(), 4);
    }
}

#[test]
fn round_trip_over_whole_range() {
    for seed in [0u64, 1, 0xdead_beef] {
        for rounds in [1, 4, 5] {
            let engine = RangeShuffle::new(1000, seed, rounds).unwrap();
            for i in 0..1000 {
                assert_eq!(engine.unshuffle(engine.shuffle(i).unwrap()).unwrap(), i);
            }
        }
    }
}

#[test]
fn first_positions_round_trip() {
    let engine = RangeShuffle::new(1000, 0, 4).unwrap();
    for i in 0..10 {
        assert_eq!(engine.unshuffle(engine.shuffle(i).unwrap()).unwrap(), i);
    }
}

#[test]
fn known_sequence_is_stable() {
    // Pinned output; a change here means the permutation definition moved
    // and existing resumable enumerations would break.
    let engine = RangeShuffle::new(1000, 0, 4).unwrap();
    let head: Vec<u64> = (0..10).map(|i| engine.shuffle(i).unwrap()).collect();
    assert_eq!(head, [788, 445, 646, 524, 517, 407, 822, 867, 223, 100]);
}

#[test]
fn identical_parameters_give_identical_permutations() {
    let left = RangeShuffle::new(1000, 42, 4).unwrap();
    let right = RangeShuffle::new(1000, 42, 4).unwrap();
    for i in 0..1000 {
        assert_eq!(left.shuffle(i).unwrap(), right.shuffle(i).unwrap());
    }
}

#[test]
fn different_seeds_give_different_permutations() {
    let left = RangeShuffle::new(1000, 0xaaaa, 4).unwrap();
    let right = RangeShuffle::new(1000, 0xbbbb, 4).unwrap();
    let l: Vec<u64> = (0..1000).map(|i| left.shuffle(i).unwrap()).collect();
    let r: Vec<u64> = (0..1000).map(|i| right.shuffle(i).unwrap()).collect();
    assert_ne!(l, r);
}

#[test]
fn out_of_range_indices_are_rejected() {
    let engine = RangeShuffle::new(1000, 0, 4).unwrap();
    for index in [1000, 1001, u64::MAX] {
        assert_eq!(
            engine.shuffle(index).unwrap_err(),
            ShuffleError::OutOfRange {
                index,
                range_size: 1000
            }
        );
        assert_eq!(
            engine.unshuffle(index).unwrap_err(),
            ShuffleError::OutOfRange {
                index,
                range_size: 1000
            }
        );
    }
}

#[test]
fn construction_preconditions() {
    assert_eq!(
        RangeShuffle::new(1000, 0, 0).unwrap_err(),
        ShuffleError::InvalidRounds
    );
    assert_eq!(
        RangeShuffle::new(0, 0, 4).unwrap_err(),
        ShuffleError::InvalidRange
    );
}

#[test]
fn shared_engine_round_trips_from_many_threads() {
    let engine = RangeShuffle::new(10_000, 0x5eed, 4).unwrap();
    std::thread::scope(|scope| {
        for chunk in 0..4u64 {
            let engine = &engine;
            scope.spawn(move || {
                for i in (chunk * 2500)..((chunk + 1) * 2500) {
                    assert_eq!(engine.unshuffle(engine.shuffle(i).unwrap()).unwrap(), i);
                }
            });
        }
    });
}
