//! Tests for the sort-key shuffle.

use concentration_game::shuffle;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_shuffle_keeps_every_element() {
    let mut rng = StdRng::seed_from_u64(7);
    let input: Vec<u32> = (1..=16).collect();

    let mut output = shuffle(input.clone(), &mut rng);
    assert_eq!(output.len(), input.len());

    output.sort_unstable();
    assert_eq!(output, input);
}

#[test]
fn test_shuffle_is_deterministic_for_a_seed() {
    let input: Vec<u32> = (1..=16).collect();
    let a = shuffle(input.clone(), &mut StdRng::seed_from_u64(42));
    let b = shuffle(input, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn test_shuffle_changes_order() {
    let input: Vec<u32> = (1..=16).collect();
    let mut rng = StdRng::seed_from_u64(1);

    // One identity permutation in 16! is possible; ten in a row is not.
    let moved = (0..10).any(|_| shuffle(input.clone(), &mut rng) != input);
    assert!(moved, "shuffle never reordered the input");
}

#[test]
fn test_shuffle_empty_and_single() {
    let mut rng = StdRng::seed_from_u64(3);
    assert!(shuffle(Vec::<u8>::new(), &mut rng).is_empty());
    assert_eq!(shuffle(vec!['x'], &mut rng), vec!['x']);
}

#[test]
fn test_every_position_is_reachable() {
    let mut rng = StdRng::seed_from_u64(99);
    let mut seen_first = [false; 4];

    for _ in 0..200 {
        let out = shuffle(vec![0usize, 1, 2, 3], &mut rng);
        seen_first[out[0]] = true;
    }

    assert!(seen_first.iter().all(|s| *s), "{seen_first:?}");
}
