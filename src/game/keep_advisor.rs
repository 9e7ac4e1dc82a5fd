//! Deterministic keep advice for a target category
//!
//! This is a simple heuristic, not optimal play: it looks only at the current
//! roll and suggests which die positions to hold while chasing one category.
//!
//! Where several faces qualify, the one with the highest count wins and ties
//! go to the higher face. Returned positions are sorted ascending.

use crate::core::{Category, Positions, Roll, DICE_COUNT, FACES};

const SMALL_RUNS: [&[u8]; 3] = [&[1, 2, 3, 4], &[2, 3, 4, 5], &[3, 4, 5, 6]];
const LARGE_RUNS: [&[u8]; 2] = [&[1, 2, 3, 4, 5], &[2, 3, 4, 5, 6]];

fn all_positions() -> Positions {
    (0..DICE_COUNT).collect()
}

/// Face with the highest count, provided that count is at least `min_count`
fn best_face_with_count(roll: &Roll, min_count: u8) -> Option<u8> {
    (1..=FACES)
        .map(|face| (roll.count_of(face), face))
        .filter(|&(count, _)| count >= min_count)
        .max()
        .map(|(_, face)| face)
}

/// Highest face whose count is exactly `count`
fn face_with_exact_count(roll: &Roll, count: u8) -> Option<u8> {
    (1..=FACES).rev().find(|&face| roll.count_of(face) == count)
}

/// Walk down `ladder` and keep the best face meeting the first threshold that
/// any face reaches
fn keep_kind(roll: &Roll, ladder: &[u8]) -> Positions {
    ladder
        .iter()
        .find_map(|&min| best_face_with_count(roll, min))
        .map(|face| roll.positions_of(face))
        .unwrap_or_default()
}

/// Keep the dice that belong to the run sharing the most values with the roll,
/// if that overlap reaches `min_overlap`. Ties go to the lower run.
fn keep_run(roll: &Roll, runs: &[&[u8]], min_overlap: usize) -> Positions {
    let unique = roll.unique_values();
    let mut best: Option<(&[u8], usize)> = None;
    for &run in runs {
        let overlap = run.iter().filter(|v| unique.contains(*v)).count();
        if best.map_or(true, |(_, n)| overlap > n) {
            best = Some((run, overlap));
        }
    }

    match best {
        Some((run, overlap)) if overlap >= min_overlap => roll
            .values()
            .iter()
            .enumerate()
            .filter(|(_, d)| run.contains(*d))
            .map(|(i, _)| i)
            .collect(),
        _ => Positions::new(),
    }
}

/// Die positions worth holding when pursuing `target`
pub fn recommend_keep(roll: &Roll, target: Category) -> Positions {
    if let Some(face) = target.face() {
        return roll.positions_of(face);
    }

    match target {
        Category::ThreeOfAKind => keep_kind(roll, &[3]),
        Category::FourOfAKind => keep_kind(roll, &[4, 3, 2]),
        Category::FullHouse => {
            if roll.is_full_house() {
                return all_positions();
            }
            face_with_exact_count(roll, 3)
                .or_else(|| face_with_exact_count(roll, 2))
                .map(|face| roll.positions_of(face))
                .unwrap_or_default()
        }
        Category::SmallStraight => {
            if roll.is_small_straight() {
                return all_positions();
            }
            keep_run(roll, &SMALL_RUNS, 3)
        }
        Category::LargeStraight => {
            if roll.is_large_straight() {
                return all_positions();
            }
            keep_run(roll, &LARGE_RUNS, 4)
        }
        Category::Yahtzee => keep_kind(roll, &[2]),
        Category::Chance => all_positions(),
        _ => Positions::new(),
    }
}
