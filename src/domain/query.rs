//! Derived statistics and lookups over a family tree.

use serde::Serialize;

use crate::domain::document::{TreeDocument, Wealth};
use crate::domain::mutator::MemberRef;

/// Height of the tree; a lone root is one generation.
pub fn count_generations(root: &TreeDocument) -> usize {
    1 + root
        .children
        .iter()
        .map(count_generations)
        .max()
        .unwrap_or(0)
}

/// Number of members, root included.
pub fn count_members(root: &TreeDocument) -> usize {
    root.iter().count()
}

/// Mean wealth over all members.
pub fn average_wealth(root: &TreeDocument) -> f64 {
    let (sum, count) = root
        .iter()
        .fold((0u64, 0u64), |(sum, count), m| {
            (sum + u64::from(m.attributes.wealth.get()), count + 1)
        });
    // a tree always has its root
    sum as f64 / count as f64
}

/// Figures shown in the statistics panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FamilyStats {
    pub members: usize,
    pub generations: usize,
    pub average_wealth: f64,
}

pub fn family_stats(root: &TreeDocument) -> FamilyStats {
    FamilyStats {
        members: count_members(root),
        generations: count_generations(root),
        average_wealth: average_wealth(root),
    }
}

/// First member matching `target` in pre-order.
pub fn find<'a>(root: &'a TreeDocument, target: &MemberRef) -> Option<&'a TreeDocument> {
    root.iter().find(|m| target.matches(m))
}

/// Members whose name contains `query`, case-insensitive, in pre-order.
pub fn search<'a>(root: &'a TreeDocument, query: &str) -> Vec<&'a TreeDocument> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    root.iter()
        .filter(|m| m.name.to_lowercase().contains(&needle))
        .collect()
}

/// Label such as "2nd Generation".
///
/// Only ranks 1 to 3 get their own suffix; all others use "th".
pub fn generation_label(rank: u32) -> String {
    let suffix = match rank {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{}{} Generation", rank, suffix)
}

/// One `$` per wealth level.
pub fn wealth_indicator(wealth: Wealth) -> String {
    "$".repeat(usize::from(wealth.get()))
}
