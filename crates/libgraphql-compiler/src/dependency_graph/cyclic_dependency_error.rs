use thiserror::Error;

/// A cycle of fragment spreads. `cycle` is normalized to start at its
/// lexicographically smallest member and repeats that member at the end, so
/// `[B, A, B]` and `[A, B, A]` are both reported as `[A, B, A]`.
#[derive(Clone, Debug, Error, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[error("Fragment cycle detected: {}", format_cycle_path(.cycle))]
pub struct CyclicDependencyError {
    cycle: Vec<String>,
}
impl CyclicDependencyError {
    /// Builds the error from a DFS path ending in a repeat of the member at
    /// which the cycle closes, e.g. `[C, A, B, C]`.
    pub(crate) fn from_path(path: &[String]) -> Self {
        Self {
            cycle: normalize_cycle(path),
        }
    }

    pub fn cycle(&self) -> &[String] {
        &self.cycle
    }

    pub fn first_member(&self) -> &str {
        self.cycle.first().map_or("", String::as_str)
    }

    /// Every distinct member of the cycle.
    pub fn members(&self) -> &[String] {
        &self.cycle[..self.cycle.len().saturating_sub(1)]
    }
}

/// Rotates `[.., A, ..., A]`-style cycle paths so that they start with the
/// smallest name.
///
/// ```ignore
/// normalize_cycle(&["B", "C", "A", "B"]) // => ["A", "B", "C", "A"]
/// ```
fn normalize_cycle(cycle: &[String]) -> Vec<String> {
    if cycle.is_empty() {
        return vec![];
    }

    // [A, B, C, A] → [A, B, C]
    let cycle_without_repeat = &cycle[..cycle.len() - 1];
    let min_idx = cycle_without_repeat
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp(b))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let mut normalized = Vec::with_capacity(cycle.len());
    normalized.extend_from_slice(&cycle_without_repeat[min_idx..]);
    normalized.extend_from_slice(&cycle_without_repeat[..min_idx]);
    if let Some(first) = normalized.first().cloned() {
        normalized.push(first);
    }
    normalized
}

fn format_cycle_path(cycle: &[String]) -> String {
    cycle.join(" → ")
}
