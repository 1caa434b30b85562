// ********* Strategy registry ***********

use crate::config::*;

/// A tally method that turns a snapshot of ballots and candidates into a
/// ranked result.
///
/// There is a single registered implementation for now. Keeping the seam
/// here lets another method (approval, Borda, ...) register under its own
/// name without touching the callers.
pub trait TallyStrategy: Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn compute_result(&self, ballots: &[Ballot], candidates: &[Candidate]) -> TallyResult;
}

/// The pairwise method implemented in this crate.
pub struct CondorcetTally;

impl TallyStrategy for CondorcetTally {
    fn name(&self) -> &'static str {
        crate::CONDORCET
    }

    fn description(&self) -> &'static str {
        "Selects the candidate that would beat every other candidate in \
         head-to-head comparisons. Uses total score as a tiebreaker when no \
         clear winner exists."
    }

    fn compute_result(&self, ballots: &[Ballot], candidates: &[Candidate]) -> TallyResult {
        crate::compute_result(ballots, candidates)
    }
}

static STRATEGIES: [&dyn TallyStrategy; 1] = [&CondorcetTally];

/// Looks up a registered strategy by name, case-insensitively.
pub fn strategy_by_name(name: &str) -> Result<&'static dyn TallyStrategy, VotingErrors> {
    STRATEGIES
        .iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| VotingErrors::UnknownAlgorithm(name.to_string()))
}

/// The strategy used when a round does not name one.
pub fn default_strategy() -> &'static dyn TallyStrategy {
    STRATEGIES[0]
}

/// Names of all registered strategies.
pub fn strategy_names() -> Vec<&'static str> {
    STRATEGIES.iter().map(|s| s.name()).collect()
}
