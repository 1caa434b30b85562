// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The highest score a voter may assign to a candidate.
/// Valid scores run from 0 (lowest preference) to this value.
pub const MAX_SCORE: u32 = 3;

/// A score given to one candidate on one ballot.
///
/// A ballot does not have to mention every candidate. A candidate missing
/// from a ballot counts as score 0 for that ballot.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Vote {
    pub candidate_id: String,
    pub score: u32,
}

/// The complete set of scores submitted by one voter.
///
/// The collecting layer keeps at most one ballot per voter: a later
/// submission replaces the earlier one. The engine itself does not enforce
/// this, see the builder API.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub voter_id: String,
    pub votes: Vec<Vote>,
    /// Submission time in milliseconds since the epoch, as recorded by the
    /// collecting layer. Not read by the tally itself.
    pub submitted_at_ms: Option<i64>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub nominator: Option<String>,
}

impl Candidate {
    pub fn new(id: &str, title: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            title: title.to_string(),
            nominator: None,
        }
    }
}

// ******** Output data structures *********

/// Head-to-head outcome for one unordered pair of candidates.
///
/// For every ballot, the pair counts one increment: `a_wins` if the ballot
/// scores A strictly higher than B, `b_wins` for the reverse, `ties`
/// otherwise. The three counts always sum to the total number of ballots.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwiseComparison {
    pub candidate_a: String,
    pub candidate_b: String,
    pub a_wins: u64,
    pub b_wins: u64,
    pub ties: u64,
}

/// Final standing of one candidate.
#[derive(PartialEq, Debug, Clone)]
pub struct Ranking {
    pub candidate_id: String,
    /// 1 is the winner, 2 the runner-up, and so on.
    pub rank: u32,
    pub total_score: u64,
    pub average_score: f64,
    /// Number of other candidates beaten head-to-head.
    pub pairwise_wins: u32,
    /// Number of other candidates this one lost to head-to-head.
    pub pairwise_losses: u32,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TallyResult {
    /// `None` only when no ballots were cast.
    pub winner: Option<String>,
    /// True when the winner beat every other candidate head-to-head.
    pub condorcet_winner: bool,
    /// Sorted by rank, ascending. One entry per candidate.
    pub rankings: Vec<Ranking>,
    /// One entry per unordered pair, in candidate list order.
    pub pairwise_comparisons: Vec<PairwiseComparison>,
    pub total_ballots: u64,
    pub algorithm: String,
}

/// Errors raised by the ingestion layer (builder and strategy lookup).
///
/// The tally computation itself is total and never fails on well-formed
/// input.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyCandidates,
    DuplicateCandidate(String),
    UnknownCandidate(String),
    ScoreOutOfRange { candidate_id: String, score: u32 },
    UnknownAlgorithm(String),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyCandidates => write!(f, "no candidates provided"),
            VotingErrors::DuplicateCandidate(id) => write!(f, "duplicate candidate id {}", id),
            VotingErrors::UnknownCandidate(id) => write!(f, "unknown candidate id {}", id),
            VotingErrors::ScoreOutOfRange { candidate_id, score } => write!(
                f,
                "score {} for candidate {} is outside 0..={}",
                score, candidate_id, MAX_SCORE
            ),
            VotingErrors::UnknownAlgorithm(name) => write!(f, "unknown voting algorithm {}", name),
        }
    }
}
