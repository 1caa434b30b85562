pub use crate::config::*;
use crate::strategy::{default_strategy, strategy_by_name};

/// A builder for collecting ballots ahead of a tally.
///
/// The builder is the validation layer the tally itself does not provide:
/// it rejects scores outside `0..=MAX_SCORE` and votes for unregistered
/// candidates, and it keeps at most one ballot per voter (the latest
/// submission wins).
///
/// ```
/// pub use pairwise_voting::builder::Builder;
/// # use pairwise_voting::{Candidate, VotingErrors};
///
/// let mut builder = Builder::new(&[
///     Candidate::new("film-1", "The Godfather"),
///     Candidate::new("film-2", "Alien"),
/// ])?;
///
/// builder.add_ballot("anna", &[("film-1".to_string(), 3), ("film-2".to_string(), 1)])?;
/// builder.add_ballot("bob", &[("film-2".to_string(), 2)])?;
///
/// let result = builder.tally();
/// assert_eq!(result.winner.as_deref(), Some("film-1"));
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    /// Starts a ballot box for the given candidates.
    ///
    /// The candidate order matters: it is the final tiebreak of the tally.
    pub fn new(candidates: &[Candidate]) -> Result<Builder, VotingErrors> {
        if candidates.is_empty() {
            return Err(VotingErrors::EmptyCandidates);
        }
        for (idx, c) in candidates.iter().enumerate() {
            if candidates[..idx].iter().any(|c2| c2.id == c.id) {
                return Err(VotingErrors::DuplicateCandidate(c.id.clone()));
            }
        }
        Ok(Builder {
            _candidates: candidates.to_vec(),
            _ballots: Vec::new(),
        })
    }

    /// Adds a ballot as a list of (candidate id, score) pairs.
    ///
    /// It is the simplest use case for most cases. Candidates left out of
    /// the list count as score 0.
    pub fn add_ballot(&mut self, voter_id: &str, votes: &[(String, u32)]) -> Result<(), VotingErrors> {
        let mut checked: Vec<Vote> = Vec::new();
        for (candidate_id, score) in votes {
            if !self._candidates.iter().any(|c| c.id == *candidate_id) {
                return Err(VotingErrors::UnknownCandidate(candidate_id.clone()));
            }
            if *score > MAX_SCORE {
                return Err(VotingErrors::ScoreOutOfRange {
                    candidate_id: candidate_id.clone(),
                    score: *score,
                });
            }
            checked.push(Vote {
                candidate_id: candidate_id.clone(),
                score: *score,
            });
        }
        self.add_ballot_2(&Ballot {
            voter_id: voter_id.to_string(),
            votes: checked,
            submitted_at_ms: None,
        })
    }

    /// Adds an already-assembled ballot, replacing any earlier ballot from
    /// the same voter.
    pub fn add_ballot_2(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        for vote in ballot.votes.iter() {
            if !self._candidates.iter().any(|c| c.id == vote.candidate_id) {
                return Err(VotingErrors::UnknownCandidate(vote.candidate_id.clone()));
            }
            if vote.score > MAX_SCORE {
                return Err(VotingErrors::ScoreOutOfRange {
                    candidate_id: vote.candidate_id.clone(),
                    score: vote.score,
                });
            }
        }
        self._ballots.retain(|b| b.voter_id != ballot.voter_id);
        self._ballots.push(ballot.clone());
        Ok(())
    }

    /// Runs the default (Condorcet) tally over the collected ballots.
    pub fn tally(&self) -> TallyResult {
        default_strategy().compute_result(&self._ballots, &self._candidates)
    }

    /// Runs the tally with an explicitly named strategy.
    pub fn tally_with(&self, algorithm: &str) -> Result<TallyResult, VotingErrors> {
        let strategy = strategy_by_name(algorithm)?;
        Ok(strategy.compute_result(&self._ballots, &self._candidates))
    }
}
