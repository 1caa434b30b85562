mod config;
mod strategy;
pub mod builder;

use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;
pub use crate::strategy::*;

/// Name of the pairwise tally method implemented by this crate.
pub const CONDORCET: &str = "Condorcet";

// **** Private structures ****

// Position of a candidate in the input candidate list.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
struct CandidateId(u32);

// Scores of one ballot, keyed by candidate. A candidate absent from the map
// scored zero on that ballot.
type ScoreCard = HashMap<CandidateId, u32>;

fn score_of(card: &ScoreCard, cid: CandidateId) -> u32 {
    card.get(&cid).copied().unwrap_or(0)
}

// Resolves the ballots against the candidate list. Votes that reference a
// candidate outside the list are dropped: they cannot influence any pairwise
// comparison between listed candidates. If a ballot scores the same
// candidate twice, the first vote counts.
fn score_cards(ballots: &[Ballot], candidates: &[Candidate]) -> Vec<ScoreCard> {
    let ids_by_name: HashMap<&str, CandidateId> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| (c.id.as_str(), CandidateId(idx as u32)))
        .collect();
    ballots
        .iter()
        .map(|ballot| {
            let mut card: ScoreCard = HashMap::new();
            for vote in ballot.votes.iter() {
                if let Some(cid) = ids_by_name.get(vote.candidate_id.as_str()) {
                    card.entry(*cid).or_insert(vote.score);
                } else {
                    debug!(
                        "score_cards: voter {}: dropping vote for unlisted candidate {}",
                        ballot.voter_id, vote.candidate_id
                    );
                }
            }
            card
        })
        .collect()
}

fn empty_result(total_ballots: u64) -> TallyResult {
    TallyResult {
        winner: None,
        condorcet_winner: false,
        rankings: Vec::new(),
        pairwise_comparisons: Vec::new(),
        total_ballots,
        algorithm: CONDORCET.to_string(),
    }
}

/// Runs the pairwise (Condorcet) tally over a snapshot of ballots and
/// candidates.
///
/// The computation is total: any combination of well-typed ballots and
/// candidates produces a result. Scores are not range-checked here, votes
/// for candidates outside `candidates` are ignored, and a ballot scoring
/// the same candidate twice counts its first vote; validating submissions
/// is the collecting layer's job (see [builder::Builder]).
///
/// Candidates tied on both pairwise wins and total score keep their relative
/// order from `candidates`, so identical input ordering reproduces identical
/// output.
pub fn compute_result(ballots: &[Ballot], candidates: &[Candidate]) -> TallyResult {
    info!(
        "compute_result: processing {:?} ballots over {:?} candidates",
        ballots.len(),
        candidates.len()
    );

    // No ballots: nothing can be ranked and there is no winner.
    if ballots.is_empty() {
        return empty_result(0);
    }

    let total_ballots = ballots.len() as u64;

    // No candidates with a nonzero ballot count is a degenerate snapshot the
    // caller should have rejected. Still answer with the empty shape, keeping
    // the real ballot count.
    if candidates.is_empty() {
        debug!("compute_result: no candidates in snapshot");
        return empty_result(total_ballots);
    }

    let cards = score_cards(ballots, candidates);

    // Only one candidate. It wins trivially, with no pairwise comparison to
    // run.
    if let [single] = candidates {
        debug!("compute_result: single candidate {:?} wins", single.id);
        let total_score: u64 = cards
            .iter()
            .map(|card| score_of(card, CandidateId(0)) as u64)
            .sum();
        return TallyResult {
            winner: Some(single.id.clone()),
            condorcet_winner: true,
            rankings: vec![Ranking {
                candidate_id: single.id.clone(),
                rank: 1,
                total_score,
                average_score: total_score as f64 / total_ballots as f64,
                pairwise_wins: 0,
                pairwise_losses: 0,
            }],
            pairwise_comparisons: Vec::new(),
            total_ballots,
            algorithm: CONDORCET.to_string(),
        };
    }

    let num_candidates = candidates.len();

    // Head-to-head pass, one entry per unordered pair in candidate list
    // order. A pair goes to the side preferred on strictly more ballots; an
    // exact split awards neither a win nor a loss.
    let mut comparisons: Vec<PairwiseComparison> = Vec::new();
    let mut wins: Vec<u32> = vec![0; num_candidates];
    let mut losses: Vec<u32> = vec![0; num_candidates];
    for i in 0..num_candidates {
        for j in (i + 1)..num_candidates {
            let mut a_wins: u64 = 0;
            let mut b_wins: u64 = 0;
            let mut ties: u64 = 0;
            for card in cards.iter() {
                let score_a = score_of(card, CandidateId(i as u32));
                let score_b = score_of(card, CandidateId(j as u32));
                if score_a > score_b {
                    a_wins += 1;
                } else if score_b > score_a {
                    b_wins += 1;
                } else {
                    ties += 1;
                }
            }
            if a_wins > b_wins {
                wins[i] += 1;
                losses[j] += 1;
            } else if b_wins > a_wins {
                wins[j] += 1;
                losses[i] += 1;
            }
            debug!(
                "compute_result: pair {:?} / {:?}: {:?} - {:?} - {:?}",
                candidates[i].id, candidates[j].id, a_wins, b_wins, ties
            );
            comparisons.push(PairwiseComparison {
                candidate_a: candidates[i].id.clone(),
                candidate_b: candidates[j].id.clone(),
                a_wins,
                b_wins,
                ties,
            });
        }
    }

    let mut rankings: Vec<Ranking> = candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let total_score: u64 = cards
                .iter()
                .map(|card| score_of(card, CandidateId(idx as u32)) as u64)
                .sum();
            Ranking {
                candidate_id: c.id.clone(),
                rank: 0,
                total_score,
                average_score: total_score as f64 / total_ballots as f64,
                pairwise_wins: wins[idx],
                pairwise_losses: losses[idx],
            }
        })
        .collect();

    // Most pairwise wins first, total score as the tiebreak. The sort is
    // stable: candidates tied on both keys keep the input candidate order.
    rankings.sort_by(|a, b| {
        b.pairwise_wins
            .cmp(&a.pairwise_wins)
            .then(b.total_score.cmp(&a.total_score))
    });
    for (idx, r) in rankings.iter_mut().enumerate() {
        r.rank = idx as u32 + 1;
    }

    let top = &rankings[0];
    let winner = top.candidate_id.clone();
    // A Condorcet winner must beat every other candidate head-to-head. A
    // cycle or an unresolved head-to-head tie at the top leaves the flag
    // unset even though a winner is still declared.
    let condorcet_winner = top.pairwise_wins as usize == num_candidates - 1;
    info!(
        "compute_result: winner {:?} condorcet: {:?}",
        winner, condorcet_winner
    );

    TallyResult {
        winner: Some(winner),
        condorcet_winner,
        rankings,
        pairwise_comparisons: comparisons,
        total_ballots,
        algorithm: CONDORCET.to_string(),
    }
}
