use pairwise_voting::builder::Builder;
use pairwise_voting::{
    default_strategy, strategy_by_name, strategy_names, Ballot, Candidate, Vote, VotingErrors,
    CONDORCET,
};

fn candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("film-1", "The Godfather"),
        Candidate::new("film-2", "Alien"),
        Candidate::new("film-3", "Paddington 2"),
    ]
}

fn votes(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs.iter().map(|(id, s)| (id.to_string(), *s)).collect()
}

#[test]
fn builder_requires_candidates() {
    assert_eq!(Builder::new(&[]).err(), Some(VotingErrors::EmptyCandidates));
}

#[test]
fn builder_rejects_duplicate_candidate_ids() {
    let cands = vec![
        Candidate::new("film-1", "The Godfather"),
        Candidate::new("film-1", "The Godfather Part II"),
    ];
    assert_eq!(
        Builder::new(&cands).err(),
        Some(VotingErrors::DuplicateCandidate("film-1".to_string()))
    );
}

#[test]
fn builder_rejects_out_of_range_scores() {
    let mut builder = Builder::new(&candidates()).unwrap();
    let res = builder.add_ballot("anna", &votes(&[("film-1", 4)]));
    assert_eq!(
        res.err(),
        Some(VotingErrors::ScoreOutOfRange {
            candidate_id: "film-1".to_string(),
            score: 4,
        })
    );
}

#[test]
fn builder_rejects_unknown_candidates() {
    let mut builder = Builder::new(&candidates()).unwrap();
    let res = builder.add_ballot("anna", &votes(&[("film-9", 2)]));
    assert_eq!(
        res.err(),
        Some(VotingErrors::UnknownCandidate("film-9".to_string()))
    );
}

#[test]
fn later_ballot_replaces_earlier_one() {
    let mut builder = Builder::new(&candidates()).unwrap();
    builder
        .add_ballot("anna", &votes(&[("film-1", 3), ("film-2", 0)]))
        .unwrap();
    // Anna changes her mind.
    builder
        .add_ballot("anna", &votes(&[("film-1", 0), ("film-2", 3)]))
        .unwrap();

    let result = builder.tally();
    assert_eq!(result.total_ballots, 1);
    assert_eq!(result.winner.as_deref(), Some("film-2"));
    assert!(result.condorcet_winner);
}

#[test]
fn assembled_ballots_are_validated_too() {
    let mut builder = Builder::new(&candidates()).unwrap();
    let res = builder.add_ballot_2(&Ballot {
        voter_id: "bob".to_string(),
        votes: vec![Vote {
            candidate_id: "film-2".to_string(),
            score: 17,
        }],
        submitted_at_ms: Some(1_714_850_000_000),
    });
    assert_eq!(
        res.err(),
        Some(VotingErrors::ScoreOutOfRange {
            candidate_id: "film-2".to_string(),
            score: 17,
        })
    );
}

#[test]
fn tally_with_resolves_names_case_insensitively() {
    let mut builder = Builder::new(&candidates()).unwrap();
    builder
        .add_ballot("anna", &votes(&[("film-3", 3), ("film-1", 1)]))
        .unwrap();

    let result = builder.tally_with("CONDORCET").unwrap();
    assert_eq!(result.algorithm, CONDORCET);
    assert_eq!(result.winner.as_deref(), Some("film-3"));
}

#[test]
fn unknown_algorithm_is_an_error() {
    let builder = Builder::new(&candidates()).unwrap();
    assert_eq!(
        builder.tally_with("instant-runoff").err(),
        Some(VotingErrors::UnknownAlgorithm("instant-runoff".to_string()))
    );
}

#[test]
fn registry_lists_the_default_strategy() {
    assert_eq!(strategy_names(), vec![CONDORCET]);
    assert_eq!(default_strategy().name(), CONDORCET);
    assert!(!default_strategy().description().is_empty());
    assert_eq!(strategy_by_name("condorcet").unwrap().name(), CONDORCET);
}
