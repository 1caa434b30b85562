use log::{debug, info, warn};

use pairwise_voting::builder::Builder;
use pairwise_voting::{strategy_by_name, Ballot, Candidate, TallyResult, Vote};
use snafu::{prelude::*, Snafu};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

pub mod io_scores;

#[derive(Debug, Snafu)]
pub enum RoundError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Missing worksheet in {path}"))]
    MissingWorksheet { path: String },
    #[snafu(display(""))]
    OpeningJson { source: std::io::Error },
    #[snafu(display(""))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display(""))]
    WritingSummary { source: std::io::Error },
    #[snafu(display(""))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RoundResult<T> = Result<T, RoundError>;

// ******** Round description (JSON) *********

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundCandidate {
    pub id: String,
    pub title: String,
    #[serde(rename = "nominatedBy")]
    pub nominated_by: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotFileSource {
    /// One of `json` or `scores_xlsx`.
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundRules {
    pub algorithm: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    #[serde(rename = "roundName")]
    pub round_name: String,
    pub candidates: Vec<RoundCandidate>,
    #[serde(rename = "ballotFileSources")]
    pub ballot_file_sources: Vec<BallotFileSource>,
    pub rules: Option<RoundRules>,
}

// ******** Ballot files *********

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsonVote {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: u32,
}

/// A ballot as stored by the collecting service.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct JsonBallot {
    #[serde(rename = "visitorId")]
    pub visitor_id: String,
    pub votes: Vec<JsonVote>,
    /// Milliseconds since the epoch. Used to pick the latest submission when
    /// a voter appears more than once.
    #[serde(rename = "submittedAtMs")]
    pub submitted_at_ms: Option<i64>,
}

// A ballot read from any source, before validation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub voter_id: String,
    pub scores: Vec<(String, u32)>,
    pub submitted_at_ms: Option<i64>,
}

fn read_json_ballots(path: String) -> RoundResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    let records: Vec<JsonBallot> = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(records
        .iter()
        .map(|r| ParsedBallot {
            voter_id: r.visitor_id.clone(),
            scores: r
                .votes
                .iter()
                .map(|v| (v.candidate_id.clone(), v.score))
                .collect(),
            submitted_at_ms: r.submitted_at_ms,
        })
        .collect())
}

fn read_ballot_data(root_path: String, source: &BallotFileSource) -> RoundResult<Vec<ParsedBallot>> {
    let p: PathBuf = [root_path, source.file_path.clone()].iter().collect();
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match source.provider.as_str() {
        "json" => read_json_ballots(p2),
        "scores_xlsx" => io_scores::read_excel_scores(p2, source),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

// ******** Tabulation *********

/// Validates the parsed ballots and runs the named tally over them.
///
/// Votes for candidates outside the round are skipped with a warning, the
/// way the collecting service ignores stale nominations. Out-of-range scores
/// fail the round: the stored data is corrupt at that point.
pub fn tally_parsed(
    candidates: &[RoundCandidate],
    parsed: &[ParsedBallot],
    algorithm: &str,
) -> RoundResult<TallyResult> {
    let cands: Vec<Candidate> = candidates
        .iter()
        .map(|c| Candidate {
            id: c.id.clone(),
            title: c.title.clone(),
            nominator: c.nominated_by.clone(),
        })
        .collect();
    let mut builder = match Builder::new(&cands) {
        Ok(b) => b,
        Err(e) => whatever!("Invalid candidate list: {}", e),
    };
    let known: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();

    // Later submissions must replace earlier ones. The builder keeps the
    // last ballot it sees per voter, so feed it in submission order; ballots
    // without a timestamp keep their file order, first.
    let mut sorted: Vec<ParsedBallot> = parsed.to_vec();
    sorted.sort_by_key(|b| b.submitted_at_ms.unwrap_or(i64::MIN));

    for pb in sorted.iter() {
        let mut votes: Vec<Vote> = Vec::new();
        for (candidate_id, score) in pb.scores.iter() {
            if known.contains(candidate_id.as_str()) {
                votes.push(Vote {
                    candidate_id: candidate_id.clone(),
                    score: *score,
                });
            } else {
                warn!(
                    "tally_parsed: voter {}: skipping vote for unknown candidate {}",
                    pb.voter_id, candidate_id
                );
            }
        }
        let ballot = Ballot {
            voter_id: pb.voter_id.clone(),
            votes,
            submitted_at_ms: pb.submitted_at_ms,
        };
        if let Err(e) = builder.add_ballot_2(&ballot) {
            whatever!("Invalid ballot from voter {}: {}", pb.voter_id, e);
        }
    }

    match builder.tally_with(algorithm) {
        Ok(result) => Ok(result),
        Err(e) => whatever!("Voting error: {}", e),
    }
}

// ******** Summary output *********

// The summary is denormalized: film titles and nominators are embedded so a
// history page can render it without joining back to the film list.
fn build_summary_js(config: &RoundConfig, result: &TallyResult) -> JSValue {
    let infos: HashMap<&str, &RoundCandidate> = config
        .candidates
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect();
    let title_of = |id: &str| {
        infos
            .get(id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "Unknown Film".to_string())
    };

    let winner = match &result.winner {
        Some(id) => json!({
            "filmId": id,
            "title": title_of(id),
            "nominatedBy": infos.get(id.as_str()).and_then(|c| c.nominated_by.clone()),
        }),
        None => JSValue::Null,
    };

    let rankings: Vec<JSValue> = result
        .rankings
        .iter()
        .map(|r| {
            json!({
                "filmId": r.candidate_id,
                "title": title_of(&r.candidate_id),
                "nominatedBy": infos.get(r.candidate_id.as_str()).and_then(|c| c.nominated_by.clone()),
                "rank": r.rank,
                "totalScore": r.total_score,
                "averageScore": r.average_score,
                "pairwiseWins": r.pairwise_wins,
                "pairwiseLosses": r.pairwise_losses,
            })
        })
        .collect();

    let comparisons: Vec<JSValue> = result
        .pairwise_comparisons
        .iter()
        .map(|c| {
            json!({
                "filmA": c.candidate_a,
                "filmB": c.candidate_b,
                "filmAWins": c.a_wins,
                "filmBWins": c.b_wins,
                "ties": c.ties,
            })
        })
        .collect();

    json!({
        "roundName": config.round_name,
        "algorithm": result.algorithm,
        "totalBallots": result.total_ballots,
        "winner": winner,
        "condorcetWinner": result.condorcet_winner,
        "rankings": rankings,
        "pairwiseComparisons": comparisons,
    })
}

fn read_summary(path: String) -> RoundResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {})?;
    debug!("read content: {:?}", contents);
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Tabulates a voting round end to end: reads the round description, loads
/// and validates the ballots, runs the tally and writes the JSON summary.
pub fn run_round(
    config_path: String,
    out_path: Option<String>,
    check_summary_path: Option<String>,
) -> RoundResult<()> {
    let config_p = Path::new(config_path.as_str());
    let config_str = fs::read_to_string(config_path.clone()).context(OpeningJsonSnafu {})?;
    let config: RoundConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);

    // Resolve the strategy before touching any ballot file.
    let algorithm = config
        .rules
        .clone()
        .and_then(|r| r.algorithm)
        .unwrap_or_else(|| "condorcet".to_string());
    if let Err(e) = strategy_by_name(&algorithm) {
        whatever!("Cannot use algorithm {:?}: {}", algorithm, e);
    }

    let root_p = config_p.parent().context(MissingParentDirSnafu {})?;
    let mut parsed: Vec<ParsedBallot> = Vec::new();
    for source in config.ballot_file_sources.iter() {
        let mut file_data = read_ballot_data(
            root_p.as_os_str().to_str().unwrap().to_string(),
            source,
        )?;
        parsed.append(&mut file_data);
    }
    info!("Found {:?} ballots", parsed.len());

    let result = tally_parsed(&config.candidates, &parsed, &algorithm)?;
    info!("result: {:?}", result);

    let result_js = build_summary_js(&config, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    match out_path {
        None => {
            println!("stats:{}", pretty_js_stats);
        }
        Some(ref p) if p == "stdout" => {
            println!("{}", pretty_js_stats);
        }
        Some(p) => {
            fs::write(p, &pretty_js_stats).context(WritingSummarySnafu {})?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary");
        }
    }

    Ok(())
}
