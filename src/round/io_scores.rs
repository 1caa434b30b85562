// Reader for score grids exported from spreadsheet tools.

use log::debug;
use snafu::prelude::*;

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::round::{
    BallotFileSource, MissingWorksheetSnafu, OpeningExcelSnafu, ParsedBallot, RoundResult,
};

/// Reads ballots from an Excel score grid.
///
/// The first row holds the candidate ids, starting at the second column. Each
/// following row is one voter: the voter id in the first column, scores (0-3)
/// in the candidate columns. An empty cell is a missing vote and counts as
/// score 0 in the tally.
pub fn read_excel_scores(path: String, source: &BallotFileSource) -> RoundResult<Vec<ParsedBallot>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path.clone()).context(OpeningExcelSnafu { path: path.clone() })?;
    let wrange_r = match source.excel_worksheet_name.clone() {
        Some(name) => workbook.worksheet_range(name.as_str()),
        None => workbook.worksheet_range_at(0),
    }
    .context(MissingWorksheetSnafu { path: path.clone() })?;
    let wrange = wrange_r.context(OpeningExcelSnafu { path: path.clone() })?;

    let mut rows = wrange.rows();
    let header = match rows.next() {
        Some(h) => h,
        None => whatever!("Empty worksheet in {:?}", path),
    };
    debug!("read_excel_scores: header: {:?}", header);
    let candidate_columns = parse_header(header, &path)?;

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in rows.enumerate() {
        // Row 1 is the header.
        let lineno = idx + 2;
        debug!("read_excel_scores: row {:?}: {:?}", lineno, row);
        res.push(parse_row(row, &candidate_columns, lineno, &path)?);
    }
    Ok(res)
}

// Columns without a candidate id in the header are ignored below.
fn parse_header(header: &[DataType], path: &str) -> RoundResult<Vec<Option<String>>> {
    let mut candidate_columns: Vec<Option<String>> = Vec::new();
    for elt in header.iter().skip(1) {
        match elt {
            DataType::String(s) if !s.trim().is_empty() => {
                candidate_columns.push(Some(s.trim().to_string()));
            }
            DataType::Empty => candidate_columns.push(None),
            x => whatever!("Unexpected header cell {:?} in {:?}", x, path),
        }
    }
    Ok(candidate_columns)
}

fn parse_row(
    row: &[DataType],
    candidate_columns: &[Option<String>],
    lineno: usize,
    path: &str,
) -> RoundResult<ParsedBallot> {
    let voter_id = match row.first() {
        Some(DataType::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(DataType::Int(i)) => format!("{}", i),
        Some(DataType::Float(f)) => format!("{}", f),
        _ => format!("row-{:08}", lineno),
    };

    let mut scores: Vec<(String, u32)> = Vec::new();
    for (candidate_id, elt) in candidate_columns.iter().zip(row.iter().skip(1)) {
        let candidate_id = match candidate_id {
            Some(c) => c,
            None => continue,
        };
        let score: Option<u32> = match elt {
            DataType::Empty => None,
            DataType::Int(i) => match u32::try_from(*i) {
                Ok(x) => Some(x),
                Err(_) => whatever!("Cannot read score {:?} at line {:?} in {:?}", i, lineno, path),
            },
            DataType::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64 => {
                Some(*f as u32)
            }
            DataType::String(s) if s.trim().is_empty() => None,
            DataType::String(s) => match s.trim().parse::<u32>() {
                Ok(x) => Some(x),
                Err(_) => whatever!("Cannot read score {:?} at line {:?} in {:?}", s, lineno, path),
            },
            x => whatever!("Unexpected cell {:?} at line {:?} in {:?}", x, lineno, path),
        };
        if let Some(score) = score {
            scores.push((candidate_id.clone(), score));
        }
    }

    // Spreadsheet rows carry no submission time; file order stands in for it
    // downstream.
    Ok(ParsedBallot {
        voter_id,
        scores,
        submitted_at_ms: None,
    })
}
