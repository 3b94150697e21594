//! Probability matrices: rate levels × meeting dates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Probability, Rate};

/// Decimal places of the displayed probabilities.
pub const PROBABILITY_DP: u32 = 2;

/// Why a meeting column was left all-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The meeting is on or before the valuation date.
    MeetingPassed,
    /// No implied rate could be matched to the meeting date.
    MissingImpliedRate,
    /// The forward rate to the meeting is undefined.
    UndefinedForward,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::MeetingPassed => "meeting already passed",
            SkipReason::MissingImpliedRate => "no implied rate for the meeting date",
            SkipReason::UndefinedForward => "forward rate undefined",
        };
        f.write_str(text)
    }
}

/// A meeting whose column carries no probability mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedMeeting {
    pub meeting_index: usize,
    pub meeting: NaiveDate,
    pub reason: SkipReason,
}

impl SkippedMeeting {
    pub fn describe(&self) -> String {
        format!("Meeting {} skipped: {}", self.meeting, self.reason)
    }
}

/// One displayed row: a rate level and its probability per meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub level: Rate,
    pub probabilities: Vec<Probability>,
}

/// Probability mass per candidate policy rate (rows, descending) and meeting
/// date (columns, input order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityMatrix {
    /// Candidate policy-rate levels, descending
    pub levels: Vec<Rate>,
    /// Meeting dates in input order
    pub meetings: Vec<NaiveDate>,
    /// `probabilities[row][column]`
    pub probabilities: Vec<Vec<Probability>>,
    /// Columns left all-zero and why
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedMeeting>,
}

impl ProbabilityMatrix {
    /// All-zero matrix for the given grid and meetings.
    pub fn zeros(levels: Vec<Rate>, meetings: Vec<NaiveDate>) -> Self {
        let probabilities = vec![vec![Decimal::ZERO; meetings.len()]; levels.len()];
        ProbabilityMatrix {
            levels,
            meetings,
            probabilities,
            skipped: Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self, meeting_index: usize, reason: SkipReason) {
        let meeting = self.meetings[meeting_index];
        tracing::warn!(%meeting, %reason, "leaving meeting column empty");
        self.skipped.push(SkippedMeeting {
            meeting_index,
            meeting,
            reason,
        });
    }

    pub(crate) fn set(&mut self, row: usize, column: usize, value: Probability) {
        self.probabilities[row][column] = value;
    }

    pub fn column(&self, column: usize) -> Vec<Probability> {
        self.probabilities.iter().map(|row| row[column]).collect()
    }

    pub fn column_sum(&self, column: usize) -> Probability {
        self.probabilities.iter().map(|row| row[column]).sum()
    }

    pub fn is_column_empty(&self, column: usize) -> bool {
        self.probabilities.iter().all(|row| row[column].is_zero())
    }

    /// Probability of `level` at meeting `column`, if the level is on the grid.
    pub fn probability(&self, level: Rate, column: usize) -> Option<Probability> {
        let row = self.levels.iter().position(|l| *l == level)?;
        self.probabilities.get(row)?.get(column).copied()
    }

    /// Level carrying the most mass at meeting `column`. `None` for an empty column.
    /// Ties resolve to the higher level.
    pub fn most_likely(&self, column: usize) -> Option<Rate> {
        if self.is_column_empty(column) {
            return None;
        }
        let mut best: Option<(Rate, Probability)> = None;
        for (level, row) in self.levels.iter().zip(&self.probabilities) {
            let p = row[column];
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((*level, p));
            }
        }
        best.map(|(level, _)| level)
    }

    /// Copy with every cell rounded to `dp` decimal places. Column sums may
    /// drift from 1 by a few rounding units.
    pub fn rounded(&self, dp: u32) -> Self {
        ProbabilityMatrix {
            levels: self.levels.clone(),
            meetings: self.meetings.clone(),
            probabilities: self
                .probabilities
                .iter()
                .map(|row| row.iter().map(|p| p.round_dp(dp)).collect())
                .collect(),
            skipped: self.skipped.clone(),
        }
    }

    pub fn to_rows(&self) -> Vec<MatrixRow> {
        self.levels
            .iter()
            .zip(&self.probabilities)
            .map(|(level, row)| MatrixRow {
                level: *level,
                probabilities: row.clone(),
            })
            .collect()
    }
}
