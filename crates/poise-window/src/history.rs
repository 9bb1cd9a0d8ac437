//! Summary history - every cycle of a session, in time order

use std::fmt::Write as _;

use tracing::warn;

use crate::{percent, CycleSummary};

/// Append-only, time-ordered list of cycle summaries
#[derive(Debug, Clone, Default)]
pub struct SummaryHistory {
    summaries: Vec<CycleSummary>,
}

impl SummaryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a summary
    ///
    /// A timestamp earlier than the last entry is clamped up to it so the
    /// history never runs backwards.
    pub fn append(&mut self, mut summary: CycleSummary) -> &CycleSummary {
        if let Some(last) = self.summaries.last() {
            if summary.timestamp < last.timestamp {
                warn!(
                    "summary timestamp {:?} precedes {:?}, clamping",
                    summary.timestamp, last.timestamp
                );
                summary.timestamp = last.timestamp;
            }
        }
        self.summaries.push(summary);
        &self.summaries[self.summaries.len() - 1]
    }

    /// All summaries, oldest first
    pub fn all(&self) -> &[CycleSummary] {
        &self.summaries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CycleSummary> {
        self.summaries.iter()
    }

    pub fn latest(&self) -> Option<&CycleSummary> {
        self.summaries.last()
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Drop every summary (session reset)
    pub fn clear(&mut self) {
        self.summaries.clear();
    }

    /// Text table of all cycles, one row per cycle
    pub fn render_table(&self) -> String {
        if self.summaries.is_empty() {
            return "No data yet. Start the analysis to see results.\n".to_string();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<6} {:<20} {:<30} {:<28} {:<8}",
            "Cycle", "Expression", "Posture", "Eye contact", "Time"
        );
        for (i, summary) in self.summaries.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<6} {:<20} {:<30} {:<28} {:<8}",
                i + 1,
                labelled(&summary.expression, summary.expression_confidence),
                labelled(&summary.posture, summary.posture_confidence),
                labelled(&summary.eye_contact, summary.eye_contact_confidence),
                summary.timestamp.local_time_of_day(),
            );
        }
        out
    }
}

fn labelled(label: &impl std::fmt::Display, confidence: f32) -> String {
    format!("{} ({}%)", label, percent(confidence))
}
