//! Applies the pattern registry to extracted text runs.

use crate::domain::{detect_all, MatchSpan, RedactionCategory, TextRun};

/// A pattern match inside a specific run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMatch<'a> {
    pub run: &'a TextRun,
    pub category: RedactionCategory,
    pub span: MatchSpan,
}

/// Matches every run independently, in run order then registry order.
///
/// PII split across two runs is not found.
pub fn match_runs(runs: &[TextRun]) -> Vec<RunMatch<'_>> {
    runs.iter()
        .filter(|run| !run.text.is_empty())
        .flat_map(|run| {
            detect_all(&run.text)
                .into_iter()
                .map(move |(category, span)| RunMatch {
                    run,
                    category,
                    span,
                })
        })
        .collect()
}
