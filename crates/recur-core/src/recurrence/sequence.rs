use chrono::NaiveDateTime;
use std::iter::FusedIterator;
use tracing::debug;

use super::RecurrenceEngine;
use crate::rule::RecurrenceRule;

/// Lazy, bounded run of upcoming occurrences.
///
/// Each yielded date becomes the base of the next evaluation. The run ends
/// after `max_count` dates, on the first date the engine cannot produce, or
/// when the rule's `max_occurrences` budget is used up. The start date counts
/// as the first occurrence of that budget.
///
/// Adjustments that shift backwards can map a step onto its own base (or
/// earlier). Such a run is stalled and ends there instead of repeating.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    engine: RecurrenceEngine,
    rule: &'a RecurrenceRule,
    cursor: Option<NaiveDateTime>,
    remaining: usize,
    produced: u32,
}

impl<'a> Occurrences<'a> {
    pub(crate) fn new(
        engine: RecurrenceEngine,
        start: NaiveDateTime,
        rule: &'a RecurrenceRule,
        max_count: usize,
    ) -> Self {
        Self {
            engine,
            rule,
            cursor: Some(start),
            remaining: max_count,
            produced: 1,
        }
    }
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let base = self.cursor?;

        let next = self
            .engine
            .next_occurrence_counted(base, self.rule, self.produced)
            .filter(|&next| {
                let advanced = next > base;
                if !advanced {
                    debug!(%base, %next, "adjusted occurrence does not advance; stopping");
                }
                advanced
            });
        self.cursor = next;
        match next {
            Some(_) => {
                self.remaining -= 1;
                self.produced = self.produced.saturating_add(1);
            }
            None => self.remaining = 0,
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Up to `max_count` occurrences following `start`.
pub fn generate(start: NaiveDateTime, rule: &RecurrenceRule, max_count: usize) -> Occurrences<'_> {
    Occurrences::new(RecurrenceEngine, start, rule, max_count)
}
