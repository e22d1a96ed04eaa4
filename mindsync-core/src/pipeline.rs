//! Classifier -> strategy -> normalizer -> scheduler in one call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::EmotionClassifier;
use crate::emotion::EmotionResult;
use crate::error::ScheduleError;
use crate::schedule::{schedule, Event};
use crate::strategy::{select_strategy, Strategy};
use crate::task::{normalize, RawTask};
use crate::time::DayStart;

/// Everything the caller needs to render a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub emotion: EmotionResult,
    pub strategy: Strategy,
    pub events: Vec<Event>,
}

/// Emotion-aware scheduler over any classifier.
#[derive(Debug, Clone)]
pub struct Pipeline<C: EmotionClassifier> {
    classifier: C,
    day: NaiveDate,
}

impl<C: EmotionClassifier> Pipeline<C> {
    /// `day` is the date used for clock-only start times.
    pub fn new(classifier: C, day: NaiveDate) -> Self {
        Self { classifier, day }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn classify(&self, text: &str) -> EmotionResult {
        self.classifier.classify(text)
    }

    /// Classify once, derive the strategy from that same result, then schedule.
    ///
    /// Fails only on invalid input: a gap outside `0..=u32::MAX`, or tasks
    /// that would run past the last representable date. Empty task lists give
    /// an empty event list.
    pub fn run(
        &self,
        text: &str,
        raw_tasks: &[RawTask],
        start: DayStart,
        gap_minutes: i64,
    ) -> Result<PlanOutcome, ScheduleError> {
        self.run_inner(text, raw_tasks, start, gap_minutes, None)
    }

    /// Like [`Pipeline::run`] but apply `strategy` regardless of mood. The
    /// detected emotion is still reported.
    pub fn run_with_strategy(
        &self,
        text: &str,
        raw_tasks: &[RawTask],
        start: DayStart,
        gap_minutes: i64,
        strategy: Strategy,
    ) -> Result<PlanOutcome, ScheduleError> {
        self.run_inner(text, raw_tasks, start, gap_minutes, Some(strategy))
    }

    fn run_inner(
        &self,
        text: &str,
        raw_tasks: &[RawTask],
        start: DayStart,
        gap_minutes: i64,
        forced: Option<Strategy>,
    ) -> Result<PlanOutcome, ScheduleError> {
        let gap = validate_gap(gap_minutes)?;
        let start = start.resolve(self.day);

        let emotion = self.classifier.classify(text);
        let tasks = normalize(raw_tasks);
        let strategy = forced.unwrap_or_else(|| select_strategy(Some(&emotion.label)));
        let events = schedule(&tasks, strategy, start, gap)?;

        debug!(
            label = %emotion.label,
            %strategy,
            tasks = tasks.len(),
            "schedule generated"
        );

        Ok(PlanOutcome {
            emotion,
            strategy,
            events,
        })
    }
}

/// Gaps arrive as signed integers from outer layers; negatives and values
/// past `u32::MAX` are rejected.
pub fn validate_gap(gap_minutes: i64) -> Result<u32, ScheduleError> {
    if gap_minutes < 0 {
        return Err(ScheduleError::NegativeGap(gap_minutes));
    }
    u32::try_from(gap_minutes).map_err(|_| ScheduleError::GapTooLarge(gap_minutes))
}
