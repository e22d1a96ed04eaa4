//! mindsync-core: emotion-aware scheduling engine.
//!
//! Free-text mood -> emotion label -> ordering strategy; raw task rows ->
//! normalized tasks -> time-blocked events.

pub mod classifier;
pub mod emotion;
pub mod error;
pub mod heuristic;
pub mod learned;
pub mod model;
pub mod pipeline;
pub mod schedule;
pub mod strategy;
pub mod task;
pub mod time;

pub use classifier::{Classifier, EmotionClassifier};
pub use emotion::EmotionResult;
pub use error::{ModelError, ScheduleError};
pub use heuristic::KeywordClassifier;
pub use learned::{LearnedClassifier, ModelStore};
pub use model::{BagOfWordsModel, ModelArtifact, SequenceClassifier};
pub use pipeline::{validate_gap, Pipeline, PlanOutcome};
pub use schedule::{layout, reorder, schedule, Event};
pub use strategy::{select_strategy, Strategy};
pub use task::{normalize, parse_duration, RawNumber, RawTask, Task, UNTITLED_TASK};
pub use time::{local_to_utc, parse_clock, parse_timezone, DayStart};
