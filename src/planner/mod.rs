//! Route segment planner.
//!
//! Builds a run as an ordered list of segments and derives, for each one,
//! its effort points, duration, clock times and running totals.

pub mod editor;
pub mod engine;
pub mod export;
pub mod time;
pub mod types;

pub use editor::{coerce_non_negative, next_label, SegmentEdit, SessionEditor};
pub use engine::{effort_points, recalculate};
pub use export::timeline_csv;
pub use time::{
    add_minutes, format_duration_hours, format_minutes, parse_time, TimeOfDay, TimeParseError,
};
pub use types::{PlannerError, Segment, SegmentMode, SessionSummary, TrainingSession};
