//! RunPlanner - Run Training Planner
//!
//! Plans a run as a sequence of route segments. Each segment's distance,
//! climb and target intensity (or fixed duration) produce an effort score,
//! a place on the clock and cumulative statistics for the whole route.

pub mod planner;
pub mod storage;

// Re-export commonly used types
pub use planner::editor::SessionEditor;
pub use planner::engine::recalculate;
pub use planner::types::{Segment, SegmentMode, TrainingSession};
pub use storage::config::AppConfig;
