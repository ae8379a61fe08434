//! Planner types: segments, their pacing mode, and training sessions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::planner::engine;
use crate::planner::time::{TimeOfDay, TimeParseError};

/// Target intensity given to new segments when nothing else is configured.
pub const DEFAULT_TARGET_EPH: f64 = 5.0;

/// Shortest duration a fixed-duration segment may hold, in minutes.
pub const MIN_DURATION_MINUTES: f64 = 1.0;

/// Name given to row 0 of a new session.
pub const START_LABEL: &str = "Start";

/// How a segment's duration is decided.
///
/// Stored records are normalized on load: a `duration` with a non-positive
/// or non-finite `minutes` comes back as `Intensity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", from = "StoredSegmentMode")]
pub enum SegmentMode {
    /// Duration floats with effort: `ep / target_eph` hours.
    Intensity { target_eph: f64 },
    /// Duration is fixed by the user. `target_eph` is the last target the
    /// user typed and is not reconciled with the fixed duration.
    Duration { minutes: f64, target_eph: f64 },
}

/// Wire form of [`SegmentMode`] before normalization.
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum StoredSegmentMode {
    Intensity { target_eph: f64 },
    Duration { minutes: f64, target_eph: f64 },
}

impl From<StoredSegmentMode> for SegmentMode {
    fn from(stored: StoredSegmentMode) -> Self {
        match stored {
            StoredSegmentMode::Intensity { target_eph } => SegmentMode::Intensity { target_eph },
            StoredSegmentMode::Duration {
                minutes,
                target_eph,
            } if minutes.is_finite() && minutes > 0.0 => SegmentMode::Duration {
                minutes,
                target_eph,
            },
            StoredSegmentMode::Duration { target_eph, .. } => {
                tracing::warn!("Stored duration is not positive, using intensity {}", target_eph);
                SegmentMode::Intensity { target_eph }
            }
        }
    }
}

impl SegmentMode {
    /// Fixed-intensity mode with the given target.
    pub fn intensity(target_eph: f64) -> Self {
        SegmentMode::Intensity { target_eph }
    }

    /// Fixed-duration mode. Durations below one minute are raised to one.
    pub fn duration(minutes: f64, target_eph: f64) -> Self {
        let minutes = if minutes.is_finite() {
            minutes.max(MIN_DURATION_MINUTES)
        } else {
            MIN_DURATION_MINUTES
        };
        SegmentMode::Duration {
            minutes,
            target_eph,
        }
    }

    /// The user's target intensity, in either mode.
    pub fn target_eph(&self) -> f64 {
        match self {
            SegmentMode::Intensity { target_eph } => *target_eph,
            SegmentMode::Duration { target_eph, .. } => *target_eph,
        }
    }

    /// The fixed duration, if this segment holds a usable one.
    pub fn custom_duration_mins(&self) -> Option<f64> {
        match self {
            SegmentMode::Duration { minutes, .. } if *minutes > 0.0 => Some(*minutes),
            _ => None,
        }
    }

    pub fn is_fixed_duration(&self) -> bool {
        self.custom_duration_mins().is_some()
    }

    /// Switch to fixed-duration mode, keeping the current target.
    pub fn with_duration(self, minutes: f64) -> Self {
        SegmentMode::duration(minutes, self.target_eph())
    }
}

/// One leg of a planned route.
///
/// Inputs are the name/description, this leg's distance and climb, and the
/// pacing mode. Everything else is derived by
/// [`recalculate`](crate::planner::engine::recalculate) and overwritten on
/// every pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identity, assigned at creation
    pub id: Uuid,
    /// Display label
    pub name: String,
    /// Free-text notes
    #[serde(default)]
    pub description: String,
    /// Distance of this leg in kilometers
    pub split_dist_km: f64,
    /// Elevation gain of this leg in meters
    pub split_elev_m: f64,
    /// Pacing mode
    pub mode: SegmentMode,

    /// Effort points of this leg
    #[serde(default)]
    pub ep: f64,
    /// Leg duration in hours
    #[serde(default)]
    pub target_time_hours: f64,
    /// Leg duration in minutes
    #[serde(default)]
    pub target_time_mins: f64,
    /// Clock time the leg starts
    #[serde(default)]
    pub start_time: TimeOfDay,
    /// Clock time the leg ends
    #[serde(default)]
    pub end_time: TimeOfDay,
    /// Distance through this leg
    #[serde(default)]
    pub total_dist_km: f64,
    /// Elevation gain through this leg
    #[serde(default)]
    pub accu_elev_m: f64,
    /// Elapsed hours through this leg
    #[serde(default)]
    pub accu_time_hours: f64,
    /// Effort-weighted average intensity through this leg
    #[serde(default)]
    pub accu_eph: f64,
}

impl Segment {
    /// Create an empty fixed-intensity segment.
    pub fn new(name: impl Into<String>, target_eph: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            split_dist_km: 0.0,
            split_elev_m: 0.0,
            mode: SegmentMode::intensity(target_eph),
            ep: 0.0,
            target_time_hours: 0.0,
            target_time_mins: 0.0,
            start_time: TimeOfDay::MIDNIGHT,
            end_time: TimeOfDay::MIDNIGHT,
            total_dist_km: 0.0,
            accu_elev_m: 0.0,
            accu_time_hours: 0.0,
            accu_eph: 0.0,
        }
    }

    /// Set this leg's distance and climb.
    pub fn with_split(mut self, dist_km: f64, elev_m: f64) -> Self {
        self.split_dist_km = dist_km;
        self.split_elev_m = elev_m;
        self
    }

    /// Set the pacing mode.
    pub fn with_mode(mut self, mode: SegmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn target_eph(&self) -> f64 {
        self.mode.target_eph()
    }

    pub fn custom_duration_mins(&self) -> Option<f64> {
        self.mode.custom_duration_mins()
    }

    /// Copy with a fresh identity and a decorated name. Mode and inputs are kept.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{} (copy)", self.name),
            ..self.clone()
        }
    }
}

/// Totals captured when a session is saved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Total distance in kilometers
    pub total_distance: f64,
    /// Total elevation gain in meters
    pub total_elevation: f64,
    /// Sum of every segment's effort points
    pub total_ep: f64,
    /// Total planned duration in hours
    pub total_duration_hours: f64,
}

impl SessionSummary {
    /// Snapshot the cumulative fields of the last segment plus the EP sum.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let Some(last) = segments.last() else {
            return Self::default();
        };

        Self {
            total_distance: last.total_dist_km,
            total_elevation: last.accu_elev_m,
            total_ep: segments.iter().map(|s| s.ep).sum(),
            total_duration_hours: last.accu_time_hours,
        }
    }
}

/// A planned training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    /// Unique identifier
    pub id: Uuid,
    /// Session name
    pub name: String,
    /// Planned date
    pub date: NaiveDate,
    /// Clock time of the start row
    pub global_start: TimeOfDay,
    /// Ordered segments; row 0 is the start marker
    pub segments: Vec<Segment>,
    /// Totals as of the last save
    #[serde(default)]
    pub summary: SessionSummary,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last save timestamp
    pub updated_at: DateTime<Utc>,
}

impl TrainingSession {
    /// Create a session from the given segments, recalculated and summarized.
    ///
    /// An empty segment list gets a default start row, since a session always
    /// holds at least one segment.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        global_start: TimeOfDay,
        segments: Vec<Segment>,
    ) -> Self {
        let segments = if segments.is_empty() {
            vec![Segment::new(START_LABEL, DEFAULT_TARGET_EPH)]
        } else {
            segments
        };
        let segments = engine::recalculate(&segments, global_start);
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date,
            global_start,
            summary: SessionSummary::from_segments(&segments),
            segments,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the summary from the current segments and stamp the save time.
    pub fn snapshot_summary(&mut self) {
        self.summary = SessionSummary::from_segments(&self.segments);
        self.updated_at = Utc::now();
    }

    /// Serialize to a JSON record.
    pub fn to_json(&self) -> Result<String, PlannerError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlannerError::SerializationError(e.to_string()))
    }

    /// Deserialize from a JSON record.
    pub fn from_json(json: &str) -> Result<Self, PlannerError> {
        let session: TrainingSession = serde_json::from_str(json)
            .map_err(|e| PlannerError::SerializationError(e.to_string()))?;
        if session.segments.is_empty() {
            return Err(PlannerError::EmptySession);
        }
        Ok(session)
    }
}

/// Errors raised by the planner's edit layer.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// No segment at the given index
    #[error("No segment at index {0}")]
    SegmentNotFound(usize),

    /// A clock time could not be parsed
    #[error("Invalid time: {0}")]
    InvalidTime(#[from] TimeParseError),

    /// Only the start row's start time is editable
    #[error("Start time of segment {0} follows the previous segment and cannot be edited")]
    StartTimeNotEditable(usize),

    /// A session record had no segments
    #[error("Session has no segments")]
    EmptySession,

    /// Session record (de)serialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Export output could not be written
    #[error("Failed to write export: {0}")]
    WriteFailed(String),
}
