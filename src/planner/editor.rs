//! Edit handlers for a session's segment list.
//!
//! Every edit coerces raw input, applies any mode switch, builds a new
//! segment vector and runs a full recalculation before replacing the
//! session's segments.

use crate::planner::engine::recalculate;
use crate::planner::time::{parse_time, TimeOfDay};
use crate::planner::types::{
    PlannerError, Segment, SegmentMode, TrainingSession, DEFAULT_TARGET_EPH, START_LABEL,
};
use crate::storage::config::PlannerSettings;
use uuid::Uuid;

/// Label used once single-letter labels run past `Z`.
pub const OVERFLOW_LABEL: &str = "New";

/// A raw edit to one field of a segment, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentEdit {
    Name(String),
    Description(String),
    /// Leg distance in km
    DistanceKm(String),
    /// Leg climb in m
    ElevationM(String),
    /// Target intensity; returns the segment to fixed-intensity mode
    TargetEph(String),
    /// Leg end time; puts the segment into fixed-duration mode
    EndTime(String),
    /// Start time; only the start row accepts it, and it moves the whole plan
    StartTime(String),
}

/// Coerce raw numeric input to a finite, non-negative number.
///
/// Anything unparseable, negative or non-finite becomes 0.
pub fn coerce_non_negative(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        Ok(value) => {
            tracing::warn!("Clamped out-of-range input {} to 0", value);
            0.0
        }
        Err(_) => {
            if !raw.trim().is_empty() {
                tracing::warn!("Non-numeric input {:?} treated as 0", raw);
            }
            0.0
        }
    }
}

/// Label for a segment appended after `previous`.
///
/// Single-letter labels count upward (`A`, `B`, ...) and give way to
/// [`OVERFLOW_LABEL`] after `Z`. The first leg after the start row is `A`.
pub fn next_label(previous: &str, previous_is_start: bool) -> String {
    let mut chars = previous.chars();
    match (chars.next(), chars.next()) {
        (Some('Z'), None) | (Some('z'), None) => OVERFLOW_LABEL.to_string(),
        (Some(c), None) if c.is_ascii_alphabetic() => ((c as u8 + 1) as char).to_string(),
        _ if previous_is_start => "A".to_string(),
        _ => OVERFLOW_LABEL.to_string(),
    }
}

/// Owns a session and keeps its segments recalculated across edits.
#[derive(Debug, Clone)]
pub struct SessionEditor {
    session: TrainingSession,
    default_target_eph: f64,
}

impl SessionEditor {
    /// Wrap a session, recalculating it immediately.
    pub fn new(session: TrainingSession) -> Self {
        Self::with_target_eph(session, DEFAULT_TARGET_EPH)
    }

    /// Wrap a session, using configured defaults for appended segments.
    pub fn with_settings(session: TrainingSession, settings: &PlannerSettings) -> Self {
        Self::with_target_eph(session, settings.target_eph())
    }

    fn with_target_eph(mut session: TrainingSession, default_target_eph: f64) -> Self {
        if session.segments.is_empty() {
            session
                .segments
                .push(Segment::new(START_LABEL, default_target_eph));
        }
        session.segments = recalculate(&session.segments, session.global_start);
        tracing::info!(
            "Editing session '{}' with {} segments",
            session.name,
            session.segments.len()
        );

        Self {
            session,
            default_target_eph,
        }
    }

    /// The session as currently edited.
    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    pub fn segments(&self) -> &[Segment] {
        &self.session.segments
    }

    pub fn global_start(&self) -> TimeOfDay {
        self.session.global_start
    }

    pub fn len(&self) -> usize {
        self.session.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session.segments.is_empty()
    }

    /// Finish editing: snapshot the summary and hand back the session.
    pub fn into_session(mut self) -> TrainingSession {
        self.session.snapshot_summary();
        tracing::info!(
            "Saved session '{}': {:.1} km, {:.0} m, {:.1} EP",
            self.session.name,
            self.session.summary.total_distance,
            self.session.summary.total_elevation,
            self.session.summary.total_ep
        );
        self.session
    }

    /// Move the whole timeline to a new start time.
    pub fn set_global_start(&mut self, raw: &str) -> Result<(), PlannerError> {
        let start = parse_time(raw)?;
        self.session.global_start = start;
        let segments = self.session.segments.clone();
        self.commit(segments);
        tracing::debug!("Global start set to {}", start);
        Ok(())
    }

    /// Apply a raw field edit to the segment at `index`.
    pub fn edit(&mut self, index: usize, edit: SegmentEdit) -> Result<(), PlannerError> {
        if index >= self.len() {
            return Err(PlannerError::SegmentNotFound(index));
        }

        let mut segments = self.session.segments.clone();
        let segment = &mut segments[index];

        match edit {
            SegmentEdit::Name(name) => segment.name = name,
            SegmentEdit::Description(description) => segment.description = description,
            SegmentEdit::DistanceKm(raw) => segment.split_dist_km = coerce_non_negative(&raw),
            SegmentEdit::ElevationM(raw) => segment.split_elev_m = coerce_non_negative(&raw),
            SegmentEdit::TargetEph(raw) => {
                let target = coerce_non_negative(&raw);
                segment.mode = SegmentMode::intensity(target);
                tracing::debug!("Segment {} fixed at {} EPH", index, target);
            }
            SegmentEdit::EndTime(raw) => {
                let end = parse_time(&raw)?;
                let minutes = segment.start_time.minutes_until(end);
                segment.mode = segment.mode.with_duration(minutes as f64);
                tracing::debug!(
                    "Segment {} fixed at {} min (ends {})",
                    index,
                    segment.mode.custom_duration_mins().unwrap_or_default(),
                    end
                );
            }
            SegmentEdit::StartTime(raw) => {
                if index != 0 {
                    return Err(PlannerError::StartTimeNotEditable(index));
                }
                return self.set_global_start(&raw);
            }
        }

        self.commit(segments);
        Ok(())
    }

    /// Append an empty segment after the last one.
    pub fn append(&mut self) -> Uuid {
        let mut segments = self.session.segments.clone();
        let name = match segments.last() {
            Some(last) => next_label(&last.name, segments.len() == 1),
            None => "A".to_string(),
        };
        let segment = Segment::new(name, self.default_target_eph);
        let id = segment.id;
        tracing::debug!("Appended segment '{}'", segment.name);
        segments.push(segment);

        self.commit(segments);
        id
    }

    /// Insert a copy of the segment at `index` right after it.
    pub fn duplicate(&mut self, index: usize) -> Result<Uuid, PlannerError> {
        let source = self
            .session
            .segments
            .get(index)
            .ok_or(PlannerError::SegmentNotFound(index))?;
        let copy = source.duplicate();
        let id = copy.id;

        let mut segments = self.session.segments.clone();
        segments.insert(index + 1, copy);
        tracing::debug!("Duplicated segment {}", index);

        self.commit(segments);
        Ok(id)
    }

    /// Remove the segment at `index`.
    ///
    /// Returns `Ok(false)` without changing anything when it is the only
    /// segment left.
    pub fn delete(&mut self, index: usize) -> Result<bool, PlannerError> {
        if index >= self.len() {
            return Err(PlannerError::SegmentNotFound(index));
        }
        if self.len() <= 1 {
            tracing::warn!("Refusing to delete the last segment");
            return Ok(false);
        }

        let mut segments = self.session.segments.clone();
        let removed = segments.remove(index);
        tracing::debug!("Deleted segment '{}'", removed.name);

        self.commit(segments);
        Ok(true)
    }

    fn commit(&mut self, segments: Vec<Segment>) {
        self.session.segments = recalculate(&segments, self.session.global_start);
    }
}
