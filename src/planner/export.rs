//! CSV export of a session's timeline.

use crate::planner::types::{PlannerError, TrainingSession};
use std::io::Write;

/// Export every segment's inputs and derived timeline as CSV.
pub fn timeline_csv(session: &TrainingSession) -> Result<String, PlannerError> {
    let mut output = Vec::new();

    writeln!(
        output,
        "name,mode,split_dist_km,split_elev_m,target_eph,custom_duration_mins,ep,target_time_mins,start_time,end_time,total_dist_km,accu_elev_m,accu_time_hours,accu_eph"
    )
    .map_err(|e| PlannerError::WriteFailed(e.to_string()))?;

    for segment in &session.segments {
        writeln!(
            output,
            "{},{},{:.2},{:.0},{:.2},{},{:.2},{:.1},{},{},{:.2},{:.0},{:.3},{:.2}",
            escape_field(&segment.name),
            if segment.mode.is_fixed_duration() {
                "duration"
            } else {
                "intensity"
            },
            segment.split_dist_km,
            segment.split_elev_m,
            segment.target_eph(),
            segment
                .custom_duration_mins()
                .map_or(String::new(), |m| format!("{:.0}", m)),
            segment.ep,
            segment.target_time_mins,
            segment.start_time,
            segment.end_time,
            segment.total_dist_km,
            segment.accu_elev_m,
            segment.accu_time_hours,
            segment.accu_eph,
        )
        .map_err(|e| PlannerError::WriteFailed(e.to_string()))?;
    }

    String::from_utf8(output).map_err(|e| PlannerError::WriteFailed(e.to_string()))
}

/// Quote a free-text field if it contains CSV metacharacters.
fn escape_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
