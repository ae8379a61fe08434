//! Segment recalculation engine.
//!
//! A single forward pass over the segments that derives each leg's effort,
//! duration and clock placement plus the running totals through it. The pass
//! is pure: the input slice is untouched and a new vector is returned, so it
//! is safe to run after every edit.

use crate::planner::time::TimeOfDay;
use crate::planner::types::Segment;

/// Meters of climb worth one effort point.
pub const METERS_PER_EFFORT_POINT: f64 = 100.0;

/// Effort points for a distance and climb: 1 per km plus 1 per 100 m.
pub fn effort_points(dist_km: f64, elev_m: f64) -> f64 {
    dist_km + elev_m / METERS_PER_EFFORT_POINT
}

/// Running state carried from one segment to the next.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    dist_km: f64,
    elev_m: f64,
    time_hours: f64,
    /// End of the previous leg; the next leg starts here
    cursor: TimeOfDay,
}

impl Accumulator {
    fn new(global_start: TimeOfDay) -> Self {
        Self {
            dist_km: 0.0,
            elev_m: 0.0,
            time_hours: 0.0,
            cursor: global_start,
        }
    }

    /// Effort-points-so-far over hours-so-far.
    fn average_eph(&self) -> f64 {
        if self.time_hours > 0.0 {
            effort_points(self.dist_km, self.elev_m) / self.time_hours
        } else {
            0.0
        }
    }
}

/// Resolve a leg's duration as `(hours, minutes)`.
fn leg_duration(index: usize, segment: &Segment, ep: f64) -> (f64, f64) {
    if index == 0 {
        return (0.0, 0.0);
    }

    match segment.custom_duration_mins() {
        Some(minutes) => (minutes / 60.0, minutes),
        None => {
            let target = segment.target_eph();
            let safe_eph = if target > 0.0 { target } else { 1.0 };
            let hours = ep / safe_eph;
            (hours, hours * 60.0)
        }
    }
}

/// Recompute every derived field of `segments`, starting the timeline at
/// `global_start`.
///
/// Row 0 is the start marker: it always has zero duration and zero
/// cumulative intensity. Every later row starts where the previous one ended.
pub fn recalculate(segments: &[Segment], global_start: TimeOfDay) -> Vec<Segment> {
    let mut acc = Accumulator::new(global_start);
    let mut out = Vec::with_capacity(segments.len());

    for (index, segment) in segments.iter().enumerate() {
        let ep = effort_points(segment.split_dist_km, segment.split_elev_m);
        let (hours, minutes) = leg_duration(index, segment, ep);

        acc.dist_km += segment.split_dist_km;
        acc.elev_m += segment.split_elev_m;
        acc.time_hours += hours;

        let start_time = if index == 0 { global_start } else { acc.cursor };
        let end_time = start_time.add_minutes(minutes);
        acc.cursor = end_time;

        let accu_eph = if index == 0 { 0.0 } else { acc.average_eph() };

        out.push(Segment {
            ep,
            target_time_hours: hours,
            target_time_mins: minutes,
            start_time,
            end_time,
            total_dist_km: acc.dist_km,
            accu_elev_m: acc.elev_m,
            accu_time_hours: acc.time_hours,
            accu_eph,
            ..segment.clone()
        });
    }

    tracing::debug!(
        "Recalculated {} segments from {}, {:.2} h total",
        out.len(),
        global_start,
        acc.time_hours
    );

    out
}
