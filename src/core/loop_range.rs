/// In/out points that playback cycles within.
///
/// An unset in-point means the start of the media, an unset out-point means
/// its end. Whenever both are set, `in_time <= out_time`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopRange {
    in_time: Option<f64>,
    out_time: Option<f64>,
}

impl LoopRange {
    pub fn new(in_time: Option<f64>, out_time: Option<f64>) -> Self {
        let mut range = Self::default();
        if let Some(t) = out_time {
            range.set_out(t);
        }
        if let Some(t) = in_time {
            range.set_in(t);
        }
        range
    }

    pub fn in_time(&self) -> Option<f64> {
        self.in_time
    }

    pub fn out_time(&self) -> Option<f64> {
        self.out_time
    }

    /// Set the in-point, dragging the out-point up if it would fall behind
    pub fn set_in(&mut self, time: f64) {
        self.in_time = Some(time);
        if let Some(out) = self.out_time {
            if time > out {
                self.out_time = Some(time);
            }
        }
    }

    /// Set the out-point, dragging the in-point down if it would fall ahead
    pub fn set_out(&mut self, time: f64) {
        self.out_time = Some(time);
        if let Some(start) = self.in_time {
            if start > time {
                self.in_time = Some(time);
            }
        }
    }

    /// Effective `(in, out)` for media of the given duration
    pub fn bounds(&self, duration: f64) -> (f64, f64) {
        (self.in_time.unwrap_or(0.0), self.out_time.unwrap_or(duration))
    }

    /// Marker positions as percentages of the duration.
    ///
    /// `None` while the duration is not yet known.
    pub fn marker_positions(&self, duration: f64) -> Option<(f64, f64)> {
        if !duration.is_finite() || duration <= 0.0 {
            return None;
        }
        let (start, end) = self.bounds(duration);
        Some((start / duration * 100.0, end / duration * 100.0))
    }
}
