/// Direction of a shuttle step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Index offset applied when stepping along the ladder
    pub fn offset(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    /// Rate used when shuttling away from rest
    pub fn initial_rate(self) -> f64 {
        self.offset() as f64
    }
}

/// Ordered set of playback speeds the shuttle keys step through.
///
/// Negative entries are reverse speeds. Stepping never fails: a rate that is
/// not on the ladder is treated as sitting just below the first rung, and the
/// resulting index is clamped to the ladder's ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLadder {
    rates: Vec<f64>,
}

impl RateLadder {
    /// Build a ladder, sorting ascending and dropping duplicates
    pub fn new(mut rates: Vec<f64>) -> Self {
        rates.sort_by(|a, b| a.total_cmp(b));
        rates.dedup();
        Self { rates }
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Position of an exact rate on the ladder
    pub fn index_of(&self, rate: f64) -> Option<usize> {
        self.rates.iter().position(|&r| r == rate)
    }

    /// Next rate one rung away from `current` in `direction`
    pub fn step(&self, current: f64, direction: Direction) -> f64 {
        if self.is_empty() {
            return current;
        }

        let index = self.index_of(current).map(|i| i as isize).unwrap_or(-1);
        let last = self.rates.len() as isize - 1;
        let next = (index + direction.offset()).clamp(0, last);

        self.rates[next as usize]
    }
}

impl Default for RateLadder {
    fn default() -> Self {
        Self::new(vec![-10.0, -5.0, -2.0, -1.0, -0.5, 0.5, 1.0, 2.0, 5.0, 10.0])
    }
}
