pub mod rate_ladder;
pub mod loop_range;

pub use rate_ladder::{Direction, RateLadder};
pub use loop_range::LoopRange;
