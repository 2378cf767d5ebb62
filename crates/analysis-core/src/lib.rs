pub mod accumulator;
pub mod error;
pub mod traits;
pub mod types;

pub use accumulator::{clamp_unit, ScoreAccumulator};
pub use error::*;
pub use traits::*;
pub use types::*;
