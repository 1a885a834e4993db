pub mod normalize;
pub mod tournament;

pub use tournament::*;
