//! Signal generation: crossover detection, synthetic demo signals and the
//! refresh engine that assembles them into a board.

pub mod board;
pub mod crossover;
pub mod engine;
pub mod filter;
pub mod synthetic;

pub use board::{SignalBoard, SignalMode};
pub use crossover::CrossoverDetector;
pub use engine::{EngineError, SignalEngine};
pub use filter::{AssetFilter, SignalFilter, TypeFilter};
pub use synthetic::SyntheticSignalGenerator;
