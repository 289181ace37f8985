pub mod context;
pub mod event;
pub mod stats;
pub mod transcript;

pub use context::*;
pub use event::*;
pub use stats::*;
pub use transcript::*;
