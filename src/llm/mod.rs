pub mod classifier;
pub mod client;
pub mod prompts;

pub use classifier::*;
pub use client::*;
pub use prompts::*;
