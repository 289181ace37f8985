pub mod stage0_examiners;
pub mod stage1_partition;
pub mod stage2_track;
pub mod stage3_merge;
pub mod stage4_render;

pub use stage0_examiners::*;
pub use stage1_partition::*;
pub use stage2_track::*;
pub use stage3_merge::*;
pub use stage4_render::*;
