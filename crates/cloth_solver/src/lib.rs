mod vector;
pub use vector::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

mod particle;
pub use particle::*;

mod constraint;
pub use constraint::*;

mod topology;
pub use topology::*;

mod cloth;
pub use cloth::*;

mod plugin;
pub use plugin::*;

mod render;
pub use render::*;

mod debug;
pub use debug::*;
