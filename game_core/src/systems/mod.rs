pub mod bot;
pub mod collision;
pub mod control;
pub mod mailbox;
pub mod movement;
pub mod scoring;
pub mod serve;
pub mod steer;

pub use bot::*;
pub use collision::*;
pub use control::*;
pub use mailbox::*;
pub use movement::*;
pub use scoring::*;
pub use serve::*;
pub use steer::*;
