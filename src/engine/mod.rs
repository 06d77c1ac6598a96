// Purpose: Melody scheduling, its background timer, and the text-to-music session.

pub mod player;
pub mod scheduler;
pub mod session;

pub use player::Player;
pub use scheduler::{Motion, Scheduler, SchedulerState, SchedulerStatus, Trigger};
pub use session::{describe, Sonifier};
