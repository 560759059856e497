pub mod doctor;
pub mod task;

pub use doctor::*;
pub use task::*;
