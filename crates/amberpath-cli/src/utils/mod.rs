pub mod coords;
pub mod progress;
