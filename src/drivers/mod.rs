//! Button classification, feedback playback and the heartbeat LED.

pub mod button;
pub mod feedback;
pub mod heartbeat;
