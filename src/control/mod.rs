//! Heat level state machine and the auto-shutoff countdown.

pub mod heat;
pub mod shutoff;
