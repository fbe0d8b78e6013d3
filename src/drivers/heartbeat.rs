//! On-board heartbeat LED.
//!
//! Toggles once per period while the control loop is alive.  A stalled
//! or blocked loop (feedback playback included) shows as a frozen LED.

pub struct Heartbeat {
    period_ms: u32,
    next_toggle_ms: Option<u32>,
    lit: bool,
}

impl Heartbeat {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            next_toggle_ms: None,
            lit: false,
        }
    }

    /// Returns the new LED level when it is time to toggle.
    pub fn tick(&mut self, now_ms: u32) -> Option<bool> {
        // Signed view of the wrapping difference: due once now has caught up.
        if let Some(due) = self.next_toggle_ms {
            if (now_ms.wrapping_sub(due) as i32) < 0 {
                return None;
            }
        }
        self.lit = !self.lit;
        self.next_toggle_ms = Some(now_ms.wrapping_add(self.period_ms));
        Some(self.lit)
    }
}
