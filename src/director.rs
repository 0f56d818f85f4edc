use crate::config::DurationsConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalMode {
    Scatter,
    Chase,
}

/// Cycles every ghost between Scatter and Chase on fixed wall-clock
/// durations. Pausing freezes the elapsed progress of the current phase:
/// the switch stamp slides forward with the pause, so a phase paused with
/// 4 seconds left resumes with 4 seconds left.
pub struct ModeDirector {
    scatter_duration_ms: u64,
    chase_duration_ms: u64,
    mode: GlobalMode,
    last_switch_ms: u64,
    paused: bool,
    paused_elapsed_ms: u64,
}

impl ModeDirector {
    pub fn new(durations: &DurationsConfig, now_ms: u64) -> Self {
        Self {
            scatter_duration_ms: durations.scatter,
            chase_duration_ms: durations.chase,
            mode: GlobalMode::Scatter,
            last_switch_ms: now_ms,
            paused: false,
            paused_elapsed_ms: 0,
        }
    }

    pub fn update(&mut self, now_ms: u64) {
        if self.paused {
            self.last_switch_ms = now_ms.saturating_sub(self.paused_elapsed_ms);
            return;
        }

        let elapsed = now_ms.saturating_sub(self.last_switch_ms);
        let limit = match self.mode {
            GlobalMode::Scatter => self.scatter_duration_ms,
            GlobalMode::Chase => self.chase_duration_ms,
        };
        if elapsed > limit {
            self.mode = match self.mode {
                GlobalMode::Scatter => GlobalMode::Chase,
                GlobalMode::Chase => GlobalMode::Scatter,
            };
            self.last_switch_ms = now_ms;
        }
    }

    pub fn set_paused(&mut self, paused: bool, now_ms: u64) {
        if paused && !self.paused {
            self.paused_elapsed_ms = now_ms.saturating_sub(self.last_switch_ms);
        } else if !paused && self.paused {
            self.last_switch_ms = now_ms.saturating_sub(self.paused_elapsed_ms);
        }
        self.paused = paused;
    }

    pub fn reset(&mut self, now_ms: u64) {
        self.mode = GlobalMode::Scatter;
        self.last_switch_ms = now_ms;
        self.paused = false;
        self.paused_elapsed_ms = 0;
    }

    pub fn mode(&self) -> GlobalMode {
        self.mode
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> ModeDirector {
        // scatter 7s, chase 20s
        ModeDirector::new(&DurationsConfig::default(), 0)
    }

    #[test]
    fn cycles_scatter_then_chase_on_durations() {
        let mut d = director();
        d.update(6_999);
        assert_eq!(d.mode(), GlobalMode::Scatter);
        d.update(7_001);
        assert_eq!(d.mode(), GlobalMode::Chase);
        d.update(27_001);
        assert_eq!(d.mode(), GlobalMode::Chase);
        d.update(27_002);
        assert_eq!(d.mode(), GlobalMode::Scatter);
    }

    #[test]
    fn pause_preserves_the_remaining_phase_time() {
        let mut d = director();
        d.update(3_000);
        assert_eq!(d.mode(), GlobalMode::Scatter);

        // Power pellet at t=3000 with 3000ms spent in Scatter; a 7000ms
        // vulnerability window must not advance the cycle.
        d.set_paused(true, 3_000);
        for now in [4_000, 7_000, 10_000] {
            d.update(now);
            assert_eq!(d.mode(), GlobalMode::Scatter);
        }
        d.set_paused(false, 10_000);

        // 4000ms of Scatter remained, so the flip lands at 14000, neither
        // restarting the phase nor jumping straight to Chase.
        d.update(13_999);
        assert_eq!(d.mode(), GlobalMode::Scatter);
        d.update(14_001);
        assert_eq!(d.mode(), GlobalMode::Chase);
    }

    #[test]
    fn update_while_paused_keeps_restamping() {
        let mut d = director();
        d.set_paused(true, 0);
        d.update(60_000);
        d.set_paused(false, 60_000);
        d.update(66_999);
        assert_eq!(d.mode(), GlobalMode::Scatter);
        d.update(67_001);
        assert_eq!(d.mode(), GlobalMode::Chase);
    }

    #[test]
    fn reset_returns_to_scatter_with_fresh_stamp() {
        let mut d = director();
        d.update(8_000);
        assert_eq!(d.mode(), GlobalMode::Chase);
        d.set_paused(true, 8_000);
        d.reset(9_000);
        assert_eq!(d.mode(), GlobalMode::Scatter);
        assert!(!d.is_paused());
        d.update(15_999);
        assert_eq!(d.mode(), GlobalMode::Scatter);
        d.update(16_001);
        assert_eq!(d.mode(), GlobalMode::Chase);
    }
}
