//! Start→Loop→Hold phase sequencing for a pair of driving animations.

use crate::options::PlaybackMode;

/// Which driving animation is currently selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Loop,
    Hold,
}

/// Tracks phase transitions and computes the effective frame to sample the
/// currently-active animation at.
///
/// Frame bookkeeping: `advance` takes a monotonically increasing global frame
/// counter, never an absolute frame number, matching the per-frame evaluator's
/// "samples one frame on demand" contract — [`PhaseMachine::at_frame`] wraps this
/// into a stateless query for callers (the CLI's `--frame`) that only ever want
/// one frame's answer.
#[derive(Debug, Clone)]
pub struct PhaseMachine {
    start_len: f32,
    has_start: bool,
    loop_len: f32,
    effective_loop_len: f32,
    mode: PlaybackMode,
    phase: Phase,
    frame: f32,
}

impl PhaseMachine {
    /// `start_len` is `None` when there is no start animation. `loop_len` is the
    /// length of whichever animation drives `Loop`/`Hold` (the spec's "loop or
    /// very short state-only animation").
    pub fn new(start_len: Option<f32>, loop_len: f32, mode: PlaybackMode) -> Self {
        let has_start = start_len.is_some();
        let start_len = start_len.unwrap_or(0.0).max(0.0);
        let loop_len = loop_len.max(0.0);
        let effective_loop_len = if has_start && start_len < loop_len {
            loop_len - start_len
        } else {
            loop_len
        };

        let mut machine = Self {
            start_len,
            has_start,
            loop_len,
            effective_loop_len,
            mode,
            phase: Phase::Start,
            frame: 0.0,
        };
        machine.phase = machine.initial_phase();
        machine
    }

    fn initial_phase(&self) -> Phase {
        if self.has_start {
            Phase::Start
        } else if self.mode == PlaybackMode::Hold {
            Phase::Hold
        } else {
            Phase::Loop
        }
    }

    /// Return to `Start` (if applicable) and frame 0.
    pub fn reset(&mut self) {
        self.frame = 0.0;
        self.phase = self.initial_phase();
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The length of the loop's effective playback range: `loop_len - start_len`
    /// when a start animation exists and is shorter, else `loop_len` unchanged.
    pub fn effective_loop_len(&self) -> f32 {
        self.effective_loop_len
    }

    /// Advance the global frame counter by `delta` (clamped to non-negative),
    /// firing the `Start -> Loop`/`Hold` transition once the start animation's
    /// length is reached.
    pub fn advance(&mut self, delta: f32) {
        self.frame += delta.max(0.0);
        if self.phase == Phase::Start && self.frame >= self.start_len {
            self.phase = if self.mode == PlaybackMode::Hold {
                Phase::Hold
            } else {
                Phase::Loop
            };
        }
    }

    /// The frame to sample the currently-active animation at.
    pub fn effective_frame(&self) -> f32 {
        match self.phase {
            Phase::Start => self.frame.min(self.start_len),
            Phase::Loop => {
                let t = (self.frame - self.start_len).max(0.0);
                if self.effective_loop_len <= 0.0 {
                    0.0
                } else {
                    t % self.effective_loop_len
                }
            }
            Phase::Hold => {
                let last = (self.loop_len - 1.0).max(0.0);
                let t = (self.frame - self.start_len).max(0.0);
                t.min(last)
            }
        }
    }

    /// Evaluate at an absolute global frame without mutating this machine —
    /// used for one-shot queries (`--frame <f>`) rather than stepped playback.
    pub fn at_frame(&self, global_frame: f32) -> (Phase, f32) {
        let mut probe = self.clone();
        probe.reset();
        probe.advance(global_frame);
        (probe.phase(), probe.effective_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_to_loop_transition_matches_spec_scenario_s2() {
        let mut machine = PhaseMachine::new(Some(100.0), 200.0, PlaybackMode::Loop);
        machine.advance(50.0);
        assert_eq!(machine.phase(), Phase::Start);
        assert_eq!(machine.effective_frame(), 50.0);

        machine.advance(50.0); // now at global frame 100
        assert_eq!(machine.phase(), Phase::Loop);
        assert_eq!(machine.effective_frame(), 0.0);
        assert_eq!(machine.effective_loop_len(), 100.0);
    }

    #[test]
    fn loop_shorter_than_start_keeps_full_loop_length() {
        let machine = PhaseMachine::new(Some(200.0), 100.0, PlaybackMode::Loop);
        assert_eq!(machine.effective_loop_len(), 100.0);
    }

    #[test]
    fn no_start_animation_begins_in_loop_phase() {
        let machine = PhaseMachine::new(None, 240.0, PlaybackMode::Loop);
        assert_eq!(machine.phase(), Phase::Loop);
    }

    #[test]
    fn hold_mode_freezes_on_the_final_frame() {
        let mut machine = PhaseMachine::new(None, 60.0, PlaybackMode::Hold);
        assert_eq!(machine.phase(), Phase::Hold);
        machine.advance(1000.0);
        assert_eq!(machine.effective_frame(), 59.0);
    }

    #[test]
    fn reset_returns_to_initial_phase_and_frame_zero() {
        let mut machine = PhaseMachine::new(Some(10.0), 20.0, PlaybackMode::Loop);
        machine.advance(30.0);
        assert_eq!(machine.phase(), Phase::Loop);
        machine.reset();
        assert_eq!(machine.phase(), Phase::Start);
        assert_eq!(machine.effective_frame(), 0.0);
    }

    #[test]
    fn at_frame_does_not_mutate_and_matches_advance() {
        let machine = PhaseMachine::new(Some(100.0), 200.0, PlaybackMode::Loop);
        assert_eq!(machine.at_frame(50.0), (Phase::Start, 50.0));
        assert_eq!(machine.at_frame(150.0), (Phase::Loop, 50.0));
    }
}
