/// Run/pause flag plus a one-shot step request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    running: bool,
    step_requested: bool,
}

impl ControlState {
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn step_requested(&self) -> bool {
        self.step_requested
    }

    /// Flips run/pause and returns the new `running` value.
    pub fn toggle_running(&mut self) -> bool {
        self.running = !self.running;
        self.running
    }

    pub fn request_step(&mut self) {
        self.step_requested = true;
    }

    /// Whether this iteration should advance a generation. The step request is
    /// cleared every time, including when it was redundant because the
    /// simulation is already running.
    pub fn take_step(&mut self) -> bool {
        let advance = self.running || self.step_requested;
        self.step_requested = false;
        advance
    }

    /// Cell edits are only honored while paused.
    pub fn accepts_edits(&self) -> bool {
        !self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_paused() {
        let control = ControlState::default();
        assert!(!control.running());
        assert!(!control.step_requested());
        assert!(control.accepts_edits());
    }

    #[test]
    fn each_toggle_flips_once() {
        let mut control = ControlState::default();
        assert!(control.toggle_running());
        assert!(!control.accepts_edits());
        assert!(!control.toggle_running());
    }

    #[test]
    fn step_is_consumed_once() {
        let mut control = ControlState::default();
        control.request_step();
        assert!(control.take_step());
        assert!(!control.step_requested());
        assert!(!control.take_step());
    }

    #[test]
    fn step_while_running_is_cleared() {
        let mut control = ControlState::default();
        control.toggle_running();
        control.request_step();
        assert!(control.take_step());
        assert!(!control.step_requested());
        assert!(control.take_step());
    }
}
