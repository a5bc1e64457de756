/// Process-wide count of outstanding asset loads. Register everything before
/// the loads start, report each resolution (success or terminal failure);
/// hitting zero fires the one-shot ready edge.
#[derive(Debug, Default)]
pub struct ReadinessTracker {
    outstanding: usize,
    fired: bool,
}

impl ReadinessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_pending(&mut self) {
        self.outstanding += 1;
    }

    /// Returns true exactly once: on the completion that brings the count to
    /// zero. Extra reports clamp at zero and never re-fire.
    pub fn report_complete(&mut self) -> bool {
        if self.outstanding == 0 {
            log::warn!("readiness tracker got more completions than registrations");
            return false;
        }
        self.outstanding -= 1;
        if self.outstanding == 0 && !self.fired {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_ready(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_on_last_completion() {
        let mut tracker = ReadinessTracker::new();
        for _ in 0..40 {
            tracker.register_pending();
        }
        for i in 0..40 {
            let fired = tracker.report_complete();
            assert_eq!(fired, i == 39, "fired at completion {i}");
        }
        assert!(tracker.is_ready());
    }

    #[test]
    fn extra_reports_clamp_and_stay_quiet() {
        let mut tracker = ReadinessTracker::new();
        tracker.register_pending();
        assert!(tracker.report_complete());
        assert!(!tracker.report_complete());
        assert!(!tracker.report_complete());
        assert_eq!(tracker.outstanding(), 0);
        assert!(tracker.is_ready());
    }

    #[test]
    fn not_ready_while_loads_outstanding() {
        let mut tracker = ReadinessTracker::new();
        tracker.register_pending();
        tracker.register_pending();
        assert!(!tracker.report_complete());
        assert!(!tracker.is_ready());
        assert_eq!(tracker.outstanding(), 1);
    }
}
