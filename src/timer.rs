/// A plain decrementing rest countdown. Runs beside the session machine
/// and never touches workout data; expiry is only a signal for the UI.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestTimer {
    running: bool,
    seconds_left: u32,
    total_seconds: u32,
}

impl RestTimer {
    pub fn start(&mut self, seconds: u32) {
        self.total_seconds = seconds;
        self.seconds_left = seconds;
        self.running = seconds > 0;
    }

    /// Advances one second. Returns true on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.running = false;
            return true;
        }
        false
    }

    pub fn skip(&mut self) {
        self.running = false;
        self.seconds_left = 0;
    }

    /// Adds or removes seconds, floored at zero. Extending past the
    /// original total stretches the total so progress stays in range.
    pub fn adjust(&mut self, delta: i32) {
        let next = self.seconds_left as i64 + delta as i64;
        self.seconds_left = next.max(0) as u32;
        self.total_seconds = self.total_seconds.max(self.seconds_left);
        if self.seconds_left == 0 {
            self.running = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    /// Fraction elapsed, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        (self.total_seconds - self.seconds_left) as f64 / self.total_seconds as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_and_signals_expiry_once() {
        let mut t = RestTimer::default();
        t.start(3);
        assert!(t.is_running());
        assert!(!t.tick());
        assert!(!t.tick());
        assert!(t.tick());
        assert!(!t.is_running());
        // Further ticks stay silent.
        assert!(!t.tick());
    }

    #[test]
    fn skip_stops_and_zeroes() {
        let mut t = RestTimer::default();
        t.start(60);
        t.skip();
        assert!(!t.is_running());
        assert_eq!(t.seconds_left(), 0);
    }

    #[test]
    fn adjust_floors_at_zero_and_stretches_total() {
        let mut t = RestTimer::default();
        t.start(30);
        t.adjust(-45);
        assert_eq!(t.seconds_left(), 0);
        assert!(!t.is_running());

        t.start(30);
        t.adjust(15);
        assert_eq!(t.seconds_left(), 45);
        assert_eq!(t.total_seconds(), 45);
    }

    #[test]
    fn progress_fraction() {
        let mut t = RestTimer::default();
        assert_eq!(t.progress(), 0.0);
        t.start(10);
        for _ in 0..5 {
            t.tick();
        }
        assert_eq!(t.progress(), 0.5);
    }
}
