/// The sender's single retransmission timer.
///
/// Time only moves when `tick` is called; the timer never looks at a clock.
#[derive(Debug, Clone)]
pub struct RetransmissionTimer {
    rto: u64,
    elapsed: u64,
    active: bool,
}

impl RetransmissionTimer {
    pub fn new(initial_rto_ms: u64) -> Self {
        RetransmissionTimer {
            rto: initial_rto_ms,
            elapsed: 0,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.reset();
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    pub fn exponential_backoff(&mut self) {
        self.rto = self.rto.saturating_mul(2);
    }

    /// Advance by `ms` if running.
    pub fn tick(&mut self, ms: u64) -> &mut Self {
        if self.active {
            self.elapsed = self.elapsed.saturating_add(ms);
        }
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_expired(&self) -> bool {
        self.active && self.elapsed >= self.rto
    }

    /// Current timeout, in milliseconds.
    pub fn rto(&self) -> u64 {
        self.rto
    }
}
