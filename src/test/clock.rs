use crate::clock::MockClock;
use crate::Ticker;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_ticker_reports_whole_milliseconds() {
    let clock = MockClock::new(Instant::now());
    let mut ticker = Ticker::new(Arc::new(clock.clone()));

    assert_eq!(ticker.elapsed_ms(), 0);

    clock.advance_ms(250);
    assert_eq!(ticker.elapsed_ms(), 250);
    assert_eq!(ticker.elapsed_ms(), 0);
}

#[test]
fn test_ticker_carries_fractions() {
    let clock = MockClock::new(Instant::now());
    let mut ticker = Ticker::new(Arc::new(clock.clone()));

    clock.advance(Duration::from_micros(1_500));
    assert_eq!(ticker.elapsed_ms(), 1);

    clock.advance(Duration::from_micros(600));
    assert_eq!(ticker.elapsed_ms(), 1);

    clock.advance(Duration::from_micros(900));
    assert_eq!(ticker.elapsed_ms(), 1);
}
