//! Signal loop: turns the alert counter into backlight changes.
//!
//! While alerts fire the backlight blinks red at 1 Hz. The first tick after
//! everything clears programs the rainbow once; idle ticks after that send
//! nothing to the device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ducky_keyboard::{Backlight, Pattern, RgbColor};
use tracing::{debug, info};

use crate::alerts::AlertCounter;

/// Length of one half-cycle of the blink, and of an idle tick
pub const TICK: Duration = Duration::from_millis(500);

/// One backlight programming step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Program {
    pub color: RgbColor,
    pub brightness: u8,
    pub pattern: Pattern,
}

/// Backlight off, first half of the blink
pub const BLINK_OFF: Program = Program {
    color: RgbColor::BLACK,
    brightness: 0x00,
    pattern: Pattern::STATIC,
};

/// Bright red, second half of the blink
pub const BLINK_ON: Program = Program {
    color: RgbColor::RED,
    brightness: 0xff,
    pattern: Pattern::STATIC,
};

/// All clear
pub const ALL_CLEAR: Program = Program {
    color: RgbColor::WHITE,
    brightness: 0xff,
    pattern: Pattern::RAINBOW,
};

pub struct SignalLoop<B: Backlight> {
    backlight: B,
    counter: Arc<AlertCounter>,
    /// Counter value seen on the previous tick; `None` until the first tick
    last: Option<u64>,
    tick: Duration,
}

impl<B: Backlight> SignalLoop<B> {
    pub fn new(backlight: B, counter: Arc<AlertCounter>) -> Self {
        Self {
            backlight,
            counter,
            last: None,
            tick: TICK,
        }
    }

    /// Counter value observed on the previous tick
    pub fn last_observed(&self) -> Option<u64> {
        self.last
    }

    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    /// Run one iteration, calling `pause` wherever the loop waits
    pub fn tick(&mut self, mut pause: impl FnMut(Duration)) {
        let firing = self.counter.get();

        if firing > 0 {
            if self.last != Some(firing) {
                info!("{} alert(s) firing", firing);
            }
            self.last = Some(firing);
            self.program(BLINK_OFF);
            pause(self.tick);
            self.program(BLINK_ON);
            pause(self.tick);
        } else {
            if self.last != Some(0) {
                info!("All clear");
                self.program(ALL_CLEAR);
            }
            self.last = Some(0);
            pause(self.tick);
        }
    }

    /// Tick until `shutdown` is set
    pub fn run(mut self, shutdown: Arc<AtomicBool>) {
        debug!("Signal loop started");
        while !shutdown.load(Ordering::Relaxed) {
            self.tick(std::thread::sleep);
        }
        debug!("Signal loop exiting");
    }

    fn program(&self, step: Program) {
        self.backlight
            .set_backlight(step.color, step.brightness, step.pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        programs: Mutex<Vec<Program>>,
    }

    impl Recorder {
        fn take(&self) -> Vec<Program> {
            std::mem::take(&mut *self.programs.lock().unwrap())
        }
    }

    impl Backlight for Recorder {
        fn set_backlight(&self, color: RgbColor, brightness: u8, pattern: Pattern) {
            self.programs.lock().unwrap().push(Program {
                color,
                brightness,
                pattern,
            });
        }
    }

    fn setup() -> (Arc<AlertCounter>, Arc<Recorder>, SignalLoop<Arc<Recorder>>) {
        let counter = Arc::new(AlertCounter::new());
        let recorder = Arc::new(Recorder::default());
        let signal = SignalLoop::new(Arc::clone(&recorder), Arc::clone(&counter));
        (counter, recorder, signal)
    }

    fn no_pause(_: Duration) {}

    #[test]
    fn test_first_idle_tick_programs_rainbow() {
        let (_counter, recorder, mut signal) = setup();
        assert_eq!(signal.last_observed(), None);

        signal.tick(no_pause);
        assert_eq!(recorder.take(), vec![ALL_CLEAR]);
        assert_eq!(signal.last_observed(), Some(0));
    }

    #[test]
    fn test_idle_ticks_are_quiet() {
        let (_counter, recorder, mut signal) = setup();
        signal.tick(no_pause);
        recorder.take();

        for _ in 0..10 {
            signal.tick(no_pause);
        }
        assert!(recorder.take().is_empty());
    }

    #[test]
    fn test_firing_blinks() {
        let (counter, recorder, mut signal) = setup();
        counter.fire();

        signal.tick(no_pause);
        signal.tick(no_pause);
        assert_eq!(
            recorder.take(),
            vec![BLINK_OFF, BLINK_ON, BLINK_OFF, BLINK_ON]
        );
        assert_eq!(signal.last_observed(), Some(1));
    }

    #[test]
    fn test_clearing_programs_rainbow_once() {
        let (counter, recorder, mut signal) = setup();
        counter.fire();
        counter.fire();
        signal.tick(no_pause);
        assert_eq!(signal.last_observed(), Some(2));
        recorder.take();

        counter.resolve();
        counter.resolve();
        signal.tick(no_pause);
        signal.tick(no_pause);
        signal.tick(no_pause);
        assert_eq!(recorder.take(), vec![ALL_CLEAR]);
    }

    #[test]
    fn test_pause_cadence() {
        let (counter, _recorder, mut signal) = setup();
        let mut pauses = Vec::new();

        signal.tick(|d| pauses.push(d));
        assert_eq!(pauses, vec![TICK]);

        pauses.clear();
        counter.fire();
        signal.tick(|d| pauses.push(d));
        assert_eq!(pauses, vec![TICK, TICK]);
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let (_counter, recorder, signal) = setup();
        let shutdown = Arc::new(AtomicBool::new(true));
        signal.run(shutdown);
        assert!(recorder.take().is_empty());
    }
}
