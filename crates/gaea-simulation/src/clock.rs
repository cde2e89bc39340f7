use gaea_core::calendar::CalendarTime;

/// Virtual seconds covered by one simulation tick.
pub const SECONDS_PER_TICK: f32 = 1.0;

/// Largest remainder carried into the next frame; always below one tick.
const MAX_CARRY: f32 = SECONDS_PER_TICK - f32::EPSILON;

/// Turns real elapsed time into whole virtual-second ticks.
///
/// Real time is scaled by the current speed and accumulated; once a full
/// virtual second has built up the calendar advances by one second and one
/// tick fires. At most one tick fires per frame and the carried remainder
/// stays below one second, so a long stall never turns into a burst of
/// ticks. While paused the accumulator is frozen, so resuming never catches
/// up on time that passed during the pause.
#[derive(Debug, Clone)]
pub struct TimeDriver {
    time: CalendarTime,
    accumulated: f32,
    speed: f32,
    previous_speed: f32,
}

impl Default for TimeDriver {
    fn default() -> Self {
        Self::new(CalendarTime::default())
    }
}

impl TimeDriver {
    /// A running driver starting at `start`, at normal speed.
    pub fn new(start: CalendarTime) -> Self {
        Self {
            time: start,
            accumulated: 0.0,
            speed: 1.0,
            previous_speed: 1.0,
        }
    }

    /// The current calendar snapshot.
    pub fn time(&self) -> CalendarTime {
        self.time
    }

    /// Virtual seconds per real second; zero while paused.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether time is frozen.
    pub fn is_paused(&self) -> bool {
        self.speed <= 0.0
    }

    /// Real time accumulated towards the next tick, in virtual seconds.
    pub fn pending(&self) -> f32 {
        self.accumulated
    }

    /// Change the speed. While paused the new speed applies on resume.
    pub fn set_speed(&mut self, speed: f32) {
        let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        if self.is_paused() {
            self.previous_speed = speed;
        } else {
            self.speed = speed;
        }
    }

    /// Freeze time. Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        if self.is_paused() {
            return false;
        }
        self.previous_speed = self.speed;
        self.speed = 0.0;
        true
    }

    /// Unfreeze time at the speed it had before pausing. Returns `false` if not paused.
    pub fn resume(&mut self) -> bool {
        if !self.is_paused() {
            return false;
        }
        self.speed = if self.previous_speed > 0.0 {
            self.previous_speed
        } else {
            1.0
        };
        true
    }

    /// Pause if running, resume if paused. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.is_paused()
    }

    /// Feed real elapsed seconds; returns the new calendar snapshot if a tick fired.
    ///
    /// Frames with a non-finite or non-positive duration are ignored.
    pub fn advance(&mut self, real_dt: f32) -> Option<CalendarTime> {
        if self.is_paused() || !real_dt.is_finite() || real_dt <= 0.0 {
            return None;
        }
        self.accumulated += real_dt * self.speed;
        if self.accumulated < SECONDS_PER_TICK {
            return None;
        }
        self.accumulated = (self.accumulated - SECONDS_PER_TICK).clamp(0.0, MAX_CARRY);
        self.time.add_second();
        Some(self.time)
    }

    /// Fire one tick immediately, regardless of speed or pause state.
    ///
    /// Used by headless runs that drive the simulation tick by tick.
    pub fn step(&mut self) -> CalendarTime {
        self.time.add_second();
        self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_fires_one_tick() {
        let mut driver = TimeDriver::default();
        let tick = driver.advance(1.0).unwrap();
        assert_eq!(tick.seconds_since_beginning, 1);
        assert_eq!(driver.time().seconds_since_beginning, 1);
    }

    #[test]
    fn partial_seconds_accumulate() {
        let mut driver = TimeDriver::default();
        assert!(driver.advance(0.5).is_none());
        assert!(driver.advance(0.5).is_some());
        assert!(driver.advance(0.75).is_none());
        assert!((driver.pending() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn large_step_fires_a_single_tick() {
        let mut driver = TimeDriver::default();
        assert_eq!(driver.advance(3.5).unwrap().seconds_since_beginning, 1);
        assert!(driver.pending() < SECONDS_PER_TICK);
        assert_eq!(driver.advance(0.01).unwrap().seconds_since_beginning, 2);
        assert!(driver.pending() < 0.1);
    }

    #[test]
    fn long_stall_fires_one_tick_and_caps_the_remainder() {
        let mut driver = TimeDriver::default();
        assert_eq!(driver.advance(1e8).unwrap().seconds_since_beginning, 1);
        assert!(driver.pending() < SECONDS_PER_TICK);

        assert!(driver.advance(f32::INFINITY).is_none());
        assert_eq!(driver.time().seconds_since_beginning, 1);

        driver.set_speed(f32::MAX);
        assert!(driver.advance(1e30).is_some());
        assert!(driver.pending().is_finite());
        assert!(driver.pending() < SECONDS_PER_TICK);
    }

    #[test]
    fn nan_frame_is_ignored() {
        let mut driver = TimeDriver::default();
        assert!(driver.advance(f32::NAN).is_none());
        assert!(driver.pending().abs() < f32::EPSILON);
        assert!(driver.advance(1.0).is_some());
        assert_eq!(driver.time().seconds_since_beginning, 1);
    }

    #[test]
    fn non_finite_speed_pauses() {
        let mut driver = TimeDriver::default();
        driver.set_speed(f32::NAN);
        assert!(driver.is_paused());
        assert!(driver.advance(1.0).is_none());
        assert!(driver.pending().abs() < f32::EPSILON);
    }

    #[test]
    fn paused_fires_nothing_and_resume_does_not_catch_up() {
        let mut driver = TimeDriver::default();
        driver.advance(0.25);
        assert!(driver.pause());
        assert!(!driver.pause());
        assert!(driver.advance(10.0).is_none());
        assert!((driver.pending() - 0.25).abs() < 1e-6);

        assert!(driver.resume());
        assert!(!driver.resume());
        assert!(driver.advance(1.0).is_some());
        assert_eq!(driver.time().seconds_since_beginning, 1);
    }

    #[test]
    fn toggle_pause_restores_previous_speed() {
        let mut driver = TimeDriver::default();
        driver.set_speed(2.0);
        assert!(driver.toggle_pause());
        assert!(driver.speed().abs() < f32::EPSILON);
        assert!(!driver.toggle_pause());
        assert!((driver.speed() - 2.0).abs() < f32::EPSILON);
        assert!(driver.advance(0.5).is_some());
    }

    #[test]
    fn speed_change_while_paused_applies_on_resume() {
        let mut driver = TimeDriver::default();
        driver.pause();
        driver.set_speed(4.0);
        assert!(driver.is_paused());
        driver.resume();
        assert!((driver.speed() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn step_ignores_pause() {
        let mut driver = TimeDriver::default();
        driver.pause();
        assert_eq!(driver.step().seconds_since_beginning, 1);
    }
}
