//! Click-to-toggle animation state machine
//!
//! Two states: Stopped and Running. Running owns exactly one periodic tick
//! source; stopping cancels it synchronously so no tick fires afterwards.

use std::time::Duration;

use crate::sim::{TickReport, Wheel};

/// Whether the wheel is currently being animated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Drawn once, no ticks
    Stopped,
    /// Periodic ticks firing
    Running,
}

/// A live periodic tick source.
///
/// `cancel` must not return until the source can no longer fire. It may
/// wait for an in-flight tick, so never call it while holding a lock that
/// the tick itself takes.
pub trait IntervalHandle {
    fn cancel(self);
}

/// Post-tick "state changed, please redraw" notification
pub trait WheelObserver {
    fn wheel_changed(&mut self, wheel: &Wheel, report: &TickReport);
}

impl<F> WheelObserver for F
where
    F: FnMut(&Wheel, &TickReport),
{
    fn wheel_changed(&mut self, wheel: &Wheel, report: &TickReport) {
        self(wheel, report)
    }
}

/// Advance the wheel one tick and notify the observer
pub fn step(wheel: &mut Wheel, observer: &mut dyn WheelObserver) -> TickReport {
    let report = wheel.tick();
    observer.wheel_changed(wheel, &report);
    report
}

/// Owns the tick source while running
pub struct Animation<H: IntervalHandle> {
    period: Duration,
    handle: Option<H>,
}

impl<H: IntervalHandle> Animation<H> {
    /// New animation in the Stopped state
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn state(&self) -> AnimationState {
        if self.handle.is_some() {
            AnimationState::Running
        } else {
            AnimationState::Stopped
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start ticking using `start` to create the source. No-op when already
    /// running. A failed start leaves the animation Stopped.
    pub fn start_with<E>(
        &mut self,
        start: impl FnOnce(Duration) -> Result<H, E>,
    ) -> Result<AnimationState, E> {
        if self.handle.is_none() {
            self.handle = Some(start(self.period)?);
            log::info!("Animation started ({} ms period)", self.period.as_millis());
        }
        Ok(AnimationState::Running)
    }

    /// Cancel the tick source, if any
    pub fn stop(&mut self) -> AnimationState {
        if let Some(handle) = self.handle.take() {
            handle.cancel();
            log::info!("Animation stopped");
        }
        AnimationState::Stopped
    }

    /// Flip between Stopped and Running
    pub fn toggle_with<E>(
        &mut self,
        start: impl FnOnce(Duration) -> Result<H, E>,
    ) -> Result<AnimationState, E> {
        match self.state() {
            AnimationState::Running => Ok(self.stop()),
            AnimationState::Stopped => self.start_with(start),
        }
    }
}

impl<H: IntervalHandle> Drop for Animation<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Observer that logs a wheel summary every `every` ticks
pub struct TickLogger {
    every: u64,
}

impl TickLogger {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl WheelObserver for TickLogger {
    fn wheel_changed(&mut self, wheel: &Wheel, report: &TickReport) {
        if wheel.time_ticks() % self.every == 0 {
            log::debug!(
                "tick {}: mass {:.1}, torque {:.3}, fill target {:?}, lost {:.1}",
                wheel.time_ticks(),
                wheel.total_mass(),
                report.angular_force,
                report.fill_target,
                report.drained_out + report.clamped
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::WheelConfig;
    use std::cell::Cell;
    use std::rc::Rc;

    struct ManualInterval {
        cancelled: Rc<Cell<bool>>,
    }

    impl IntervalHandle for ManualInterval {
        fn cancel(self) {
            self.cancelled.set(true);
        }
    }

    fn manual(cancelled: &Rc<Cell<bool>>) -> impl FnOnce(Duration) -> Result<ManualInterval, ()> {
        let cancelled = cancelled.clone();
        move |_| Ok(ManualInterval { cancelled })
    }

    #[test]
    fn test_starts_stopped() {
        let animation: Animation<ManualInterval> = Animation::new(Duration::from_millis(33));
        assert_eq!(animation.state(), AnimationState::Stopped);
    }

    #[test]
    fn test_toggle_starts_and_cancels() {
        let cancelled = Rc::new(Cell::new(false));
        let mut animation = Animation::new(Duration::from_millis(33));

        assert_eq!(animation.toggle_with(manual(&cancelled)), Ok(AnimationState::Running));
        assert!(animation.is_running());
        assert!(!cancelled.get());

        assert_eq!(animation.toggle_with(manual(&cancelled)), Ok(AnimationState::Stopped));
        assert!(!animation.is_running());
        assert!(cancelled.get());
    }

    #[test]
    fn test_start_while_running_keeps_one_source() {
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));
        let mut animation = Animation::new(Duration::from_millis(33));

        animation.start_with(manual(&first)).unwrap();
        let mut started_again = false;
        animation
            .start_with(|_| {
                started_again = true;
                Ok::<_, ()>(ManualInterval {
                    cancelled: second.clone(),
                })
            })
            .unwrap();
        assert!(!started_again);

        animation.stop();
        assert!(first.get());
    }

    #[test]
    fn test_failed_start_stays_stopped() {
        let mut animation: Animation<ManualInterval> = Animation::new(Duration::from_millis(33));
        assert_eq!(animation.start_with(|_| Err("no timer")), Err("no timer"));
        assert_eq!(animation.state(), AnimationState::Stopped);
    }

    #[test]
    fn test_drop_cancels() {
        let cancelled = Rc::new(Cell::new(false));
        {
            let mut animation = Animation::new(Duration::from_millis(33));
            animation.start_with(manual(&cancelled)).unwrap();
        }
        assert!(cancelled.get());
    }

    #[test]
    fn test_step_notifies_observer() {
        let mut wheel = Wheel::new(WheelConfig {
            num_buckets: 4,
            seed: 1,
            ..Default::default()
        })
        .unwrap();
        let mut seen = Vec::new();
        let mut observer = |w: &Wheel, r: &TickReport| seen.push((w.time_ticks(), r.inflow));

        step(&mut wheel, &mut observer);
        step(&mut wheel, &mut observer);

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].0, 2);
    }
}
