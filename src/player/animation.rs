//! Fixed-step animation loop
//!
//! The host calls `frame` once per display refresh with a monotonic
//! timestamp. Real time is accumulated and converted into fixed simulation
//! steps, so the simulation rate doesn't depend on the refresh rate.

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MAX_FRAME_DT;

/// Cloneable stop flag, usable from inside a step callback
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }

    fn resume(&self) {
        self.0.set(false);
    }
}

/// Accumulator turning frame timestamps into fixed steps
#[derive(Debug)]
pub struct AnimationLoop {
    step_dt: f32,
    max_substeps: u32,
    /// Carried-over time not yet consumed by a step
    accumulator: f32,
    last_frame: Option<f64>,
    stop: StopHandle,
}

impl AnimationLoop {
    pub fn new(step_dt: f32, max_substeps: u32) -> Self {
        Self {
            step_dt,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            last_frame: None,
            stop: StopHandle::default(),
        }
    }

    pub fn step_dt(&self) -> f32 {
        self.step_dt
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Resume with a fresh baseline; time spent stopped is not replayed
    pub fn restart(&mut self) {
        self.accumulator = 0.0;
        self.last_frame = None;
        self.stop.resume();
    }

    /// Interpolation alpha between the last step and the next (0.0 to 1.0)
    pub fn alpha(&self) -> f32 {
        if self.step_dt > 0.0 {
            (self.accumulator / self.step_dt).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Feed one display frame. Returns the number of steps that ran.
    pub fn frame<F>(&mut self, now_secs: f64, mut step: F) -> u32
    where
        F: FnMut(f32),
    {
        if !self.is_running() {
            return 0;
        }

        let Some(last) = self.last_frame.replace(now_secs) else {
            return 0;
        };

        // Clocks that jump backwards count as no time passing
        let elapsed = ((now_secs - last) as f32).clamp(0.0, MAX_FRAME_DT);
        self.accumulator += elapsed;

        if self.step_dt.is_nan() || self.step_dt <= 0.0 {
            self.accumulator = 0.0;
            return 0;
        }

        let mut substeps = 0;
        while self.accumulator >= self.step_dt && substeps < self.max_substeps {
            if self.stop.is_stopped() {
                break;
            }
            step(self.step_dt);
            self.accumulator -= self.step_dt;
            substeps += 1;
        }

        // Don't let a backlog build up across frames
        self.accumulator = self.accumulator.min(self.step_dt * self.max_substeps as f32);
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.25;

    #[test]
    fn test_first_frame_sets_baseline() {
        let mut anim = AnimationLoop::new(DT, 8);
        let mut steps = 0;
        assert_eq!(anim.frame(100.0, |_| steps += 1), 0);
        assert_eq!(steps, 0);
        assert_eq!(anim.frame(100.25, |_| steps += 1), 1);
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_accumulates_partial_frames() {
        let mut anim = AnimationLoop::new(DT, 8);
        anim.frame(0.0, |_| {});
        assert_eq!(anim.frame(0.125, |_| {}), 0);
        assert_eq!(anim.alpha(), 0.5);
        assert_eq!(anim.frame(0.25, |_| {}), 1);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut anim = AnimationLoop::new(0.0625, 8);
        anim.frame(0.0, |_| {});
        // 10 seconds away from the tab, only MAX_FRAME_DT is replayed
        let steps = anim.frame(10.0, |dt| assert_eq!(dt, 0.0625));
        assert_eq!(steps, 4);
    }

    #[test]
    fn test_substeps_capped() {
        let mut anim = AnimationLoop::new(0.015625, 2);
        anim.frame(0.0, |_| {});
        assert_eq!(anim.frame(0.25, |_| {}), 2);
    }

    #[test]
    fn test_stop_from_callback_finishes_step() {
        let mut anim = AnimationLoop::new(0.0625, 8);
        let handle = anim.stop_handle();
        anim.frame(0.0, |_| {});

        let mut steps = 0;
        anim.frame(0.25, |_| {
            steps += 1;
            handle.stop();
        });
        assert_eq!(steps, 1);
        assert!(!anim.is_running());
        assert_eq!(anim.frame(0.5, |_| steps += 1), 0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn test_restart_resets_baseline() {
        let mut anim = AnimationLoop::new(DT, 8);
        anim.frame(0.0, |_| {});
        anim.frame(0.125, |_| {});
        anim.stop();

        anim.restart();
        assert!(anim.is_running());
        assert_eq!(anim.alpha(), 0.0);
        // Fresh baseline: no catch-up for the stopped period
        assert_eq!(anim.frame(50.0, |_| {}), 0);
        assert_eq!(anim.frame(50.25, |_| {}), 1);
    }

    #[test]
    fn test_backwards_clock_runs_nothing() {
        let mut anim = AnimationLoop::new(DT, 8);
        anim.frame(5.0, |_| {});
        assert_eq!(anim.frame(4.0, |_| {}), 0);
        assert_eq!(anim.alpha(), 0.0);
    }
}
