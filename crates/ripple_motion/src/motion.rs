//! Motion controller
//!
//! A [`Motion`] owns the channels of one animated value. Goal methods
//! ([`Motion::spring`], [`Motion::tween`], ...) install solvers on the
//! channels a partial goal names; [`Motion::step`] advances every unfinished
//! channel, rebuilds the value and notifies subscribers.
//!
//! `Motion` is a handle: clones share the same state, and the handle stays
//! valid inside its own callbacks. Nothing is borrowed while subscribers or
//! teardowns run, so callbacks may read the motion, retarget it, stop it or
//! destroy it. Custom solver functions are the exception and must not touch
//! the motion that steps them.

use crate::animatable::MotionGoal;
use crate::channel::{ChannelKey, ChannelPatch, ChannelSnapshot, ChannelState, Teardown};
use crate::config::{LinearOptions, SpringOptions, TweenOptions};
use crate::error::{MotionError, Result};
use crate::goal::GoalShape;
use crate::solver::Solver;
use ripple_core::clock::{Clock, ClockSubscription, Heartbeat};
use ripple_core::subscribers::Subscribers;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Step subscriber: receives the new value and the frame delta
pub type StepCallback<T> = dyn FnMut(&T, f32);

/// Completion subscriber: receives the settled value
pub type CompleteCallback<T> = dyn FnMut(&T);

/// Undoes one registration
///
/// Dropping a `Cleanup` does nothing; call [`Cleanup::run`].
pub struct Cleanup(Option<Box<dyn FnOnce()>>);

impl Cleanup {
    fn new<F: FnOnce() + 'static>(cleanup: F) -> Self {
        Self(Some(Box::new(cleanup)))
    }

    pub fn run(mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cleanup").field(&self.0.is_some()).finish()
    }
}

/// Construction options for [`Motion::with_options`]
#[derive(Clone, Default)]
pub struct MotionOptions {
    /// Frame source; the thread's [`Heartbeat::current`] when unset
    pub clock: Option<Rc<dyn Clock>>,
    /// Subscribe to the clock immediately
    pub start: bool,
}

impl MotionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Rc::new(clock));
        self
    }

    pub fn start(mut self, start: bool) -> Self {
        self.start = start;
        self
    }
}

impl fmt::Debug for MotionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionOptions")
            .field("clock", &self.clock.is_some())
            .field("start", &self.start)
            .finish()
    }
}

struct Channel {
    key: ChannelKey,
    state: ChannelState,
    solver: Option<Solver>,
}

struct MotionState<T: MotionGoal> {
    shape: GoalShape,
    template: T,
    channels: Vec<Channel>,
    clock: Rc<dyn Clock>,
    subscription: Option<ClockSubscription>,
    step_subscribers: Subscribers<StepCallback<T>>,
    complete_subscribers: Subscribers<CompleteCallback<T>>,
    /// Completion as of the last mutation or step
    complete: bool,
    dispatching: bool,
    disposed: bool,
}

impl<T: MotionGoal> MotionState<T> {
    fn ensure_alive(&self) -> Result<()> {
        if self.disposed {
            Err(MotionError::Disposed)
        } else {
            Ok(())
        }
    }

    fn value(&self) -> T {
        let values: SmallVec<[f32; 8]> = self.channels.iter().map(|c| c.state.value).collect();
        T::from_goal(self.shape.recompose(&values), &self.template)
    }

    fn velocity(&self) -> T {
        let velocities: SmallVec<[f32; 8]> = self
            .channels
            .iter()
            .map(|c| c.state.velocity_or_zero())
            .collect();
        T::from_goal(self.shape.recompose(&velocities), &self.template)
    }

    fn all_complete(&self) -> bool {
        self.channels.iter().all(|c| c.state.complete)
    }

    fn refresh_completion(&mut self) {
        self.complete = self.all_complete();
    }

    fn index_of(&self, key: &ChannelKey) -> Result<usize> {
        self.shape
            .index_of(key)
            .ok_or_else(|| MotionError::InvalidChannel(key.clone()))
    }
}

impl<T: MotionGoal> Drop for MotionState<T> {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

/// Animated value of type `T`
///
/// ```rust
/// use ripple_motion::{Motion, SpringOptions};
///
/// let motion = Motion::new(0.0f32);
/// motion.spring(100.0, &SpringOptions::new()).unwrap();
///
/// for _ in 0..300 {
///     motion.step(1.0 / 60.0).unwrap();
/// }
/// assert!(motion.is_complete());
/// assert_eq!(motion.get(), 100.0);
/// ```
pub struct Motion<T: MotionGoal = f32> {
    state: Rc<RefCell<MotionState<T>>>,
}

impl<T: MotionGoal> Motion<T> {
    /// A motion at rest on `initial`, driven by the thread's default clock
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, MotionOptions::default())
    }

    pub fn with_options(initial: T, options: MotionOptions) -> Self {
        let (shape, values) = GoalShape::of(&initial.to_goal());
        let channels = shape
            .keys()
            .iter()
            .zip(values)
            .map(|(key, value)| Channel {
                key: key.clone(),
                state: ChannelState::at_rest(value),
                solver: None,
            })
            .collect();
        let clock = options
            .clock
            .unwrap_or_else(|| Rc::new(Heartbeat::current()) as Rc<dyn Clock>);

        let motion = Self {
            state: Rc::new(RefCell::new(MotionState {
                shape,
                template: initial,
                channels,
                clock,
                subscription: None,
                step_subscribers: Subscribers::new(),
                complete_subscribers: Subscribers::new(),
                complete: true,
                dispatching: false,
                disposed: false,
            })),
        };
        if options.start {
            motion.attach_clock();
        }
        motion
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current value
    pub fn get(&self) -> T {
        self.state.borrow().value()
    }

    /// Current velocity, shaped like the value; zero where untracked
    pub fn get_velocity(&self) -> T {
        self.state.borrow().velocity()
    }

    /// True when every channel is complete
    pub fn is_complete(&self) -> bool {
        self.state.borrow().all_complete()
    }

    /// Channel keys in decomposition order
    pub fn channels(&self) -> Vec<ChannelKey> {
        self.state.borrow().shape.keys().to_vec()
    }

    pub fn channel(&self, key: &ChannelKey) -> Option<ChannelSnapshot> {
        let state = self.state.borrow();
        let index = state.shape.index_of(key)?;
        state.channels.get(index).map(|c| c.state.snapshot())
    }

    /// Whether the motion is subscribed to its clock
    pub fn is_running(&self) -> bool {
        self.state.borrow().subscription.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.state.borrow().disposed
    }

    // ========================================================================
    // Direct writes
    // ========================================================================

    /// Overwrite the values of the named channels
    ///
    /// Same as [`Motion::immediate`]: pending teardowns run, the active
    /// solver is dropped and the channels settle at rest on the new value.
    /// Use [`Motion::patch`] to move a value without touching its solver.
    pub fn set(&self, partial: T::Partial) -> Result<()> {
        self.immediate(partial)
    }

    /// Add to the velocity of the named channels
    ///
    /// Only channels driven by a velocity-bearing solver respond; for the
    /// rest this is a no-op.
    pub fn impulse(&self, partial: T::Partial) -> Result<()> {
        let goal = T::partial_to_goal(partial);
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.ensure_alive()?;

        let assignments = state.shape.decompose(&goal)?;
        if let Some((_, delta)) = assignments.iter().find(|(_, delta)| !delta.is_finite()) {
            return Err(MotionError::invalid("impulse", format!("must be finite, got {delta}")));
        }
        for (index, delta) in assignments {
            let channel = &mut state.channels[index];
            match &channel.solver {
                Some(solver) if solver.tracks_velocity() => {
                    channel.state.velocity = Some(channel.state.velocity_or_zero() + delta);
                    if delta != 0.0 {
                        channel.state.complete = false;
                    }
                }
                _ => tracing::trace!(channel = %channel.key, "impulse ignored without a velocity model"),
            }
        }
        state.refresh_completion();
        Ok(())
    }

    /// Raw state surgery; bypasses solvers and teardowns
    ///
    /// Every key is validated before anything is written.
    pub fn patch(&self, patches: impl IntoIterator<Item = (ChannelKey, ChannelPatch)>) -> Result<()> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;
        state.ensure_alive()?;

        let resolved = patches
            .into_iter()
            .map(|(key, patch)| state.index_of(&key).map(|index| (index, patch)))
            .collect::<Result<SmallVec<[(usize, ChannelPatch); 4]>>>()?;
        for (index, patch) in resolved {
            patch.apply(&mut state.channels[index].state);
        }
        state.refresh_completion();
        Ok(())
    }

    // ========================================================================
    // Goals
    // ========================================================================

    /// Install caller-built solvers on the named channels
    pub fn to(&self, assignments: impl IntoIterator<Item = (ChannelKey, Solver)>) -> Result<()> {
        let resolved = {
            let state = self.state.borrow();
            state.ensure_alive()?;
            let resolved = assignments
                .into_iter()
                .map(|(key, solver)| state.index_of(&key).map(|index| (index, solver)))
                .collect::<Result<Vec<_>>>()?;
            resolved
        };
        self.install_many(resolved)
    }

    /// Install a solver built by `factory` on every channel
    pub fn to_all(&self, mut factory: impl FnMut(&ChannelKey) -> Result<Solver>) -> Result<()> {
        let keys = {
            let state = self.state.borrow();
            state.ensure_alive()?;
            state.shape.keys().to_vec()
        };
        let assignments = keys
            .iter()
            .enumerate()
            .map(|(index, key)| factory(key).map(|solver| (index, solver)))
            .collect::<Result<Vec<_>>>()?;
        self.install_many(assignments)
    }

    /// Jump the named channels to their targets
    pub fn immediate(&self, partial: T::Partial) -> Result<()> {
        self.install_goal(partial, Solver::immediate)
    }

    pub fn linear(&self, partial: T::Partial, options: &LinearOptions) -> Result<()> {
        self.install_goal(partial, |target| Solver::linear(target, options))
    }

    pub fn spring(&self, partial: T::Partial, options: &SpringOptions) -> Result<()> {
        self.install_goal(partial, |target| Solver::spring(target, options))
    }

    pub fn tween(&self, partial: T::Partial, options: &TweenOptions) -> Result<()> {
        self.install_goal(partial, |target| Solver::tween(target, options))
    }

    fn install_goal(
        &self,
        partial: T::Partial,
        build: impl Fn(f32) -> Result<Solver>,
    ) -> Result<()> {
        let goal = T::partial_to_goal(partial);
        let targets = {
            let state = self.state.borrow();
            state.ensure_alive()?;
            let targets = state.shape.decompose(&goal)?;
            targets
        };
        let assignments = targets
            .into_iter()
            .map(|(index, target)| build(target).map(|solver| (index, solver)))
            .collect::<Result<Vec<_>>>()?;
        self.install_many(assignments)
    }

    fn install_many(&self, assignments: Vec<(usize, Solver)>) -> Result<()> {
        if assignments.is_empty() {
            return Ok(());
        }

        let teardowns: Vec<Teardown> = {
            let mut state = self.state.borrow_mut();
            state.ensure_alive()?;
            let teardowns = assignments
                .iter()
                .filter_map(|(index, _)| state.channels[*index].state.teardown.take())
                .collect();
            teardowns
        };
        for teardown in teardowns {
            teardown();
        }

        let mut replaced = Vec::with_capacity(assignments.len());
        {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            // A teardown may have destroyed the motion
            state.ensure_alive()?;

            for (index, mut solver) in assignments {
                let channel = &mut state.channels[index];
                solver.install(&mut channel.state);
                tracing::trace!(
                    channel = %channel.key,
                    solver = solver.name(),
                    target = ?solver.target(),
                    "solver installed"
                );
                let solver = if solver.is_transient() { None } else { Some(solver) };
                replaced.push(std::mem::replace(&mut channel.solver, solver));
            }
            state.refresh_completion();
        }
        drop(replaced);
        Ok(())
    }

    // ========================================================================
    // Stepping
    // ========================================================================

    /// Advance by `dt` seconds and notify subscribers
    ///
    /// A call made from inside one of this motion's own subscribers is
    /// ignored and returns the current value.
    pub fn step(&self, dt: f32) -> Result<T> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(MotionError::invalid(
                "dt",
                format!("must be non-negative and finite, got {dt}"),
            ));
        }

        let (value, step_subscribers, complete_subscribers) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            state.ensure_alive()?;
            if state.dispatching {
                tracing::warn!("Motion::step called from its own subscriber; ignoring");
                return Ok(state.value());
            }

            for channel in state.channels.iter_mut() {
                if channel.state.complete {
                    continue;
                }
                if let Some(solver) = channel.solver.as_mut() {
                    solver.step(&channel.key, &mut channel.state, dt);
                }
            }

            let complete = state.all_complete();
            let completed_now = complete && !state.complete;
            state.complete = complete;
            state.dispatching = true;

            let complete_subscribers = if completed_now {
                tracing::debug!(channels = state.channels.len(), "motion complete");
                Some(state.complete_subscribers.snapshot())
            } else {
                None
            };
            (state.value(), state.step_subscribers.snapshot(), complete_subscribers)
        };

        for (id, callback) in step_subscribers {
            if !self.state.borrow().step_subscribers.contains(id) {
                continue;
            }
            (*callback.borrow_mut())(&value, dt);
        }
        for (id, callback) in complete_subscribers.into_iter().flatten() {
            if !self.state.borrow().complete_subscribers.contains(id) {
                continue;
            }
            (*callback.borrow_mut())(&value);
        }

        self.state.borrow_mut().dispatching = false;
        Ok(value)
    }

    /// Subscribe to the clock; calling it again while running does nothing
    ///
    /// The returned cleanup stops the motion.
    pub fn start(&self) -> Result<Cleanup> {
        self.state.borrow().ensure_alive()?;
        self.attach_clock();

        let weak = Rc::downgrade(&self.state);
        Ok(Cleanup::new(move || {
            if let Some(state) = weak.upgrade() {
                Motion { state }.stop();
            }
        }))
    }

    fn attach_clock(&self) {
        let clock = {
            let state = self.state.borrow();
            if state.subscription.is_some() {
                return;
            }
            Rc::clone(&state.clock)
        };

        let weak: Weak<RefCell<MotionState<T>>> = Rc::downgrade(&self.state);
        let subscription = clock.subscribe(Box::new(move |dt: f32| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            if let Err(err) = (Motion { state }).step(dt) {
                tracing::warn!(%err, "clock-driven step failed");
            }
        }));
        self.state.borrow_mut().subscription = Some(subscription);
        tracing::trace!("motion started");
    }

    /// Unsubscribe from the clock
    pub fn stop(&self) {
        let subscription = self.state.borrow_mut().subscription.take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            tracing::trace!("motion stopped");
        }
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Call `callback` with the value after every step
    pub fn on_step<F>(&self, callback: F) -> Result<Cleanup>
    where
        F: FnMut(&T, f32) + 'static,
    {
        let id = {
            let mut state = self.state.borrow_mut();
            state.ensure_alive()?;
            state.step_subscribers.insert(Box::new(callback))
        };
        let weak = Rc::downgrade(&self.state);
        Ok(Cleanup::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().step_subscribers.remove(id);
            }
        }))
    }

    /// Call `callback` each time a step brings every channel to completion
    pub fn on_complete<F>(&self, callback: F) -> Result<Cleanup>
    where
        F: FnMut(&T) + 'static,
    {
        let id = {
            let mut state = self.state.borrow_mut();
            state.ensure_alive()?;
            state.complete_subscribers.insert(Box::new(callback))
        };
        let weak = Rc::downgrade(&self.state);
        Ok(Cleanup::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().complete_subscribers.remove(id);
            }
        }))
    }

    /// Stop, run every pending teardown and drop all solvers and
    /// subscribers
    ///
    /// The last value stays readable. Calling it again does nothing.
    pub fn destroy(&self) {
        let (subscription, teardowns, solvers, step_subscribers, complete_subscribers) = {
            let mut guard = self.state.borrow_mut();
            let state = &mut *guard;
            if state.disposed {
                return;
            }
            state.disposed = true;

            let mut teardowns: Vec<Teardown> = Vec::new();
            let mut solvers: Vec<Solver> = Vec::new();
            for channel in state.channels.iter_mut() {
                teardowns.extend(channel.state.teardown.take());
                solvers.extend(channel.solver.take());
            }
            (
                state.subscription.take(),
                teardowns,
                solvers,
                std::mem::take(&mut state.step_subscribers),
                std::mem::take(&mut state.complete_subscribers),
            )
        };

        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        for teardown in teardowns {
            teardown();
        }
        drop((solvers, step_subscribers, complete_subscribers));
        tracing::debug!("motion destroyed");
    }
}

impl<T: MotionGoal> Clone for Motion<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T: MotionGoal> fmt::Debug for Motion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Motion")
            .field("channels", &state.channels.len())
            .field("complete", &state.all_complete())
            .field("running", &state.subscription.is_some())
            .field("disposed", &state.disposed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Field, Goal};
    use std::cell::Cell;

    fn manual<T: MotionGoal>(initial: T) -> Motion<T> {
        Motion::with_options(initial, MotionOptions::new().clock(Heartbeat::new()))
    }

    #[test]
    fn test_new_motion_is_at_rest() {
        let motion = manual(3.0f32);
        assert_eq!(motion.get(), 3.0);
        assert_eq!(motion.get_velocity(), 0.0);
        assert!(motion.is_complete());
        assert!(!motion.is_running());
        assert_eq!(motion.channels(), vec![ChannelKey::Value]);
    }

    #[test]
    fn test_set_drops_active_solver() {
        let motion = manual(0.0f32);
        motion.linear(10.0, &LinearOptions::new().speed(1.0)).unwrap();
        motion.step(1.0).unwrap();
        assert_eq!(motion.get(), 1.0);

        motion.set(8.0).unwrap();
        assert!(motion.is_complete());
        assert_eq!(motion.get_velocity(), 0.0);
        motion.step(1.0).unwrap();
        assert_eq!(motion.get(), 8.0);
    }

    #[test]
    fn test_set_settles_a_moving_spring() {
        let motion = manual(0.0f32);
        motion.spring(100.0, &SpringOptions::new()).unwrap();
        for _ in 0..5 {
            motion.step(1.0 / 60.0).unwrap();
        }
        assert!(motion.get_velocity() > 0.0);

        motion.set(50.0).unwrap();
        let snapshot = motion.channel(&ChannelKey::Value).unwrap();
        assert_eq!(snapshot.value, 50.0);
        assert_eq!(snapshot.velocity, Some(0.0));
        assert!(snapshot.complete);

        assert_eq!(motion.step(1.0 / 60.0).unwrap(), 50.0);
        assert_eq!(motion.get_velocity(), 0.0);
    }

    #[test]
    fn test_set_rejects_non_finite() {
        let motion = manual(1.0f32);
        assert!(matches!(
            motion.set(f32::NAN),
            Err(MotionError::InvalidParameter { name: "target", .. })
        ));
        assert_eq!(motion.get(), 1.0);
    }

    #[test]
    fn test_set_on_idle_channel_stays_complete() {
        let motion = manual(0.0f32);
        motion.set(5.0).unwrap();
        assert!(motion.is_complete());
        assert_eq!(motion.get(), 5.0);
    }

    #[test]
    fn test_immediate_leaves_channel_idle() {
        let motion = manual(vec![0.0f32, 0.0]);
        motion.immediate(vec![None, Some(4.0)]).unwrap();
        assert_eq!(motion.get(), vec![0.0, 4.0]);
        assert!(motion.is_complete());

        // Idle channels ignore impulses
        motion.impulse(vec![None, Some(10.0)]).unwrap();
        assert_eq!(motion.get_velocity(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_impulse_ignored_by_tween() {
        let motion = manual(0.0f32);
        motion.tween(1.0, &TweenOptions::new()).unwrap();
        motion.impulse(5.0).unwrap();
        assert_eq!(motion.get_velocity(), 0.0);
    }

    #[test]
    fn test_failed_goal_changes_nothing() {
        let motion = manual(Goal::mapping([("x", 0.0), ("y", 0.0)]));
        let err = motion
            .spring(Goal::mapping([("x", 1.0), ("q", 1.0)]), &SpringOptions::new())
            .unwrap_err();
        assert_eq!(err, MotionError::InvalidChannel(ChannelKey::key("q")));
        assert!(motion.is_complete());

        let err = motion
            .linear(Goal::mapping([("x", 1.0)]), &LinearOptions::new().speed(-1.0))
            .unwrap_err();
        assert!(matches!(err, MotionError::InvalidParameter { name: "speed", .. }));
        assert!(motion.is_complete());
    }

    #[test]
    fn test_install_runs_previous_teardown() {
        let motion = manual(0.0f32);
        let torn_down = Rc::new(Cell::new(0));

        let counter = torn_down.clone();
        motion
            .to([(
                ChannelKey::Value,
                Solver::custom(move |_: &ChannelKey, state: &mut ChannelState, _: f32| {
                    let counter = counter.clone();
                    state.teardown = Some(Box::new(move || counter.set(counter.get() + 1)));
                }),
            )])
            .unwrap();
        motion.step(0.1).unwrap();
        assert_eq!(torn_down.get(), 0);

        motion.immediate(2.0).unwrap();
        assert_eq!(torn_down.get(), 1);
        assert_eq!(motion.get(), 2.0);
    }

    #[test]
    fn test_set_runs_pending_teardown_once() {
        let motion = manual(0.0f32);
        let torn_down = Rc::new(Cell::new(0));

        let counter = torn_down.clone();
        motion
            .to([(
                ChannelKey::Value,
                Solver::custom(move |_: &ChannelKey, state: &mut ChannelState, _: f32| {
                    let counter = counter.clone();
                    state.teardown = Some(Box::new(move || counter.set(counter.get() + 1)));
                }),
            )])
            .unwrap();
        motion.step(0.1).unwrap();

        motion.set(4.0).unwrap();
        motion.set(5.0).unwrap();
        motion.destroy();
        assert_eq!(torn_down.get(), 1);
        assert_eq!(motion.get(), 5.0);
    }

    #[test]
    fn test_to_all_builds_per_channel() {
        let motion = manual([0.0f32, 0.0, 0.0]);
        motion
            .to_all(|key: &ChannelKey| match key {
                ChannelKey::Index(i) => Solver::immediate(*i as f32 * 10.0),
                _ => Solver::immediate(0.0),
            })
            .unwrap();
        assert_eq!(motion.get(), [0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_to_rejects_unknown_channel() {
        let motion = manual(0.0f32);
        let err = motion
            .to([(ChannelKey::Index(0), Solver::immediate(1.0).unwrap())])
            .unwrap_err();
        assert_eq!(err, MotionError::InvalidChannel(ChannelKey::Index(0)));
    }

    #[test]
    fn test_patch_is_all_or_nothing() {
        let motion = manual(Goal::Sequence(vec![Field::Number(1.0), Field::Number(2.0)]));
        let err = motion
            .patch([
                (ChannelKey::Index(0), ChannelPatch::default().value(9.0)),
                (ChannelKey::Index(5), ChannelPatch::default().value(9.0)),
            ])
            .unwrap_err();
        assert_eq!(err, MotionError::InvalidChannel(ChannelKey::Index(5)));
        assert_eq!(motion.get(), Goal::sequence([1.0, 2.0]));

        motion
            .patch([(ChannelKey::Index(1), ChannelPatch::default().velocity(3.0).complete(false))])
            .unwrap();
        let snapshot = motion.channel(&ChannelKey::Index(1)).unwrap();
        assert_eq!(snapshot.velocity, Some(3.0));
        assert!(!snapshot.complete);
        assert!(!motion.is_complete());
    }

    #[test]
    fn test_step_rejects_negative_dt() {
        let motion = manual(0.0f32);
        assert!(matches!(
            motion.step(-1.0),
            Err(MotionError::InvalidParameter { name: "dt", .. })
        ));
    }

    #[test]
    fn test_subscriber_cleanup_removes_only_that_subscriber() {
        let motion = manual(0.0f32);
        let calls = Rc::new(RefCell::new(Vec::new()));

        let a = calls.clone();
        let first = motion.on_step(move |_: &f32, _: f32| a.borrow_mut().push("a")).unwrap();
        let b = calls.clone();
        let _second = motion.on_step(move |_: &f32, _: f32| b.borrow_mut().push("b")).unwrap();

        motion.step(0.0).unwrap();
        first.run();
        motion.step(0.0).unwrap();

        assert_eq!(*calls.borrow(), vec!["a", "b", "b"]);
    }

    #[test]
    fn test_destroy_freezes_value() {
        let motion = manual(0.0f32);
        motion.linear(10.0, &LinearOptions::new().speed(2.0)).unwrap();
        motion.step(1.0).unwrap();
        motion.destroy();
        motion.destroy();

        assert!(motion.is_destroyed());
        assert_eq!(motion.get(), 2.0);
        assert_eq!(motion.step(1.0), Err(MotionError::Disposed));
        assert_eq!(motion.set(1.0), Err(MotionError::Disposed));
        assert!(motion.on_complete(|_: &f32| {}).is_err());
        assert!(motion.start().is_err());
        motion.stop();
    }
}
