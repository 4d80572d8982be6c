//! Frame clocks
//!
//! A [`Clock`] is anything that can call back once per frame with the elapsed
//! time in seconds. Hosts usually own the real frame loop; [`Heartbeat`] is
//! the adapter they drive from it, either with an explicit delta
//! ([`Heartbeat::tick`]) or by letting it measure wall time
//! ([`Heartbeat::tick_elapsed`]).

use crate::subscribers::Subscribers;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Instant;

/// Per-frame callback receiving the delta time in seconds
pub type TickCallback = dyn FnMut(f32);

/// Source of per-frame delta-time callbacks
pub trait Clock {
    /// Call `callback` on every future frame until the returned handle is
    /// unsubscribed
    fn subscribe(&self, callback: Box<TickCallback>) -> ClockSubscription;
}

/// Handle returned by [`Clock::subscribe`]
///
/// Dropping the handle does NOT unsubscribe; call
/// [`ClockSubscription::unsubscribe`].
pub struct ClockSubscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl ClockSubscription {
    pub fn new<F: FnOnce() + 'static>(unsubscribe: F) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// A handle with nothing to release
    pub fn detached() -> Self {
        Self { unsubscribe: None }
    }

    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for ClockSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockSubscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

struct HeartbeatState {
    subscribers: Subscribers<TickCallback>,
    last_tick: Option<Instant>,
    frame: u64,
    ticking: bool,
}

thread_local! {
    static CURRENT: Heartbeat = Heartbeat::new();
}

/// A manually driven frame clock
///
/// Cloning yields another handle to the same clock.
#[derive(Clone)]
pub struct Heartbeat {
    state: Rc<RefCell<HeartbeatState>>,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(HeartbeatState {
                subscribers: Subscribers::new(),
                last_tick: None,
                frame: 0,
                ticking: false,
            })),
        }
    }

    /// The default clock for this thread
    pub fn current() -> Heartbeat {
        CURRENT.with(Heartbeat::clone)
    }

    /// Run one frame, passing `delta_time` (seconds) to every subscriber
    ///
    /// Subscribers may subscribe or unsubscribe from inside the callback.
    /// A nested `tick` from a subscriber is ignored.
    pub fn tick(&self, delta_time: f32) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            if state.ticking {
                tracing::warn!("Heartbeat::tick called re-entrantly; ignoring nested frame");
                return;
            }
            state.ticking = true;
            state.frame += 1;
            state.subscribers.snapshot()
        };

        for (id, callback) in snapshot {
            // Unsubscribed earlier in this frame
            if !self.state.borrow().subscribers.contains(id) {
                continue;
            }
            (*callback.borrow_mut())(delta_time);
        }

        self.state.borrow_mut().ticking = false;
    }

    /// Run one frame using the wall time since the previous call
    ///
    /// The first call measures nothing and ticks with zero. Returns the delta
    /// that was dispatched.
    pub fn tick_elapsed(&self) -> f32 {
        let now = Instant::now();
        let delta_time = {
            let mut state = self.state.borrow_mut();
            let dt = state
                .last_tick
                .map(|last| (now - last).as_secs_f32())
                .unwrap_or(0.0);
            state.last_tick = Some(now);
            dt
        };
        self.tick(delta_time);
        delta_time
    }

    /// Number of frames dispatched so far
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().subscribers.len()
    }
}

impl Default for Heartbeat {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for Heartbeat {
    fn subscribe(&self, callback: Box<TickCallback>) -> ClockSubscription {
        let id = self.state.borrow_mut().subscribers.insert(callback);
        tracing::trace!(?id, "heartbeat subscriber added");

        let state: Weak<RefCell<HeartbeatState>> = Rc::downgrade(&self.state);
        ClockSubscription::new(move || {
            if let Some(state) = state.upgrade() {
                if state.borrow_mut().subscribers.remove(id) {
                    tracing::trace!(?id, "heartbeat subscriber removed");
                }
            }
        })
    }
}

impl std::fmt::Debug for Heartbeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Heartbeat")
            .field("frame", &state.frame)
            .field("subscribers", &state.subscribers.len())
            .finish()
    }
}
