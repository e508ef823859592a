//! Generic finite state machine engine.
//!
//! A [`StateMachine`] holds a registry of states keyed by a small copyable
//! key type `K` (usually a fieldless enum) and at most one active key. States
//! are registered once with [`add_state`](StateMachine::add_state) and reused
//! across every transition; they are never rebuilt.
//!
//! # Architecture
//!
//! - **States implement [`State<K, C>`]:** `on_enter`, `tick`, `on_exit`.
//! - **Context is supplied per call.** The machine is generic over the state
//!   type only, while every call site passes the owner's context `C`. A state
//!   therefore receives a strongly typed view of its owner without holding a
//!   back-reference to the machine.
//! - **Transitions are returned, not pushed.** [`State::tick`] returns a
//!   [`Transition`]; the machine applies it through
//!   [`change_state`](StateMachine::change_state) after the tick.
//! - **No initial state.** The machine is idle until the first
//!   `change_state`. `change_state(None, ..)` returns it to idle.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum Light { Red, Green }
//!
//! struct Timed { after: f32, next: Light }
//!
//! impl State<Light, f32> for Timed {
//!     fn tick(&mut self, _dt: f32, elapsed: &mut f32) -> Transition<Light> {
//!         if *elapsed >= self.after { Transition::To(self.next) } else { Transition::None }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new();
//! fsm.add_state(Light::Red, Timed { after: 3.0, next: Light::Green });
//! fsm.add_state(Light::Green, Timed { after: 2.0, next: Light::Red });
//! fsm.change_state(Some(Light::Red), &mut 0.0);
//! ```
//!
//! # Related
//!
//! - [`crate::components::behavior`] – enemy `Idle`/`Chasing` states built on this engine

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Outcome of a state's tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition<K> {
    /// Stay in the current state.
    None,
    /// Leave the current state and enter `K`.
    To(K),
    /// Leave the current state and go idle.
    Clear,
}

/// A state of a [`StateMachine`] running against context `C`.
///
/// All hooks default to no-ops so trivial states only implement what they
/// need.
pub trait State<K, C: ?Sized> {
    /// Called once each time the machine enters this state.
    fn on_enter(&mut self, _ctx: &mut C) {}

    /// Called once per machine tick while this state is active.
    fn tick(&mut self, _dt: f32, _ctx: &mut C) -> Transition<K> {
        Transition::None
    }

    /// Called once each time the machine leaves this state.
    fn on_exit(&mut self, _ctx: &mut C) {}
}

impl<K, C: ?Sized, T: State<K, C> + ?Sized> State<K, C> for Box<T> {
    fn on_enter(&mut self, ctx: &mut C) {
        (**self).on_enter(ctx);
    }

    fn tick(&mut self, dt: f32, ctx: &mut C) -> Transition<K> {
        (**self).tick(dt, ctx)
    }

    fn on_exit(&mut self, ctx: &mut C) {
        (**self).on_exit(ctx);
    }
}

/// Active-state holder dispatching enter, tick and exit hooks.
///
/// # Fields
///
/// - `current` – the active key, `None` while idle
/// - `previous` – the key active before the last transition
/// - `time_in_state` – seconds accumulated by [`tick`](Self::tick) since the
///   last transition
#[derive(Clone)]
pub struct StateMachine<K, S> {
    states: FxHashMap<K, S>,
    current: Option<K>,
    previous: Option<K>,
    time_in_state: f32,
}

impl<K, S> Default for StateMachine<K, S>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S> StateMachine<K, S>
where
    K: Copy + Eq + Hash + fmt::Debug,
{
    /// Create an idle machine with no registered states.
    pub fn new() -> Self {
        Self {
            states: FxHashMap::default(),
            current: None,
            previous: None,
            time_in_state: 0.0,
        }
    }

    /// Register `state` under `key`, replacing any state previously stored
    /// under the same key.
    pub fn add_state(&mut self, key: K, state: S) {
        self.states.insert(key, state);
    }

    /// Builder-style [`add_state`](Self::add_state).
    pub fn with_state(mut self, key: K, state: S) -> Self {
        self.add_state(key, state);
        self
    }

    pub fn has_state(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn state(&self, key: K) -> Option<&S> {
        self.states.get(&key)
    }

    pub fn state_mut(&mut self, key: K) -> Option<&mut S> {
        self.states.get_mut(&key)
    }

    /// Leave the active state (if any) and enter `next` (if any).
    ///
    /// `on_exit` runs on the old state before `on_enter` runs on the new one.
    /// Entering the key that is already active re-runs both hooks. Returns
    /// `false`, leaving the machine untouched, when `next` names a key that
    /// was never registered.
    pub fn change_state<C: ?Sized>(&mut self, next: Option<K>, ctx: &mut C) -> bool
    where
        S: State<K, C>,
    {
        if let Some(key) = next
            && !self.states.contains_key(&key)
        {
            warn!("StateMachine: no state registered for {:?}", key);
            return false;
        }

        if let Some(active) = self.current
            && let Some(state) = self.states.get_mut(&active)
        {
            state.on_exit(ctx);
        }

        debug!("StateMachine: {:?} -> {:?}", self.current, next);
        self.previous = self.current;
        self.current = next;
        self.time_in_state = 0.0;

        if let Some(key) = next
            && let Some(state) = self.states.get_mut(&key)
        {
            state.on_enter(ctx);
        }
        true
    }

    /// Tick the active state and apply the transition it returns.
    ///
    /// Does nothing while idle. Returns the key that is active afterwards.
    pub fn tick<C: ?Sized>(&mut self, dt: f32, ctx: &mut C) -> Option<K>
    where
        S: State<K, C>,
    {
        let Some(active) = self.current else {
            return None;
        };
        self.time_in_state += dt;

        let transition = match self.states.get_mut(&active) {
            Some(state) => state.tick(dt, ctx),
            None => Transition::None,
        };

        match transition {
            Transition::None => {}
            Transition::To(key) => {
                self.change_state(Some(key), ctx);
            }
            Transition::Clear => {
                self.change_state(None, ctx);
            }
        }
        self.current
    }
}

impl<K: fmt::Debug, S> fmt::Debug for StateMachine<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("time_in_state", &self.time_in_state)
            .field("states", &self.states.keys().collect::<Vec<_>>())
            .finish()
    }
}
