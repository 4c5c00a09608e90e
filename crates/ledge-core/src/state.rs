//! Generic finite state machine.
//!
//! States are keyed by a small `Copy + Ord` key (usually a fieldless enum) and
//! stored in a `BTreeMap`, so lookups and iteration are deterministic. Each
//! [`StateMachine::run`] call asks the current state where to go next, performs
//! at most one transition, then executes whichever state is current.
//!
//! # Example
//!
//! ```
//! use ledge_core::state::{Keyed, State, StateMachine};
//!
//! #[derive(Debug)]
//! struct Counter { key: u8, limit: u32, next: u8 }
//!
//! impl Keyed for Counter {
//!     type Key = u8;
//!     fn key(&self) -> u8 { self.key }
//! }
//!
//! impl State<u32> for Counter {
//!     fn execute(&mut self, ticks: &mut u32) { *ticks += 1; }
//!     fn change(&mut self, ticks: &mut u32) -> Option<u8> {
//!         (*ticks >= self.limit).then_some(self.next)
//!     }
//! }
//!
//! let mut machine = StateMachine::with_states(
//!     [Counter { key: 0, limit: 2, next: 1 }, Counter { key: 1, limit: u32::MAX, next: 0 }],
//!     0,
//! )
//! .unwrap();
//!
//! let mut ticks: u32 = 0;
//! for _ in 0..3 {
//!     machine.run(&mut ticks);
//! }
//! assert_eq!(machine.current(), Some(1));
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display};

use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors from state machine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The requested key has no state.
    #[error("unknown state {0}")]
    UnknownState(String),
}

/// Something identified by a key.
pub trait Keyed {
    /// Key type.
    type Key: Copy + Ord + Debug + Display;

    /// This item's key.
    fn key(&self) -> Self::Key;
}

/// One state of a [`StateMachine`] over context `C`.
///
/// All hooks except [`State::change`] default to no-ops.
pub trait State<C: ?Sized>: Keyed {
    /// Called when the machine switches to this state.
    fn enter(&mut self, _ctx: &mut C) {}

    /// Called once per [`StateMachine::run`] while this state is current.
    fn execute(&mut self, _ctx: &mut C) {}

    /// Key of the state to switch to, or `None` to stay.
    fn change(&mut self, ctx: &mut C) -> Option<Self::Key>;

    /// Called when the machine switches away from this state.
    fn exit(&mut self, _ctx: &mut C) {}
}

/// A keyed set of states with one current state.
pub struct StateMachine<S: Keyed> {
    states: BTreeMap<S::Key, S>,
    current: Option<S::Key>,
}

impl<S: Keyed + Debug> Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.states)
            .field("current", &self.current)
            .finish()
    }
}

impl<S: Keyed + Clone> Clone for StateMachine<S> {
    fn clone(&self) -> Self {
        Self {
            states: self.states.clone(),
            current: self.current,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.states.clone_from(&source.states);
        self.current = source.current;
    }
}

impl<S: Keyed> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Keyed> StateMachine<S> {
    /// Create an empty machine with no current state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            current: None,
        }
    }

    /// Build a machine from `states`, starting in `initial`.
    ///
    /// A later state with the same key replaces an earlier one. The initial
    /// state is made current without calling its `enter` hook.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownState`] if no state has key `initial`.
    pub fn with_states(states: impl IntoIterator<Item = S>, initial: S::Key) -> Result<Self, StateError> {
        let mut machine = Self::new();
        for state in states {
            machine.insert(state);
        }
        if !machine.contains(initial) {
            return Err(StateError::UnknownState(initial.to_string()));
        }
        machine.current = Some(initial);
        Ok(machine)
    }

    /// Add a state, returning any state it replaced.
    pub fn insert(&mut self, state: S) -> Option<S> {
        self.states.insert(state.key(), state)
    }

    /// Whether a state with `key` exists.
    #[must_use]
    pub fn contains(&self, key: S::Key) -> bool {
        self.states.contains_key(&key)
    }

    /// Key of the current state.
    #[must_use]
    pub fn current(&self) -> Option<S::Key> {
        self.current
    }

    /// Look up a state.
    #[must_use]
    pub fn get(&self, key: S::Key) -> Option<&S> {
        self.states.get(&key)
    }

    /// Keys of all states, in order.
    pub fn keys(&self) -> impl Iterator<Item = S::Key> + '_ {
        self.states.keys().copied()
    }

    /// Number of states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the machine has no states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Run one step: change, maybe transition, then execute.
    ///
    /// Does nothing without a current state. A transition to an unknown key
    /// is logged and skipped; the current state then executes as usual.
    /// Returns the transition taken, if any.
    pub fn run<C: ?Sized>(&mut self, ctx: &mut C) -> Option<(S::Key, S::Key)>
    where
        S: State<C>,
    {
        let from = self.current?;
        let next = self.states.get_mut(&from)?.change(ctx);

        let mut transition = None;
        if let Some(to) = next {
            if self.states.contains_key(&to) {
                self.switch(from, to, ctx);
                transition = Some((from, to));
            } else {
                warn!(from = %from, to = %to, "transition to unknown state ignored");
            }
        }

        let key = self.current?;
        if let Some(state) = self.states.get_mut(&key) {
            state.execute(ctx);
        }
        transition
    }

    /// Switch to `key` unconditionally, running exit and enter hooks.
    ///
    /// Works from an empty current state too; then only `enter` runs.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownState`] if no state has key `key`; the
    /// machine is left unchanged.
    pub fn force<C: ?Sized>(&mut self, key: S::Key, ctx: &mut C) -> Result<(), StateError>
    where
        S: State<C>,
    {
        if !self.states.contains_key(&key) {
            return Err(StateError::UnknownState(key.to_string()));
        }
        match self.current {
            Some(from) => self.switch(from, key, ctx),
            None => {
                if let Some(state) = self.states.get_mut(&key) {
                    state.enter(ctx);
                }
                self.current = Some(key);
                debug!(to = %key, "forced initial state");
            }
        }
        Ok(())
    }

    fn switch<C: ?Sized>(&mut self, from: S::Key, to: S::Key, ctx: &mut C)
    where
        S: State<C>,
    {
        if let Some(state) = self.states.get_mut(&from) {
            state.exit(ctx);
        }
        self.current = Some(to);
        if let Some(state) = self.states.get_mut(&to) {
            state.enter(ctx);
        }
        trace!(from = %from, to = %to, "state transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test state that logs hook calls and follows a fixed route.
    #[derive(Debug, Clone)]
    struct Scripted {
        key: char,
        next: Option<char>,
    }

    impl Keyed for Scripted {
        type Key = char;

        fn key(&self) -> char {
            self.key
        }
    }

    impl State<Vec<String>> for Scripted {
        fn enter(&mut self, log: &mut Vec<String>) {
            log.push(format!("enter {}", self.key));
        }

        fn execute(&mut self, log: &mut Vec<String>) {
            log.push(format!("execute {}", self.key));
        }

        fn change(&mut self, log: &mut Vec<String>) -> Option<char> {
            log.push(format!("change {}", self.key));
            self.next
        }

        fn exit(&mut self, log: &mut Vec<String>) {
            log.push(format!("exit {}", self.key));
        }
    }

    fn scripted(key: char, next: Option<char>) -> Scripted {
        Scripted { key, next }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn empty_machine_is_a_noop() {
            let mut machine: StateMachine<Scripted> = StateMachine::new();
            let mut log: Vec<String> = Vec::new();
            assert_eq!(machine.run(&mut log), None);
            assert!(log.is_empty());
            assert_eq!(machine.current(), None);
        }

        #[test]
        fn stays_without_change() {
            let mut machine = StateMachine::with_states([scripted('a', None)], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            machine.run(&mut log);
            assert_eq!(log, vec!["change a", "execute a"]);
        }

        #[test]
        fn transition_order_is_change_exit_enter_execute() {
            let mut machine =
                StateMachine::with_states([scripted('a', Some('b')), scripted('b', None)], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            let transition = machine.run(&mut log);

            assert_eq!(transition, Some(('a', 'b')));
            assert_eq!(log, vec!["change a", "exit a", "enter b", "execute b"]);
            assert_eq!(machine.current(), Some('b'));
        }

        #[test]
        fn at_most_one_transition_per_run() {
            let mut machine =
                StateMachine::with_states([scripted('a', Some('b')), scripted('b', Some('a'))], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            machine.run(&mut log);
            assert_eq!(machine.current(), Some('b'));
            machine.run(&mut log);
            assert_eq!(machine.current(), Some('a'));
        }

        #[test]
        fn unknown_target_stays_put() {
            let mut machine = StateMachine::with_states([scripted('a', Some('z'))], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            assert_eq!(machine.run(&mut log), None);
            assert_eq!(log, vec!["change a", "execute a"]);
            assert_eq!(machine.current(), Some('a'));
        }

        #[test]
        fn self_transition_reenters() {
            let mut machine = StateMachine::with_states([scripted('a', Some('a'))], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            machine.run(&mut log);
            assert_eq!(log, vec!["change a", "exit a", "enter a", "execute a"]);
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn with_states_rejects_unknown_initial() {
            let result = StateMachine::with_states([scripted('a', None)], 'x');
            assert_eq!(result.unwrap_err(), StateError::UnknownState("x".to_string()));
        }

        #[test]
        fn insert_replaces_same_key() {
            let mut machine = StateMachine::new();
            assert!(machine.insert(scripted('a', None)).is_none());
            let replaced = machine.insert(scripted('a', Some('b')));
            assert!(replaced.is_some());
            assert_eq!(machine.len(), 1);
            assert_eq!(machine.get('a').and_then(|s| s.next), Some('b'));
        }

        #[test]
        fn keys_are_ordered() {
            let machine =
                StateMachine::with_states([scripted('c', None), scripted('a', None), scripted('b', None)], 'a')
                    .unwrap();
            assert_eq!(machine.keys().collect::<Vec<_>>(), vec!['a', 'b', 'c']);
        }
    }

    mod force_tests {
        use super::*;

        #[test]
        fn force_runs_exit_and_enter() {
            let mut machine =
                StateMachine::with_states([scripted('a', None), scripted('b', None)], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            machine.force('b', &mut log).unwrap();
            assert_eq!(log, vec!["exit a", "enter b"]);
            assert_eq!(machine.current(), Some('b'));
        }

        #[test]
        fn force_from_empty_only_enters() {
            let mut machine = StateMachine::new();
            machine.insert(scripted('a', None));
            let mut log: Vec<String> = Vec::new();
            machine.force('a', &mut log).unwrap();
            assert_eq!(log, vec!["enter a"]);
        }

        #[test]
        fn force_unknown_is_an_error() {
            let mut machine = StateMachine::with_states([scripted('a', None)], 'a').unwrap();
            let mut log: Vec<String> = Vec::new();
            assert!(machine.force('q', &mut log).is_err());
            assert!(log.is_empty());
            assert_eq!(machine.current(), Some('a'));
        }
    }
}
