// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Override slot shared by every patchable mechanism
//!
//! A slot holds the current implementation of one mechanism (a method on a
//! host object, the `setRequestHeader` of every request). Patches swap the
//! value in place and keep the previous one, which is how wrappers nest and
//! how one-shot overrides put the original back.
//!
//! Each installed value gets a generation from a monotonic counter. Putting
//! a previously captured value back reinstates its old generation, so a
//! generation names one installed value, not one write. Callers that want to
//! undo their own patch compare generations instead of comparing closures.

use std::fmt;

use parking_lot::RwLock;

/// Install counter of a slot value
pub type Generation = u64;

struct Installed<F> {
    generation: Generation,
    value: F,
    /// Last generation handed out
    counter: Generation,
}

impl<F> Installed<F> {
    fn install(&mut self, value: F) -> Generation {
        self.counter += 1;
        self.generation = self.counter;
        self.value = value;
        self.generation
    }
}

/// Shared, single-writer-at-a-time cell holding an implementation
pub struct OverrideSlot<F> {
    inner: RwLock<Installed<F>>,
}

impl<F: Clone> OverrideSlot<F> {
    /// Create a slot holding `initial` at generation 0
    pub fn new(initial: F) -> Self {
        Self {
            inner: RwLock::new(Installed {
                generation: 0,
                value: initial,
                counter: 0,
            }),
        }
    }

    /// Clone of the current implementation.
    ///
    /// The lock is released before the caller runs the value, so an
    /// implementation may rewrite its own slot while executing.
    pub fn current(&self) -> F {
        self.inner.read().value.clone()
    }

    /// Generation of the current value
    pub fn generation(&self) -> Generation {
        self.inner.read().generation
    }

    /// Install `value`, returning its generation and the value it displaced
    pub fn replace(&self, value: F) -> (Generation, F) {
        let mut guard = self.inner.write();
        let previous = guard.value.clone();
        (guard.install(value), previous)
    }

    /// Build a new value from the current one and install it under one write.
    ///
    /// `build` receives the current value and its generation and runs with
    /// the slot locked; it must only construct the wrapper, never call into
    /// the value it receives. Whatever else it returns is handed back next
    /// to the new generation.
    pub fn wrap<B, T>(&self, build: B) -> (Generation, T)
    where
        B: FnOnce(F, Generation) -> (F, T),
    {
        let mut guard = self.inner.write();
        let (wrapped, extra) = build(guard.value.clone(), guard.generation);
        (guard.install(wrapped), extra)
    }

    /// Overwrite unconditionally with a new value
    pub fn set(&self, value: F) -> Generation {
        self.inner.write().install(value)
    }

    /// Put back a value captured earlier, under the generation it had then
    pub fn restore(&self, generation: Generation, value: F) {
        let mut guard = self.inner.write();
        guard.generation = generation;
        guard.value = value;
    }

    /// Put back `value` under `previous` only if the slot still holds the
    /// value installed at `current`
    pub fn restore_if_current(
        &self,
        current: Generation,
        previous: Generation,
        value: F,
    ) -> bool {
        let mut guard = self.inner.write();
        if guard.generation != current {
            return false;
        }
        guard.generation = previous;
        guard.value = value;
        true
    }
}

impl<F> fmt::Debug for OverrideSlot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideSlot")
            .field("generation", &self.inner.read().generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_returns_previous() {
        let slot = OverrideSlot::new("native");
        let (generation, previous) = slot.replace("patched");

        assert_eq!(previous, "native");
        assert_eq!(slot.current(), "patched");
        assert_eq!(generation, 1);
        assert_eq!(slot.generation(), 1);
    }

    #[test]
    fn test_restore_if_current() {
        let slot = OverrideSlot::new("native");
        let (first, _) = slot.replace("first");
        let (second, _) = slot.replace("second");

        // A newer value sits on top, so the first patch cannot undo itself
        assert!(!slot.restore_if_current(first, 0, "native"));
        assert_eq!(slot.current(), "second");

        assert!(slot.restore_if_current(second, first, "first"));
        assert_eq!(slot.current(), "first");
        assert_eq!(slot.generation(), first);
    }

    #[test]
    fn test_wrap_sees_current_value() {
        let slot = OverrideSlot::new(String::from("native"));
        slot.wrap(|inner, _| (format!("outer({})", inner), ()));
        let (generation, seen) =
            slot.wrap(|inner, below| (format!("outer({})", inner), (inner.len(), below)));

        assert_eq!(slot.current(), "outer(outer(native))");
        assert_eq!(generation, 2);
        assert_eq!(seen, ("outer(native)".len(), 1));
    }

    #[test]
    fn test_restored_value_keeps_its_generation() {
        let slot = OverrideSlot::new("native");
        let (first, _) = slot.replace("first");
        slot.replace("second");

        slot.restore(first, "first");
        assert_eq!(slot.generation(), first);

        // Fresh installs never reuse a generation handed out before
        let third = slot.set("third");
        assert_eq!(third, 3);
    }

    #[test]
    fn test_set_bumps_generation() {
        let slot = OverrideSlot::new(1);
        let before = slot.generation();
        let after = slot.set(2);

        assert!(after > before);
        assert_eq!(slot.current(), 2);
    }
}
