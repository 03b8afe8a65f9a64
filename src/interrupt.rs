//! Interrupt masking around timing-critical sections.

/// Controls the interrupt sources that can stretch busy-wait timing.
///
/// Implementations snapshot the enable state of the periodic timer
/// interrupts, disable them, and later write the snapshot back. Whatever
/// drives the [`MicroClock`](crate::MicroClock) must stay enabled.
pub trait InterruptController {
    /// Snapshot of the enable state taken by [`InterruptController::suspend`].
    type Saved;

    /// Saves the current enable state and disables the periodic timers.
    fn suspend(&mut self) -> Self::Saved;

    /// Writes a snapshot from [`InterruptController::suspend`] back.
    fn restore(&mut self, saved: Self::Saved);
}

impl<T: InterruptController + ?Sized> InterruptController for &mut T {
    type Saved = T::Saved;

    fn suspend(&mut self) -> Self::Saved {
        T::suspend(self)
    }

    fn restore(&mut self, saved: Self::Saved) {
        T::restore(self, saved)
    }
}

/// Controller for targets with nothing to mask.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoInterrupts;

impl InterruptController for NoInterrupts {
    type Saved = ();

    fn suspend(&mut self) {}

    fn restore(&mut self, _saved: ()) {}
}

/// Masks every interrupt through the `critical-section` implementation of
/// the target.
///
/// Use this where the individual timer sources cannot be addressed. The
/// timekeeping interrupt is masked too, so the clock has to be a free-running
/// hardware counter.
#[cfg(feature = "critical-section")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalInterrupts;

#[cfg(feature = "critical-section")]
impl InterruptController for GlobalInterrupts {
    type Saved = critical_section::RestoreState;

    fn suspend(&mut self) -> Self::Saved {
        // SAFETY: only called through `InterruptGuard`, which pairs it with
        // exactly one `restore` and never nests.
        unsafe { critical_section::acquire() }
    }

    fn restore(&mut self, saved: Self::Saved) {
        // SAFETY: `saved` comes from the matching `suspend` above.
        unsafe { critical_section::release(saved) }
    }
}

/// Keeps interrupts suspended until dropped.
pub(crate) struct InterruptGuard<'a, I: InterruptController> {
    controller: &'a mut I,
    saved: Option<I::Saved>,
}

impl<'a, I: InterruptController> InterruptGuard<'a, I> {
    pub(crate) fn new(controller: &'a mut I) -> Self {
        let saved = controller.suspend();
        InterruptGuard {
            controller,
            saved: Some(saved),
        }
    }
}

impl<I: InterruptController> Drop for InterruptGuard<'_, I> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.controller.restore(saved);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{Event, FakeTimers};
    use super::*;

    #[test]
    fn test_guard_restores_on_drop() {
        let mut timers = FakeTimers::new([0b0000_0111, 0b0100_0011]);
        {
            let _guard = InterruptGuard::new(&mut timers);
        }
        assert_eq!(timers.masks, [0b0000_0111, 0b0100_0011]);
        assert_eq!(timers.events, vec![Event::Suspend, Event::Restore]);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn step() -> Result<u8, ()> {
            Err(())
        }

        fn fails(timers: &mut FakeTimers) -> Result<u8, ()> {
            let _guard = InterruptGuard::new(timers);
            let value = step()?;
            Ok(value + 1)
        }

        let mut timers = FakeTimers::new([0b0000_0101, 0]);
        assert!(fails(&mut timers).is_err());
        assert_eq!(timers.masks, [0b0000_0101, 0]);
        assert_eq!(timers.count(Event::Restore), 1);
    }

    #[test]
    fn test_suspend_keeps_unrelated_bits() {
        let mut timers = FakeTimers::new([0b1010_0111, 0b0000_0001]);
        let saved = timers.suspend();
        assert_eq!(timers.masks, [0b1010_0000, 0]);
        timers.restore(saved);
        assert_eq!(timers.masks, [0b1010_0111, 0b0000_0001]);
    }

    #[test]
    fn test_no_interrupts_is_inert() {
        let mut controller = NoInterrupts;
        let _guard = InterruptGuard::new(&mut controller);
    }
}
