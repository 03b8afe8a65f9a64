//! Protocol timing constants and pulse classification.
//!
//! All durations are in microseconds unless the name says otherwise. The
//! classifiers are pure so the protocol windows can be checked without a line.

/// How long the host holds the line low to request a reading.
pub const REQUEST_LOW_MS: u32 = 20;
/// How long the host holds the released line high before listening.
pub const REQUEST_HIGH_US: u32 = 40;
/// Pause before every attempt, with interrupts enabled.
pub const RETRY_DELAY_MS: u32 = 20;

/// The acknowledgment low phase must last at least this long.
pub const ACK_MIN_LOW_US: u32 = 30;
/// The acknowledgment high phase must last longer than this.
pub const ACK_MIN_HIGH_US: u32 = 40;
/// The acknowledgment high phase fails once it reaches this.
pub const ACK_MAX_HIGH_US: u32 = 100;

/// A data bit high phase longer than this is a `1`.
pub const BIT_ONE_THRESHOLD_US: u32 = 47;
/// A data bit high phase longer than this aborts the attempt.
pub const BIT_MAX_HIGH_US: u32 = 100;

/// Upper bound for waits that are not themselves timed phases.
pub const STUCK_LINE_US: u32 = 1_000;

/// Monotonic microsecond counter.
///
/// The counter is allowed to wrap; elapsed times are always computed with
/// wrapping subtraction.
pub trait MicroClock {
    /// Current counter value in microseconds.
    fn now_us(&self) -> u32;

    /// Microseconds elapsed since `start`.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now_us().wrapping_sub(start)
    }
}

impl<T: MicroClock + ?Sized> MicroClock for &T {
    fn now_us(&self) -> u32 {
        T::now_us(self)
    }
}

/// Why an acknowledgment was rejected.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AckViolation {
    /// The sensor released the line too early.
    LowTooShort(u32),
    /// The sensor held the line high for too little time.
    HighTooShort(u32),
    /// The sensor held the line high for too long.
    HighTooLong(u32),
}

/// Checks the measured low phase of an acknowledgment.
pub fn check_ack_low(low_us: u32) -> Result<(), AckViolation> {
    if low_us < ACK_MIN_LOW_US {
        Err(AckViolation::LowTooShort(low_us))
    } else {
        Ok(())
    }
}

/// Checks the measured high phase of an acknowledgment.
pub fn check_ack_high(high_us: u32) -> Result<(), AckViolation> {
    if high_us >= ACK_MAX_HIGH_US {
        Err(AckViolation::HighTooLong(high_us))
    } else if high_us <= ACK_MIN_HIGH_US {
        Err(AckViolation::HighTooShort(high_us))
    } else {
        Ok(())
    }
}

/// Decodes a data bit from the length of its high phase.
///
/// Returns `None` if the phase ran past [`BIT_MAX_HIGH_US`].
pub fn decode_bit(high_us: u32) -> Option<bool> {
    if high_us > BIT_MAX_HIGH_US {
        None
    } else {
        Some(high_us > BIT_ONE_THRESHOLD_US)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_ack_low_boundary() {
        assert_eq!(check_ack_low(29), Err(AckViolation::LowTooShort(29)));
        assert_eq!(check_ack_low(30), Ok(()));
        assert_eq!(check_ack_low(31), Ok(()));
        assert_eq!(check_ack_low(80), Ok(()));
    }

    #[test]
    fn test_ack_high_window() {
        assert_eq!(check_ack_high(40), Err(AckViolation::HighTooShort(40)));
        assert_eq!(check_ack_high(41), Ok(()));
        assert_eq!(check_ack_high(80), Ok(()));
        assert_eq!(check_ack_high(99), Ok(()));
        // The upper bound itself fails
        assert_eq!(check_ack_high(100), Err(AckViolation::HighTooLong(100)));
        assert_eq!(check_ack_high(101), Err(AckViolation::HighTooLong(101)));
    }

    #[test]
    fn test_decode_bit() {
        assert_eq!(decode_bit(24), Some(false));
        assert_eq!(decode_bit(46), Some(false));
        assert_eq!(decode_bit(47), Some(false));
        assert_eq!(decode_bit(48), Some(true));
        assert_eq!(decode_bit(70), Some(true));
        assert_eq!(decode_bit(100), Some(true));
        assert_eq!(decode_bit(101), None);
    }

    struct Counter(Cell<u32>);

    impl MicroClock for Counter {
        fn now_us(&self) -> u32 {
            self.0.get()
        }
    }

    #[test]
    fn test_elapsed_wraps() {
        let clock = Counter(Cell::new(u32::MAX - 9));
        let start = clock.now_us();
        clock.0.set(20);
        assert_eq!(clock.elapsed_since(start), 30);
        assert_eq!(elapsed_through(&clock, start), 30);
    }

    fn elapsed_through<C: MicroClock>(clock: C, start: u32) -> u32 {
        clock.elapsed_since(start)
    }
}
