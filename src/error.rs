use core::fmt;

/// Possible errors from the DHT11 driver.
///
/// `Timeout`, `Acknowledge`, `BitTiming` and `ChecksumMismatch` are protocol
/// faults. The driver retries them according to its [`Retry`](crate::Retry)
/// policy and only reports [`DhtError::TransactionFailed`] once the policy
/// gives up.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum DhtError<E> {
    /// Timed out waiting for the line to change state.
    Timeout,
    /// The sensor did not acknowledge the request within the timing window.
    Acknowledge,
    /// A data bit high phase ran too long.
    BitTiming,
    /// Checksum did not match the received data.
    ChecksumMismatch { expected: u8, actual: u8 },
    /// Error from the GPIO pin (input/output).
    PinError(E),
    /// The retry policy ran out before a transaction succeeded.
    TransactionFailed { attempts: u32 },
}

impl<E> DhtError<E> {
    /// Whether the error is a protocol fault that a new attempt may cure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DhtError::Timeout
                | DhtError::Acknowledge
                | DhtError::BitTiming
                | DhtError::ChecksumMismatch { .. }
        )
    }

    /// Short name for logs.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            DhtError::Timeout => "timeout",
            DhtError::Acknowledge => "acknowledge",
            DhtError::BitTiming => "bit timing",
            DhtError::ChecksumMismatch { .. } => "checksum",
            DhtError::PinError(_) => "pin",
            DhtError::TransactionFailed { .. } => "transaction failed",
        }
    }
}

impl<E> From<E> for DhtError<E> {
    fn from(value: E) -> Self {
        Self::PinError(value)
    }
}

impl<E: fmt::Debug> fmt::Display for DhtError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DhtError::Timeout => write!(f, "Timed out waiting for a level change"),
            DhtError::Acknowledge => write!(f, "Sensor did not acknowledge the request"),
            DhtError::BitTiming => write!(f, "Data bit high phase exceeded its window"),
            DhtError::ChecksumMismatch { expected, actual } => write!(
                f,
                "Checksum validation failed. Expected: {expected}, Actual: {actual}"
            ),
            DhtError::PinError(e) => write!(f, "Pin error: {e:?}"),
            DhtError::TransactionFailed { attempts } => {
                write!(f, "No valid transaction after {attempts} attempts")
            }
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DhtError<E> {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[test]
    fn test_transient_errors() {
        assert!(DhtError::<Infallible>::Timeout.is_transient());
        assert!(DhtError::<Infallible>::Acknowledge.is_transient());
        assert!(DhtError::<Infallible>::BitTiming.is_transient());
        assert!(
            DhtError::<Infallible>::ChecksumMismatch {
                expected: 1,
                actual: 2
            }
            .is_transient()
        );
        assert!(!DhtError::PinError(()).is_transient());
        assert!(!DhtError::<()>::TransactionFailed { attempts: 3 }.is_transient());
    }

    #[test]
    fn test_from_pin_error() {
        let err: DhtError<u8> = 7.into();
        assert_eq!(err, DhtError::PinError(7));
    }

    #[test]
    fn test_display() {
        let err = DhtError::<()>::ChecksumMismatch {
            expected: 35,
            actual: 36,
        };
        assert_eq!(
            format!("{err}"),
            "Checksum validation failed. Expected: 35, Actual: 36"
        );
        assert_eq!(
            format!("{}", DhtError::<()>::TransactionFailed { attempts: 4 }),
            "No valid transaction after 4 attempts"
        );
    }
}
