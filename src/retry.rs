/// How long a read keeps retrying after protocol faults.
///
/// The sensor is expected to answer eventually, so the default is to retry
/// forever: a read against a disconnected sensor never returns. The bounded
/// variants turn that into [`DhtError::TransactionFailed`](crate::DhtError).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Retry {
    /// Retry until a transaction succeeds.
    #[default]
    Forever,
    /// Give up after this many attempts. `0` behaves like `1`.
    Attempts(u32),
    /// Give up once this many microseconds have passed since the read started.
    /// At least one attempt is always made.
    Deadline { micros: u32 },
}

impl Retry {
    /// Whether another attempt may start after `attempts` failed ones,
    /// `elapsed_us` into the read.
    pub fn allows_another(&self, attempts: u32, elapsed_us: u32) -> bool {
        match *self {
            Retry::Forever => true,
            Retry::Attempts(max) => attempts < max,
            Retry::Deadline { micros } => elapsed_us < micros,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forever() {
        assert!(Retry::default().allows_another(u32::MAX, u32::MAX));
    }

    #[test]
    fn test_attempts() {
        let retry = Retry::Attempts(3);
        assert!(retry.allows_another(1, 0));
        assert!(retry.allows_another(2, 0));
        assert!(!retry.allows_another(3, 0));
        assert!(!Retry::Attempts(0).allows_another(1, 0));
    }

    #[test]
    fn test_deadline() {
        let retry = Retry::Deadline { micros: 100_000 };
        assert!(retry.allows_another(50, 99_999));
        assert!(!retry.allows_another(1, 100_000));
    }
}
