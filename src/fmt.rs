//! Logging shims.
//!
//! Forward to `defmt` and/or `log` depending on the enabled features and
//! compile to nothing otherwise. Only use `{}` placeholders with primitive
//! arguments so both backends accept the same format string.
#![macro_use]
#![allow(unused_macros)]

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::trace!($s $(, $x)*);
            #[cfg(feature = "defmt")]
            ::defmt::trace!($s $(, $x)*);
            $(
                #[cfg(not(any(feature = "log", feature = "defmt")))]
                let _ = &$x;
            )*
        }
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::debug!($s $(, $x)*);
            #[cfg(feature = "defmt")]
            ::defmt::debug!($s $(, $x)*);
            $(
                #[cfg(not(any(feature = "log", feature = "defmt")))]
                let _ = &$x;
            )*
        }
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "log")]
            ::log::warn!($s $(, $x)*);
            #[cfg(feature = "defmt")]
            ::defmt::warn!($s $(, $x)*);
            $(
                #[cfg(not(any(feature = "log", feature = "defmt")))]
                let _ = &$x;
            )*
        }
    };
}
