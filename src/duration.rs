//! A saturating time interval.
//!
//! [`Duration`] is a non-negative span of time with nanosecond resolution.
//! Unlike [`core::time::Duration`], its arithmetic operators never panic:
//! results clamp to [`Duration::ZERO`] or [`Duration::MAX`], and negative
//! inputs clamp to zero. Each operator has a `checked_*` counterpart for
//! callers that need to detect overflow.

use core::{
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign},
};

const NANOS_PER_SEC: u32 = 1_000_000_000;
const NANOS_PER_MICRO: u32 = 1_000;
const NANOS_PER_MILLI: u32 = 1_000_000;
const MICROS_PER_SEC: u64 = 1_000_000;
const MILLIS_PER_SEC: u64 = 1_000;
const SECS_PER_MIN: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * 60;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// A non-negative, saturating span of time.
///
/// # Examples
///
/// ```
/// use fnslot::Duration;
///
/// let timeout = Duration::from_millis(1_500);
/// assert_eq!(timeout.as_secs(), 1);
/// assert_eq!(timeout.subsec_nanos(), 500_000_000);
///
/// // Subtraction saturates at zero instead of panicking
/// assert_eq!(Duration::from_secs(1) - Duration::from_secs(5), Duration::ZERO);
///
/// // Multiplication saturates at the maximum
/// assert_eq!(Duration::MAX * 2, Duration::MAX);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct Duration {
    /// Whole seconds
    seconds: u64,
    /// Fractional part, always below one second
    nanoseconds: u32,
}

/// A `(seconds, nanoseconds)` pair in the layout of the POSIX `timespec`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct TimeSpec {
    /// Seconds
    pub tv_sec: i64,
    /// Nanoseconds
    pub tv_nsec: i64,
}

/// A `(seconds, microseconds)` pair in the layout of the POSIX `timeval`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct TimeVal {
    /// Seconds
    pub tv_sec: i64,
    /// Microseconds
    pub tv_usec: i64,
}

/// An interval timer setting in the layout of the POSIX `itimerspec`.
///
/// Converting it into a [`Duration`] uses the period `it_interval`;
/// `it_value`, the time until the first expiration, is ignored.
///
/// # Examples
///
/// ```
/// use fnslot::{Duration, ITimerSpec, TimeSpec};
///
/// let timer = ITimerSpec {
///     it_interval: TimeSpec { tv_sec: 2, tv_nsec: 500 },
///     it_value: TimeSpec { tv_sec: 10, tv_nsec: 0 },
/// };
/// assert_eq!(Duration::from(timer), Duration::new(2, 500));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct ITimerSpec {
    /// Period between expirations
    pub it_interval: TimeSpec,
    /// Time until the first expiration
    pub it_value: TimeSpec,
}

/// The point in time a [`TimeSpec`] produced by
/// [`Duration::to_timespec_from`] is measured from.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TimeSpecReference {
    /// The duration itself, i.e. a relative interval.
    None,
    /// The Unix epoch: the result is the current wall-clock time plus the
    /// duration, as an absolute deadline.
    Epoch,
}

/// Generates the saturating signed constructor for one unit.
macro_rules! signed_constructor {
    ($(#[$meta:meta])* $name:ident => $unsigned:ident) => {
        $(#[$meta])*
        #[inline]
        #[must_use]
        pub const fn $name(value: i64) -> Self {
            if value < 0 {
                Self::ZERO
            } else {
                Self::$unsigned(value as u64)
            }
        }
    };
}

impl Duration {
    /// The empty duration.
    pub const ZERO: Self = Self {
        seconds: 0,
        nanoseconds: 0,
    };

    /// The largest representable duration.
    pub const MAX: Self = Self {
        seconds: u64::MAX,
        nanoseconds: NANOS_PER_SEC - 1,
    };

    /// Creates a duration from whole seconds and additional nanoseconds.
    ///
    /// Nanoseconds beyond one second carry into the seconds, saturating at
    /// [`Duration::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Duration;
    ///
    /// let duration = Duration::new(1, 2_500_000_000);
    /// assert_eq!(duration.as_secs(), 3);
    /// assert_eq!(duration.subsec_nanos(), 500_000_000);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(seconds: u64, nanoseconds: u32) -> Self {
        let carry = (nanoseconds / NANOS_PER_SEC) as u64;
        match seconds.checked_add(carry) {
            Some(seconds) => Self {
                seconds,
                nanoseconds: nanoseconds % NANOS_PER_SEC,
            },
            None => Self::MAX,
        }
    }

    /// Creates a duration from nanoseconds.
    #[inline]
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self {
            seconds: nanos / NANOS_PER_SEC as u64,
            nanoseconds: (nanos % NANOS_PER_SEC as u64) as u32,
        }
    }

    /// Creates a duration from microseconds.
    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self {
            seconds: micros / MICROS_PER_SEC,
            nanoseconds: (micros % MICROS_PER_SEC) as u32 * NANOS_PER_MICRO,
        }
    }

    /// Creates a duration from milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            seconds: millis / MILLIS_PER_SEC,
            nanoseconds: (millis % MILLIS_PER_SEC) as u32 * NANOS_PER_MILLI,
        }
    }

    /// Creates a duration from seconds.
    #[inline]
    #[must_use]
    pub const fn from_secs(seconds: u64) -> Self {
        Self {
            seconds,
            nanoseconds: 0,
        }
    }

    /// Creates a duration from seconds scaled by `factor`, saturating.
    #[inline]
    const fn from_scaled_secs(value: u64, factor: u64) -> Self {
        match value.checked_mul(factor) {
            Some(seconds) => Self::from_secs(seconds),
            None => Self::MAX,
        }
    }

    /// Creates a duration from minutes, saturating at [`Duration::MAX`].
    #[inline]
    #[must_use]
    pub const fn from_mins(minutes: u64) -> Self {
        Self::from_scaled_secs(minutes, SECS_PER_MIN)
    }

    /// Creates a duration from hours, saturating at [`Duration::MAX`].
    #[inline]
    #[must_use]
    pub const fn from_hours(hours: u64) -> Self {
        Self::from_scaled_secs(hours, SECS_PER_HOUR)
    }

    /// Creates a duration from days, saturating at [`Duration::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Duration;
    ///
    /// assert_eq!(Duration::from_days(2), Duration::from_hours(48));
    /// assert_eq!(Duration::from_days(u64::MAX), Duration::MAX);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_days(days: u64) -> Self {
        Self::from_scaled_secs(days, SECS_PER_DAY)
    }

    signed_constructor!(
        /// Creates a duration from signed nanoseconds; negative values clamp
        /// to zero.
        from_nanos_signed => from_nanos
    );
    signed_constructor!(
        /// Creates a duration from signed microseconds; negative values clamp
        /// to zero.
        from_micros_signed => from_micros
    );
    signed_constructor!(
        /// Creates a duration from signed milliseconds; negative values clamp
        /// to zero.
        ///
        /// # Examples
        ///
        /// ```
        /// use fnslot::Duration;
        ///
        /// assert_eq!(Duration::from_millis_signed(-20), Duration::ZERO);
        /// assert_eq!(Duration::from_millis_signed(20), Duration::from_millis(20));
        /// ```
        from_millis_signed => from_millis
    );
    signed_constructor!(
        /// Creates a duration from signed seconds; negative values clamp to
        /// zero.
        from_secs_signed => from_secs
    );
    signed_constructor!(
        /// Creates a duration from signed minutes; negative values clamp to
        /// zero.
        from_mins_signed => from_mins
    );
    signed_constructor!(
        /// Creates a duration from signed hours; negative values clamp to
        /// zero.
        from_hours_signed => from_hours
    );
    signed_constructor!(
        /// Creates a duration from signed days; negative values clamp to zero.
        from_days_signed => from_days
    );

    /// Builds a duration from a total nanosecond count, or `None` if the
    /// seconds do not fit in a `u64`.
    #[inline]
    const fn from_total_nanos(nanos: u128) -> Option<Self> {
        let seconds = nanos / NANOS_PER_SEC as u128;
        if seconds > u64::MAX as u128 {
            return None;
        }
        Some(Self {
            seconds: seconds as u64,
            nanoseconds: (nanos % NANOS_PER_SEC as u128) as u32,
        })
    }

    #[inline]
    const fn total_nanos(self) -> u128 {
        self.seconds as u128 * NANOS_PER_SEC as u128 + self.nanoseconds as u128
    }

    /// Clamps a `u128` to `u64::MAX`.
    #[inline]
    const fn saturate(value: u128) -> u64 {
        if value > u64::MAX as u128 {
            u64::MAX
        } else {
            value as u64
        }
    }

    /// Whether this duration is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.seconds == 0 && self.nanoseconds == 0
    }

    /// The fractional part of this duration in nanoseconds.
    #[inline]
    pub const fn subsec_nanos(self) -> u32 {
        self.nanoseconds
    }

    /// Total whole nanoseconds, saturating at `u64::MAX`.
    #[inline]
    pub const fn as_nanos(self) -> u64 {
        Self::saturate(self.total_nanos())
    }

    /// Total whole microseconds, saturating at `u64::MAX`.
    #[inline]
    pub const fn as_micros(self) -> u64 {
        Self::saturate(self.total_nanos() / NANOS_PER_MICRO as u128)
    }

    /// Total whole milliseconds, saturating at `u64::MAX`.
    #[inline]
    pub const fn as_millis(self) -> u64 {
        Self::saturate(self.total_nanos() / NANOS_PER_MILLI as u128)
    }

    /// Total whole seconds.
    #[inline]
    pub const fn as_secs(self) -> u64 {
        self.seconds
    }

    /// Total whole minutes.
    #[inline]
    pub const fn as_mins(self) -> u64 {
        self.seconds / SECS_PER_MIN
    }

    /// Total whole hours.
    #[inline]
    pub const fn as_hours(self) -> u64 {
        self.seconds / SECS_PER_HOUR
    }

    /// Total whole days.
    #[inline]
    pub const fn as_days(self) -> u64 {
        self.seconds / SECS_PER_DAY
    }

    /// Adds two durations, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        let Some(mut seconds) = self.seconds.checked_add(rhs.seconds) else {
            return None;
        };
        let mut nanoseconds = self.nanoseconds + rhs.nanoseconds;
        if nanoseconds >= NANOS_PER_SEC {
            nanoseconds -= NANOS_PER_SEC;
            seconds = match seconds.checked_add(1) {
                Some(seconds) => seconds,
                None => return None,
            };
        }
        Some(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Subtracts `rhs` from `self`, returning `None` if the result would be
    /// negative.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        let Some(mut seconds) = self.seconds.checked_sub(rhs.seconds) else {
            return None;
        };
        let nanoseconds = if self.nanoseconds >= rhs.nanoseconds {
            self.nanoseconds - rhs.nanoseconds
        } else {
            seconds = match seconds.checked_sub(1) {
                Some(seconds) => seconds,
                None => return None,
            };
            self.nanoseconds + NANOS_PER_SEC - rhs.nanoseconds
        };
        Some(Self {
            seconds,
            nanoseconds,
        })
    }

    /// Multiplies by an integer factor, returning `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_mul(self, factor: u64) -> Option<Self> {
        match self.total_nanos().checked_mul(factor as u128) {
            Some(nanos) => Self::from_total_nanos(nanos),
            None => None,
        }
    }

    /// Multiplies by a floating-point factor, returning `None` if the factor
    /// is negative or NaN, or if the result overflows.
    #[inline]
    #[must_use]
    pub fn checked_mul_f64(self, factor: f64) -> Option<Self> {
        if factor.is_nan() || factor < 0.0 {
            return None;
        }
        let nanos = self.total_nanos() as f64 * factor;
        if nanos >= u128::MAX as f64 {
            return None;
        }
        Self::from_total_nanos(nanos as u128)
    }

    /// Adds two durations, saturating at [`Duration::MAX`].
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        match self.checked_add(rhs) {
            Some(duration) => duration,
            None => Self::MAX,
        }
    }

    /// Subtracts `rhs` from `self`, saturating at [`Duration::ZERO`].
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        match self.checked_sub(rhs) {
            Some(duration) => duration,
            None => Self::ZERO,
        }
    }

    /// Multiplies by an integer factor, saturating at [`Duration::MAX`].
    #[inline]
    #[must_use]
    pub const fn saturating_mul(self, factor: u64) -> Self {
        match self.checked_mul(factor) {
            Some(duration) => duration,
            None => Self::MAX,
        }
    }

    /// Multiplies by a floating-point factor.
    ///
    /// A negative or NaN factor yields [`Duration::ZERO`], and an overflowing
    /// product yields [`Duration::MAX`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::Duration;
    ///
    /// assert_eq!(Duration::from_secs(2).saturating_mul_f64(1.5), Duration::from_secs(3));
    /// assert_eq!(Duration::from_secs(2).saturating_mul_f64(-1.0), Duration::ZERO);
    /// assert_eq!(Duration::from_secs(2).saturating_mul_f64(f64::NAN), Duration::ZERO);
    /// assert_eq!(Duration::from_secs(2).saturating_mul_f64(f64::INFINITY), Duration::MAX);
    /// ```
    #[inline]
    #[must_use]
    pub fn saturating_mul_f64(self, factor: f64) -> Self {
        if factor.is_nan() || factor < 0.0 {
            return Self::ZERO;
        }
        self.checked_mul_f64(factor).unwrap_or(Self::MAX)
    }

    /// Converts to a [`TimeSpec`], saturating the seconds at `i64::MAX`.
    #[inline]
    pub const fn to_timespec(self) -> TimeSpec {
        TimeSpec {
            tv_sec: saturate_signed(self.seconds),
            tv_nsec: self.nanoseconds as i64,
        }
    }

    /// Converts to a [`TimeVal`], truncating to whole microseconds and
    /// saturating the seconds at `i64::MAX`.
    #[inline]
    pub const fn to_timeval(self) -> TimeVal {
        TimeVal {
            tv_sec: saturate_signed(self.seconds),
            tv_usec: (self.nanoseconds / NANOS_PER_MICRO) as i64,
        }
    }

    /// Converts to a [`TimeSpec`] measured from `reference`.
    ///
    /// With [`TimeSpecReference::Epoch`] the result is an absolute deadline:
    /// the current wall-clock time plus this duration. A system clock set
    /// before the Unix epoch counts as the epoch itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use fnslot::{Duration, TimeSpecReference};
    ///
    /// let relative = Duration::from_secs(5).to_timespec_from(TimeSpecReference::None);
    /// assert_eq!(relative.tv_sec, 5);
    ///
    /// let deadline = Duration::from_secs(5).to_timespec_from(TimeSpecReference::Epoch);
    /// assert!(deadline.tv_sec > 5);
    /// ```
    #[cfg(feature = "std")]
    #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
    pub fn to_timespec_from(self, reference: TimeSpecReference) -> TimeSpec {
        match reference {
            TimeSpecReference::None => self.to_timespec(),
            TimeSpecReference::Epoch => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .map(Self::from)
                    .unwrap_or(Self::ZERO);
                (now + self).to_timespec()
            }
        }
    }
}

/// Clamps an unsigned second count to `i64::MAX`.
#[inline]
const fn saturate_signed(seconds: u64) -> i64 {
    if seconds > i64::MAX as u64 {
        i64::MAX
    } else {
        seconds as i64
    }
}

impl Add for Duration {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Duration {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Duration {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for Duration {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<u64> for Duration {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: u64) -> Self {
        self.saturating_mul(rhs)
    }
}

impl Mul<Duration> for u64 {
    type Output = Duration;

    #[inline]
    fn mul(self, rhs: Duration) -> Duration {
        rhs.saturating_mul(self)
    }
}

impl MulAssign<u64> for Duration {
    #[inline]
    fn mul_assign(&mut self, rhs: u64) {
        *self = *self * rhs;
    }
}

impl Mul<f64> for Duration {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        self.saturating_mul_f64(rhs)
    }
}

impl From<core::time::Duration> for Duration {
    #[inline]
    fn from(duration: core::time::Duration) -> Self {
        Self {
            seconds: duration.as_secs(),
            nanoseconds: duration.subsec_nanos(),
        }
    }
}

impl From<Duration> for core::time::Duration {
    #[inline]
    fn from(duration: Duration) -> Self {
        core::time::Duration::new(duration.seconds, duration.nanoseconds)
    }
}

impl From<TimeSpec> for Duration {
    /// Negative totals clamp to [`Duration::ZERO`].
    #[inline]
    fn from(timespec: TimeSpec) -> Self {
        let nanos = i128::from(timespec.tv_sec) * i128::from(NANOS_PER_SEC)
            + i128::from(timespec.tv_nsec);
        if nanos <= 0 {
            return Self::ZERO;
        }
        Self::from_total_nanos(nanos as u128).unwrap_or(Self::MAX)
    }
}

impl From<TimeVal> for Duration {
    /// Negative totals clamp to [`Duration::ZERO`].
    #[inline]
    fn from(timeval: TimeVal) -> Self {
        let nanos = i128::from(timeval.tv_sec) * i128::from(NANOS_PER_SEC)
            + i128::from(timeval.tv_usec) * i128::from(NANOS_PER_MICRO);
        if nanos <= 0 {
            return Self::ZERO;
        }
        Self::from_total_nanos(nanos as u128).unwrap_or(Self::MAX)
    }
}

impl From<ITimerSpec> for Duration {
    #[inline]
    fn from(timer: ITimerSpec) -> Self {
        Self::from(timer.it_interval)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s {}ns", self.seconds, self.nanoseconds)
    }
}
