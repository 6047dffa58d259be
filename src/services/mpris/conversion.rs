//! Typed decoders for player property payloads.
//!
//! Every decoder accepts an optional payload. `None` yields the field default
//! with `present == false`; a payload of the wrong shape yields the type's
//! zero value with `present == true`, so one malformed field never blocks the
//! rest of a batch.

use std::time::Duration;

use super::{
    types::{LoopStatus, PlaybackStatus},
    value::PropertyValue,
};

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Result of decoding one payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// The typed value, or the field default
    pub value: T,
    /// Whether the payload carried a value at all
    pub present: bool,
}

/// Write a decoded value into `slot` when the payload was present.
/// Returns whether the slot was written.
pub fn store<T>(slot: &mut T, decoded: Decoded<T>) -> bool {
    if decoded.present {
        *slot = decoded.value;
    }
    decoded.present
}

impl<T: Default> Decoded<T> {
    fn absent() -> Self {
        Self {
            value: T::default(),
            present: false,
        }
    }

    fn zero() -> Self {
        Self {
            value: T::default(),
            present: true,
        }
    }
}

impl<T> Decoded<T> {
    fn of(value: T) -> Self {
        Self {
            value,
            present: true,
        }
    }
}

/// Decode a boolean.
pub fn to_bool(value: Option<&PropertyValue>) -> Decoded<bool> {
    match value {
        None => Decoded::absent(),
        Some(PropertyValue::Bool(b)) => Decoded::of(*b),
        Some(_) => Decoded::zero(),
    }
}

/// Decode an unsigned 64-bit integer. Negative integers clamp to zero.
pub fn to_u64(value: Option<&PropertyValue>) -> Decoded<u64> {
    match value {
        None => Decoded::absent(),
        Some(PropertyValue::UInt(n)) => Decoded::of(*n),
        Some(PropertyValue::Int(n)) => Decoded::of(u64::try_from(*n).unwrap_or(0)),
        Some(_) => Decoded::zero(),
    }
}

/// Decode a string. String lists are joined with commas.
pub fn to_string(value: Option<&PropertyValue>) -> Decoded<String> {
    match value {
        None => Decoded::absent(),
        Some(PropertyValue::Str(s)) => Decoded::of(s.clone()),
        Some(PropertyValue::StrList(items)) => Decoded::of(items.join(",")),
        Some(_) => Decoded::zero(),
    }
}

/// Decode a double.
pub fn to_f64(value: Option<&PropertyValue>) -> Decoded<f64> {
    match value {
        None => Decoded::absent(),
        Some(PropertyValue::Float(f)) => Decoded::of(*f),
        Some(_) => Decoded::zero(),
    }
}

/// Decode a loop status. Unlike the other decoders this one never reports
/// absence: a missing or unreadable status is `LoopStatus::None`.
pub fn to_loop_status(value: Option<&PropertyValue>) -> Decoded<LoopStatus> {
    let decoded = to_string(value);
    if decoded.present {
        Decoded::of(LoopStatus::from(decoded.value.as_str()))
    } else {
        Decoded::of(LoopStatus::None)
    }
}

/// Decode a playback status. A malformed payload leaves the status unknown.
pub fn to_playback_status(value: Option<&PropertyValue>) -> Decoded<Option<PlaybackStatus>> {
    match value {
        None => Decoded::absent(),
        Some(PropertyValue::Str(s)) => Decoded::of(Some(PlaybackStatus::from(s.as_str()))),
        Some(_) => Decoded::zero(),
    }
}

/// Format a microsecond count as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_duration(micros: u64) -> String {
    let total = micros / MICROS_PER_SECOND;
    let seconds = total % 60;
    let minutes = (total / 60) % 60;
    let hours = total / 3600;

    if hours != 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Delay until the next whole tick period after `position_micros`.
pub fn delay_to_period_boundary(position_micros: u64, period: Duration) -> Duration {
    let period_micros = u64::try_from(period.as_micros()).unwrap_or(u64::MAX).max(1);
    let into_period = position_micros % period_micros;
    Duration::from_micros(period_micros - into_period)
}
