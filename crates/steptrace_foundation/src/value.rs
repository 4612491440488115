//! Raw slot values and their display formatting.
//!
//! A slot stores a 32-bit pattern; its meaning comes from the slot's
//! [`SlotInfo`]. The functions here are pure and total: every bit pattern
//! renders to some text.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{BaseType, Shape, SlotInfo};

/// The 32-bit pattern recorded by a slot write.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawValue(pub u32);

impl RawValue {
    /// Creates a raw value from its bit pattern.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Creates a raw value holding a two's complement integer.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn from_int(value: i32) -> Self {
        Self(value as u32)
    }

    /// Creates a raw value holding an IEEE-754 float.
    #[must_use]
    pub const fn from_float(value: f32) -> Self {
        Self(value.to_bits())
    }

    /// Creates a raw value holding a boolean.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        Self(value as u32)
    }

    /// Returns the bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Interprets the bits as a signed integer.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn as_int(self) -> i32 {
        self.0 as i32
    }

    /// Interprets the bits as a float.
    #[must_use]
    pub const fn as_float(self) -> f32 {
        f32::from_bits(self.0)
    }

    /// Interprets the bits as a boolean.
    #[must_use]
    pub const fn as_bool(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Debug for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawValue({:#010x})", self.0)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}

impl From<f32> for RawValue {
    fn from(value: f32) -> Self {
        Self::from_float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::from_bool(value)
    }
}

/// Renders a raw value according to the slot's base type.
///
/// Floats use the shortest decimal that parses back to the same bits, so
/// `0.5` stays `0.5` and `1.0` prints as `1`.
#[must_use]
pub fn format_value(slot: &SlotInfo, value: RawValue) -> String {
    match slot.base_type {
        BaseType::Int => value.as_int().to_string(),
        BaseType::Bool => value.as_bool().to_string(),
        BaseType::Float => value.as_float().to_string(),
    }
}

/// Structural suffix naming the slot's component within its variable.
///
/// Empty for scalars, `.x` through `.w` for vector components, and
/// `[column][row]` for matrix components.
#[must_use]
pub fn component_suffix(slot: &SlotInfo) -> String {
    match slot.shape {
        Shape::Scalar => String::new(),
        Shape::Vector { .. } => match slot.component_index {
            0 => ".x".to_string(),
            1 => ".y".to_string(),
            2 => ".z".to_string(),
            3 => ".w".to_string(),
            other => format!("[{other}]"),
        },
        Shape::Matrix { rows, .. } => {
            let rows = rows.max(1);
            format!(
                "[{}][{}]",
                slot.component_index / rows,
                slot.component_index % rows
            )
        }
    }
}
