//! Static metadata describing functions and variable slots.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Scalar type stored in a slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BaseType {
    /// 32-bit signed integer.
    Int,
    /// 32-bit IEEE-754 float.
    Float,
    /// Boolean (zero is false, anything else is true).
    Bool,
}

impl fmt::Debug for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Aggregate shape of the logical variable a slot belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Shape {
    /// A plain scalar.
    Scalar,
    /// A vector with 2 to 4 components.
    Vector {
        /// Number of components.
        len: u8,
    },
    /// A matrix stored column-major.
    Matrix {
        /// Number of columns.
        columns: u8,
        /// Number of rows.
        rows: u8,
    },
}

impl Shape {
    /// Number of slots a variable of this shape occupies.
    #[must_use]
    pub const fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector { len } => len as usize,
            Self::Matrix { columns, rows } => columns as usize * rows as usize,
        }
    }

    /// Returns true for plain scalars.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Scalar)
    }
}

/// Metadata for one entry of the function directory.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncInfo {
    /// Human-readable signature, e.g. `int main()`.
    pub display_name: String,
}

impl FuncInfo {
    /// Creates function metadata with the given display name.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}

/// Metadata for one entry of the slot directory.
///
/// Records which component of which logical variable the slot holds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlotInfo {
    /// Name of the logical variable, e.g. `c` or `[main].result`.
    pub display_name: String,
    /// Scalar type of the component.
    pub base_type: BaseType,
    /// Shape of the logical variable.
    pub shape: Shape,
    /// Which component of the logical variable this slot holds.
    pub component_index: u8,
}

impl SlotInfo {
    /// Creates metadata for a scalar slot.
    #[must_use]
    pub fn scalar(display_name: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            display_name: display_name.into(),
            base_type,
            shape: Shape::Scalar,
            component_index: 0,
        }
    }

    /// Creates metadata for one component of a vector or matrix.
    #[must_use]
    pub fn component(
        display_name: impl Into<String>,
        base_type: BaseType,
        shape: Shape,
        component_index: u8,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            base_type,
            shape,
            component_index,
        }
    }
}
