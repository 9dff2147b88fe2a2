//! Type tags for reflected record fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type tag of one reflected field.
///
/// Tags describe how a field is laid out, not how it is used. Array-ness is
/// carried separately by the descriptor's element count and flags so that an
/// array of vectors is `Vector(3)` with a count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PropertyType {
    /// Boolean flag.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 32-bit unsigned integer.
    UInt,
    /// 32-bit float.
    Float,
    /// Float vector with 2 to 4 lanes.
    Vector(u8),
    /// Float matrix, rows by columns.
    Matrix(u8, u8),
    /// Enumeration stored as a 32-bit discriminant.
    Enum,
    /// Packed bit set stored in 32 bits.
    Bitfield,
    /// Owned text.
    String,
    /// Reference to another entity.
    Entity,
    /// Binding to an external resource such as a texture.
    Resource,
    /// Nested structure, reflected through a container schema.
    Struct,
}

impl PropertyType {
    /// Size in bytes of one element when the type has a fixed GPU-style layout.
    ///
    /// Booleans occupy a full 32-bit word. Types without a fixed layout
    /// (strings, entity and resource references, structs) return `None`.
    #[must_use]
    pub const fn byte_size(self) -> Option<usize> {
        match self {
            Self::Bool | Self::Int | Self::UInt | Self::Float | Self::Enum | Self::Bitfield => {
                Some(4)
            }
            Self::Vector(lanes) => Some(4 * lanes as usize),
            Self::Matrix(rows, cols) => Some(4 * rows as usize * cols as usize),
            Self::String | Self::Entity | Self::Resource | Self::Struct => None,
        }
    }

    /// Returns true for scalar numeric and boolean tags.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(self, Self::Bool | Self::Int | Self::UInt | Self::Float)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::UInt => write!(f, "uint"),
            Self::Float => write!(f, "float"),
            Self::Vector(lanes) => write!(f, "float{lanes}"),
            Self::Matrix(rows, cols) => write!(f, "float{rows}x{cols}"),
            Self::Enum => write!(f, "enum"),
            Self::Bitfield => write!(f, "bitfield"),
            Self::String => write!(f, "string"),
            Self::Entity => write!(f, "entity"),
            Self::Resource => write!(f, "resource"),
            Self::Struct => write!(f, "struct"),
        }
    }
}
