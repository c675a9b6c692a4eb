//! The closed set of component kinds and the [`Component`] access trait.
//!
//! Every component the simulation supports is a variant of
//! [`ComponentValue`], keyed on entities by its [`ComponentKind`]. Each kind
//! also has a short stable name (`"pos"`, `"vel"`, `"sprite"`) used in logs and
//! configuration.
//!
//! Typed access goes through [`Component`], implemented for each payload
//! type, so subsystems write `entity.get::<Position>()` rather than matching
//! on the enum.

use std::str::FromStr;

use engine_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::sprite::Sprite;

/// Identifies one slot in an entity's component map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    /// World-space position.
    #[serde(rename = "pos")]
    Position,
    /// Linear velocity in world units per second.
    #[serde(rename = "vel")]
    Velocity,
    /// Animated sprite.
    #[serde(rename = "sprite")]
    Sprite,
}

impl ComponentKind {
    /// Every supported kind.
    pub const ALL: [ComponentKind; 3] = [Self::Position, Self::Velocity, Self::Sprite];

    /// The short name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "pos",
            Self::Velocity => "vel",
            Self::Sprite => "sprite",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown component kind name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponentKind(pub String);

impl std::fmt::Display for UnknownComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown component kind `{}`", self.0)
    }
}

impl std::error::Error for UnknownComponentKind {}

impl FromStr for ComponentKind {
    type Err = UnknownComponentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownComponentKind(s.to_string()))
    }
}

/// A component value of any supported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ComponentValue {
    #[serde(rename = "pos")]
    Position(Position),
    #[serde(rename = "vel")]
    Velocity(Velocity),
    #[serde(rename = "sprite")]
    Sprite(Sprite),
}

impl ComponentValue {
    /// The kind of slot this value occupies.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Position(_) => ComponentKind::Position,
            Self::Velocity(_) => ComponentKind::Velocity,
            Self::Sprite(_) => ComponentKind::Sprite,
        }
    }
}

/// Typed access to one variant of [`ComponentValue`].
pub trait Component: Sized + Into<ComponentValue> {
    /// The slot this component type occupies.
    const KIND: ComponentKind;

    /// Borrow `Self` out of a value of the matching variant.
    fn from_value(value: &ComponentValue) -> Option<&Self>;

    /// Mutably borrow `Self` out of a value of the matching variant.
    fn from_value_mut(value: &mut ComponentValue) -> Option<&mut Self>;

    /// Take `Self` out of a value of the matching variant.
    fn from_owned(value: ComponentValue) -> Option<Self>;
}

macro_rules! impl_component {
    ($ty:ident) => {
        impl From<$ty> for ComponentValue {
            fn from(value: $ty) -> Self {
                ComponentValue::$ty(value)
            }
        }

        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$ty;

            fn from_value(value: &ComponentValue) -> Option<&Self> {
                match value {
                    ComponentValue::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut ComponentValue) -> Option<&mut Self> {
                match value {
                    ComponentValue::$ty(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_owned(value: ComponentValue) -> Option<Self> {
                match value {
                    ComponentValue::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_component!(Position);
impl_component!(Velocity);
impl_component!(Sprite);

/// A 2D world-space position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    /// Create a position from coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

/// A 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self(Vec2::ZERO);

    /// Create a velocity from components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}
