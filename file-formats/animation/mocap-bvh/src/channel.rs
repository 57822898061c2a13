//! Channel tokens and rotation-axis orders

use std::fmt;
use std::str::FromStr;

use crate::error::{BvhError, Result};

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of the axis in an `(x, y, z)` triple
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        };
        f.write_str(s)
    }
}

/// One animatable degree of freedom as listed on a `CHANNELS` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    /// The axis this channel acts along
    pub fn axis(self) -> Axis {
        match self {
            Channel::Xposition | Channel::Xrotation => Axis::X,
            Channel::Yposition | Channel::Yrotation => Axis::Y,
            Channel::Zposition | Channel::Zrotation => Axis::Z,
        }
    }

    /// Whether this is a translation channel
    pub fn is_position(self) -> bool {
        matches!(
            self,
            Channel::Xposition | Channel::Yposition | Channel::Zposition
        )
    }

    /// Whether this is a rotation channel
    pub fn is_rotation(self) -> bool {
        !self.is_position()
    }

    /// The token used in BVH files
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Xposition => "Xposition",
            Channel::Yposition => "Yposition",
            Channel::Zposition => "Zposition",
            Channel::Xrotation => "Xrotation",
            Channel::Yrotation => "Yrotation",
            Channel::Zrotation => "Zrotation",
        }
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Xposition" => Ok(Channel::Xposition),
            "Yposition" => Ok(Channel::Yposition),
            "Zposition" => Ok(Channel::Zposition),
            "Xrotation" => Ok(Channel::Xrotation),
            "Yrotation" => Ok(Channel::Yrotation),
            "Zrotation" => Ok(Channel::Zrotation),
            _ => Err(format!("Unknown channel: {s}")),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Axis order of the rotation channels, shared by every joint of a skeleton
///
/// The name lists the channels in file order. `Xyz` means the file stores
/// `Xrotation Yrotation Zrotation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum RotationOrder {
    #[default]
    Xyz,
    Xzy,
    Yxz,
    Yzx,
    Zxy,
    Zyx,
}

impl RotationOrder {
    /// All six supported orders
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::Xyz,
        RotationOrder::Xzy,
        RotationOrder::Yxz,
        RotationOrder::Yzx,
        RotationOrder::Zxy,
        RotationOrder::Zyx,
    ];

    /// Axes in file order
    pub fn axes(self) -> [Axis; 3] {
        match self {
            RotationOrder::Xyz => [Axis::X, Axis::Y, Axis::Z],
            RotationOrder::Xzy => [Axis::X, Axis::Z, Axis::Y],
            RotationOrder::Yxz => [Axis::Y, Axis::X, Axis::Z],
            RotationOrder::Yzx => [Axis::Y, Axis::Z, Axis::X],
            RotationOrder::Zxy => [Axis::Z, Axis::X, Axis::Y],
            RotationOrder::Zyx => [Axis::Z, Axis::Y, Axis::X],
        }
    }

    /// Build an order from three axes in file order
    pub fn from_axes(axes: [Axis; 3]) -> Result<Self> {
        match axes {
            [Axis::X, Axis::Y, Axis::Z] => Ok(RotationOrder::Xyz),
            [Axis::X, Axis::Z, Axis::Y] => Ok(RotationOrder::Xzy),
            [Axis::Y, Axis::X, Axis::Z] => Ok(RotationOrder::Yxz),
            [Axis::Y, Axis::Z, Axis::X] => Ok(RotationOrder::Yzx),
            [Axis::Z, Axis::X, Axis::Y] => Ok(RotationOrder::Zxy),
            [Axis::Z, Axis::Y, Axis::X] => Ok(RotationOrder::Zyx),
            [a, b, c] => Err(BvhError::UnsupportedRotationOrder(format!("{a}{b}{c}"))),
        }
    }

    /// Extract the order from a joint's channel list
    ///
    /// The rotation channels are taken in listed order; position channels
    /// are ignored. Anything other than exactly three rotation channels over
    /// three distinct axes is unsupported.
    pub fn from_channels(channels: &[Channel]) -> Result<Self> {
        let axes: Vec<Axis> = channels
            .iter()
            .filter(|c| c.is_rotation())
            .map(|c| c.axis())
            .collect();

        match axes.as_slice() {
            [a, b, c] => Self::from_axes([*a, *b, *c]),
            other => Err(BvhError::UnsupportedRotationOrder(
                other.iter().map(ToString::to_string).collect(),
            )),
        }
    }

    /// Canonical name, e.g. `"ZXY"`
    pub fn as_str(self) -> &'static str {
        match self {
            RotationOrder::Xyz => "XYZ",
            RotationOrder::Xzy => "XZY",
            RotationOrder::Yxz => "YXZ",
            RotationOrder::Yzx => "YZX",
            RotationOrder::Zxy => "ZXY",
            RotationOrder::Zyx => "ZYX",
        }
    }
}

impl FromStr for RotationOrder {
    type Err = BvhError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "XYZ" => Ok(RotationOrder::Xyz),
            "XZY" => Ok(RotationOrder::Xzy),
            "YXZ" => Ok(RotationOrder::Yxz),
            "YZX" => Ok(RotationOrder::Yzx),
            "ZXY" => Ok(RotationOrder::Zxy),
            "ZYX" => Ok(RotationOrder::Zyx),
            _ => Err(BvhError::UnsupportedRotationOrder(s.to_string())),
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
