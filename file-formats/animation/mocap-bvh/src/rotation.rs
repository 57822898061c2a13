//! Euler angle to quaternion conversion
//!
//! BVH rotation channels list intrinsic rotations in application order, so the
//! elementary quaternions are composed right to left: a file declaring
//! `Xrotation Yrotation Zrotation` yields `qz * qy * qx`.

use glam::{DQuat, DVec3};

use crate::channel::RotationOrder;

/// Convert per-axis angles in degrees to an orientation quaternion
///
/// `angles` holds the rotation about X, Y and Z respectively, independent of
/// the order they appeared in the file.
pub fn quat_from_euler_degrees(angles: DVec3, order: RotationOrder) -> DQuat {
    let qx = DQuat::from_rotation_x(angles.x.to_radians());
    let qy = DQuat::from_rotation_y(angles.y.to_radians());
    let qz = DQuat::from_rotation_z(angles.z.to_radians());

    match order {
        RotationOrder::Xyz => qz * qy * qx,
        RotationOrder::Xzy => qy * qz * qx,
        RotationOrder::Yxz => qz * qx * qy,
        RotationOrder::Yzx => qx * qz * qy,
        RotationOrder::Zxy => qy * qx * qz,
        RotationOrder::Zyx => qx * qy * qz,
    }
}
