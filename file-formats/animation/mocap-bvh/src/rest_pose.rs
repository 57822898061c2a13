//! Rest pose derivation from the static joint tree

use glam::{DQuat, DVec3};
use log::debug;

use crate::error::{BvhError, Result};
use crate::skeleton::{JointId, Skeleton};

/// Axis a bone points along when its rest orientation is the identity
pub const UP_AXIS: DVec3 = DVec3::Y;

/// Dot-product bound past which a direction counts as (anti-)parallel to [`UP_AXIS`]
const PARALLEL_THRESHOLD: f64 = 0.9999;

/// Squared length below which a bone direction is treated as zero
const ZERO_LENGTH_SQUARED: f64 = 1e-24;

/// Computes the rest pose of every node from offsets alone
///
/// Needs no motion data. Walks the arena in creation order, which visits each
/// parent before its children.
#[derive(Debug, Default)]
pub struct RestPoseCalculator;

impl RestPoseCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Fill in global position, global rotation and parent-relative rotation
    ///
    /// Fails with [`BvhError::DegenerateSkeleton`] when a joint has neither
    /// children nor an End Site, since its bone direction is undefined.
    pub fn compute(&self, skeleton: &mut Skeleton) -> Result<()> {
        for index in 0..skeleton.nodes.len() {
            let id = JointId(index);
            let direction = bone_direction(skeleton, id)?;
            let global_rotation = rotation_from_up(direction);

            let joint = &skeleton[id];
            let offset = joint.rest_pose.offset;
            let (global_position, rotation_from_parent) = match joint.parent() {
                None => (offset, global_rotation),
                Some(parent) => {
                    let parent = &skeleton[parent].rest_pose;
                    (
                        parent.global_position + offset,
                        parent.global_rotation.inverse() * global_rotation,
                    )
                }
            };

            let rest = &mut skeleton.node_mut(id).rest_pose;
            rest.global_position = global_position;
            rest.global_rotation = global_rotation;
            rest.rotation_from_parent = rotation_from_parent;
        }

        debug!("Computed rest pose for {} nodes", skeleton.nodes.len());
        Ok(())
    }
}

/// Direction from a joint's head to its tail
///
/// The average of the children's offsets, or the node's own offset for an
/// End Site.
pub fn bone_direction(skeleton: &Skeleton, id: JointId) -> Result<DVec3> {
    let joint = &skeleton[id];
    if joint.is_end_site() {
        return Ok(joint.rest_pose().offset);
    }

    let children = joint.children();
    if children.is_empty() {
        return Err(BvhError::DegenerateSkeleton {
            joint: joint.name().to_string(),
        });
    }

    let sum: DVec3 = children
        .iter()
        .map(|child| skeleton[*child].rest_pose().offset)
        .sum();
    Ok(sum / children.len() as f64)
}

/// Shortest rotation taking [`UP_AXIS`] onto `direction`
///
/// A zero-length direction maps to the identity. Directions pointing straight
/// down get a half turn about X.
pub fn rotation_from_up(direction: DVec3) -> DQuat {
    let direction = if direction.length_squared() < ZERO_LENGTH_SQUARED {
        UP_AXIS
    } else {
        direction.normalize()
    };

    let dot = UP_AXIS.dot(direction);
    if dot < -PARALLEL_THRESHOLD {
        DQuat::from_xyzw(1.0, 0.0, 0.0, 0.0)
    } else if dot > PARALLEL_THRESHOLD {
        DQuat::IDENTITY
    } else {
        let axis = UP_AXIS.cross(direction).normalize();
        DQuat::from_axis_angle(axis, dot.acos())
    }
}
