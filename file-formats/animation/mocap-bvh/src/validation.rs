//! Validation functions for parsed skeletons

use crate::channel::RotationOrder;
use crate::error::{BvhError, Result};
use crate::hierarchy::{JOINT_CHANNELS, ROOT_CHANNELS};
use crate::skeleton::Skeleton;

/// Check that every joint shares the root's rotation-axis order and record it
///
/// Runs once after the hierarchy is parsed and before any motion line is
/// read. The first joint that disagrees with the root is reported together
/// with the root.
pub fn validate_rotation_orders(skeleton: &mut Skeleton) -> Result<()> {
    let mut joints = skeleton.joints();
    let Some(root) = joints.next() else {
        return Ok(());
    };
    let expected = RotationOrder::from_channels(root.channels())?;

    for joint in joints {
        let order = RotationOrder::from_channels(joint.channels())?;
        if order != expected {
            return Err(BvhError::RotationOrderMismatch {
                joint: joint.name().to_string(),
                order: order.to_string(),
                expected_joint: root.name().to_string(),
                expected_order: expected.to_string(),
            });
        }
    }

    skeleton.rotation_order = expected;
    Ok(())
}

/// Validates a fully evaluated skeleton against the model invariants
pub fn validate_skeleton(skeleton: &Skeleton) -> Result<()> {
    validate_tree(skeleton)?;
    validate_channels(skeleton)?;
    validate_poses(skeleton)?;
    Ok(())
}

/// Exactly one root, every other node has a parent created before it
fn validate_tree(skeleton: &Skeleton) -> Result<()> {
    let roots = skeleton.nodes().iter().filter(|j| j.is_root()).count();
    if roots != 1 {
        return Err(BvhError::Validation(format!(
            "expected exactly one root, found {roots}"
        )));
    }

    for (index, joint) in skeleton.nodes().iter().enumerate() {
        match joint.parent() {
            None if joint.is_root() => {}
            Some(parent) if parent.index() < index => {}
            _ => {
                return Err(BvhError::Validation(format!(
                    "joint '{}' has no valid parent",
                    joint.name()
                )));
            }
        }
        if !joint.is_end_site() && joint.children().is_empty() {
            return Err(BvhError::DegenerateSkeleton {
                joint: joint.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Per-joint channel counts add up to the declared total
fn validate_channels(skeleton: &Skeleton) -> Result<()> {
    let mut total = 0;
    for joint in skeleton.joints() {
        let expected = if joint.is_root() {
            ROOT_CHANNELS
        } else {
            JOINT_CHANNELS
        };
        if joint.channels().len() != expected {
            return Err(BvhError::ChannelCount {
                joint: joint.name().to_string(),
                expected,
                found: joint.channels().len(),
            });
        }
        total += expected;
    }

    if total != skeleton.channel_count() {
        return Err(BvhError::Validation(format!(
            "channel total mismatch: joints declare {total}, skeleton records {}",
            skeleton.channel_count()
        )));
    }
    Ok(())
}

/// Animated joints carry one pose entry per frame, End Sites carry none
fn validate_poses(skeleton: &Skeleton) -> Result<()> {
    for joint in skeleton.joints() {
        let found = joint.pose().map_or(0, |pose| pose.frame_count());
        if found != skeleton.frame_count() {
            return Err(BvhError::FrameCount {
                expected: skeleton.frame_count(),
                found,
            });
        }
    }
    if let Some(end) = skeleton.end_sites().find(|end| end.pose().is_some()) {
        return Err(BvhError::Validation(format!(
            "End Site '{}' must not be animated",
            end.name()
        )));
    }
    Ok(())
}
