//! Forward kinematics over the motion samples
//!
//! Each frame is evaluated in one pass over the animated joints in creation
//! order, so a parent's transform is always ready before its children read
//! it. Frames do not depend on each other; with the `parallel` feature they
//! can be evaluated on the rayon thread pool and scattered back afterwards.

use glam::{DQuat, DVec3};
use log::debug;

use crate::error::{BvhError, Result};
use crate::skeleton::{JointId, Skeleton};

/// World-space transform of one joint for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    pub global_position: DVec3,
    pub global_rotation: DQuat,
    /// Local position delta from the rest pose
    pub position_from_rest: DVec3,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self {
            global_position: DVec3::ZERO,
            global_rotation: DQuat::IDENTITY,
            position_from_rest: DVec3::ZERO,
        }
    }
}

/// Evaluates global transforms for every animated joint and frame
#[derive(Debug, Default, Clone)]
pub struct PoseCalculator {
    parallel: bool,
}

impl PoseCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spread frames across the rayon thread pool
    ///
    /// Has no effect unless the crate is built with the `parallel` feature.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Whether frames will actually be evaluated in parallel
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "parallel") && self.parallel
    }

    /// Fill in the global transforms of every joint's [`Pose`](crate::Pose)
    ///
    /// Expects the rest pose to be computed and the motion samples to be
    /// loaded. The root's global positions are read from the samples and left
    /// untouched.
    pub fn compute(&self, skeleton: &mut Skeleton) -> Result<()> {
        let frames = self.evaluate(skeleton)?;
        let joints: Vec<JointId> = skeleton.joint_ids().to_vec();

        for (frame, transforms) in frames.into_iter().enumerate() {
            for &id in &joints {
                let transform = transforms[id.index()];
                let pose = skeleton
                    .node_mut(id)
                    .pose
                    .as_mut()
                    .ok_or_else(|| missing_pose(id))?;
                pose.global_position[frame] = transform.global_position;
                pose.global_rotation[frame] = transform.global_rotation;
                pose.position_from_rest[frame] = transform.position_from_rest;
            }
        }

        debug!(
            "Evaluated {} frames for {} joints{}",
            skeleton.frame_count(),
            joints.len(),
            if self.is_parallel() { " in parallel" } else { "" }
        );
        Ok(())
    }

    /// Transforms of every node for a single frame, indexed by [`JointId`]
    ///
    /// End Site entries are left at the identity transform.
    pub fn compute_frame(skeleton: &Skeleton, frame: usize) -> Result<Vec<FrameTransform>> {
        let mut transforms = vec![FrameTransform::default(); skeleton.nodes().len()];

        for &id in skeleton.joint_ids() {
            let joint = &skeleton[id];
            let pose = joint.pose().ok_or_else(|| missing_pose(id))?;
            let rest = joint.rest_pose();
            let local_rotation = *pose.rotation_from_rest.get(frame).ok_or_else(|| {
                BvhError::Validation(format!(
                    "frame {frame} out of range for joint '{}'",
                    joint.name()
                ))
            })?;

            transforms[id.index()] = match joint.parent() {
                None => {
                    let global_position = pose.global_position[frame];
                    FrameTransform {
                        global_position,
                        global_rotation: local_rotation,
                        position_from_rest: global_position - rest.global_position,
                    }
                }
                Some(parent) => {
                    let parent = transforms[parent.index()];
                    let rotated = local_rotation * rest.offset;
                    FrameTransform {
                        global_position: parent.global_position + rotated,
                        global_rotation: parent.global_rotation * local_rotation,
                        position_from_rest: rotated - rest.offset,
                    }
                }
            };
        }

        Ok(transforms)
    }

    fn evaluate(&self, skeleton: &Skeleton) -> Result<Vec<Vec<FrameTransform>>> {
        let frame_count = skeleton.frame_count();

        #[cfg(feature = "parallel")]
        if self.is_parallel() {
            use rayon::prelude::*;

            return (0..frame_count)
                .into_par_iter()
                .map(|frame| Self::compute_frame(skeleton, frame))
                .collect();
        }

        (0..frame_count)
            .map(|frame| Self::compute_frame(skeleton, frame))
            .collect()
    }
}

fn missing_pose(id: JointId) -> BvhError {
    BvhError::Validation(format!(
        "joint #{} has no motion samples; parse motion before evaluating poses",
        id.index()
    ))
}
