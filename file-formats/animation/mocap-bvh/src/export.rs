//! Name-keyed projection of a skeleton for serialization
//!
//! Arena indices are meaningless outside the process, so parent and child
//! links are replaced by joint names. Encoding is up to the caller.

use serde::Serialize;

use crate::channel::{Channel, RotationOrder};
use crate::skeleton::{Joint, Pose, RestPose, Skeleton};

/// A whole BVH file: frame metadata plus every node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BvhDocument {
    pub fps: f64,
    pub frame_time: f64,
    pub num_frames: usize,
    pub rotation_order: RotationOrder,
    pub num_channels: usize,
    pub joints: Vec<JointDocument>,
    pub end_sites: Vec<JointDocument>,
}

/// One joint or End Site with its links resolved to names
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointDocument {
    pub name: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub depth: usize,
    pub is_root: bool,
    pub is_leaf: bool,
    pub is_end_site: bool,
    pub channels: Vec<Channel>,
    pub rest_pose: RestPose,
    /// Absent for End Sites
    pub pose: Option<Pose>,
}

impl BvhDocument {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            fps: skeleton.frame_rate(),
            frame_time: skeleton.frame_time(),
            num_frames: skeleton.frame_count(),
            rotation_order: skeleton.rotation_order(),
            num_channels: skeleton.channel_count(),
            joints: skeleton
                .joints()
                .map(|joint| JointDocument::new(skeleton, joint))
                .collect(),
            end_sites: skeleton
                .end_sites()
                .map(|joint| JointDocument::new(skeleton, joint))
                .collect(),
        }
    }
}

impl JointDocument {
    fn new(skeleton: &Skeleton, joint: &Joint) -> Self {
        Self {
            name: joint.name().to_string(),
            parent: joint
                .parent()
                .map(|parent| skeleton[parent].name().to_string()),
            children: joint
                .children()
                .iter()
                .map(|child| skeleton[*child].name().to_string())
                .collect(),
            depth: joint.depth(),
            is_root: joint.is_root(),
            is_leaf: joint.is_leaf(),
            is_end_site: joint.is_end_site(),
            channels: joint.channels().to_vec(),
            rest_pose: *joint.rest_pose(),
            pose: joint.pose().cloned(),
        }
    }
}

impl From<&Skeleton> for BvhDocument {
    fn from(skeleton: &Skeleton) -> Self {
        Self::from_skeleton(skeleton)
    }
}
