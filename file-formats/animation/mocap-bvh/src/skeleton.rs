//! Skeleton model: the joint tree with rest-pose and per-frame pose storage
//!
//! Joints live in an arena owned by [`Skeleton`] and refer to each other by
//! [`JointId`]. Children are owned index lists, the parent is a plain lookup
//! index. Creation order is parent-before-child, which every pose stage relies
//! on when it walks the arena front to back.

use std::fmt;
use std::ops::Index;

use glam::{DQuat, DVec3};

use crate::channel::{Channel, RotationOrder};

/// Index of a node in the skeleton arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct JointId(pub(crate) usize);

impl JointId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Frame-independent reference transform of a joint
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RestPose {
    /// Position in world space
    pub global_position: DVec3,
    /// Orientation in world space, aligning +Y with the bone direction
    pub global_rotation: DQuat,
    /// Parent-relative translation, the `OFFSET` line of the file
    pub offset: DVec3,
    /// Rotation taking the parent's rest orientation to this one
    ///
    /// Kept for inspection only; per-frame evaluation does not read it.
    pub rotation_from_parent: DQuat,
}

impl Default for RestPose {
    fn default() -> Self {
        Self {
            global_position: DVec3::ZERO,
            global_rotation: DQuat::IDENTITY,
            offset: DVec3::ZERO,
            rotation_from_parent: DQuat::IDENTITY,
        }
    }
}

/// Per-frame transforms of an animated joint, each indexed by frame number
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pose {
    /// Position in world space
    pub global_position: Vec<DVec3>,
    /// Orientation in world space
    pub global_rotation: Vec<DQuat>,
    /// Local position delta from the rest pose
    pub position_from_rest: Vec<DVec3>,
    /// Local rotation from the motion channels
    pub rotation_from_rest: Vec<DQuat>,
}

impl Pose {
    /// Allocate storage for `frames` frames, filled with identity transforms
    pub fn with_frames(frames: usize) -> Self {
        Self {
            global_position: vec![DVec3::ZERO; frames],
            global_rotation: vec![DQuat::IDENTITY; frames],
            position_from_rest: vec![DVec3::ZERO; frames],
            rotation_from_rest: vec![DQuat::IDENTITY; frames],
        }
    }

    /// Number of frames stored
    pub fn frame_count(&self) -> usize {
        self.global_position.len()
    }
}

/// A node of the skeleton tree: an animated joint or an End Site
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub(crate) name: String,
    pub(crate) parent: Option<JointId>,
    pub(crate) children: Vec<JointId>,
    pub(crate) depth: usize,
    pub(crate) is_root: bool,
    pub(crate) is_leaf: bool,
    pub(crate) is_end_site: bool,
    pub(crate) channels: Vec<Channel>,
    /// Index of the first channel of this joint within a motion line
    pub(crate) channel_offset: usize,
    pub(crate) rest_pose: RestPose,
    pub(crate) pose: Option<Pose>,
}

impl Joint {
    pub(crate) fn new(name: impl Into<String>, parent: Option<JointId>, depth: usize) -> Self {
        Self {
            name: name.into(),
            parent,
            children: Vec::new(),
            depth,
            is_root: parent.is_none(),
            is_leaf: false,
            is_end_site: false,
            channels: Vec::new(),
            channel_offset: 0,
            rest_pose: RestPose::default(),
            pose: None,
        }
    }

    pub(crate) fn end_site(name: impl Into<String>, parent: JointId, depth: usize) -> Self {
        Self {
            is_end_site: true,
            ..Self::new(name, Some(parent), depth)
        }
    }

    /// Joint name (End Sites are named after their parent with an `_End` suffix)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<JointId> {
        self.parent
    }

    /// Child nodes in declaration order, End Sites included
    pub fn children(&self) -> &[JointId] {
        &self.children
    }

    /// Nesting depth, 0 for the root
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    /// Whether the joint terminates in an End Site
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    pub fn is_end_site(&self) -> bool {
        self.is_end_site
    }

    /// Channel layout in file order (empty for End Sites)
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Index of the first channel of this joint within a motion line
    pub fn channel_offset(&self) -> usize {
        self.channel_offset
    }

    pub fn rest_pose(&self) -> &RestPose {
        &self.rest_pose
    }

    /// Per-frame pose, `None` for End Sites
    pub fn pose(&self) -> Option<&Pose> {
        self.pose.as_ref()
    }
}

/// A parsed BVH file: joint tree, frame metadata, rest pose and animation
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    pub(crate) nodes: Vec<Joint>,
    pub(crate) joints: Vec<JointId>,
    pub(crate) end_sites: Vec<JointId>,
    pub(crate) frame_count: usize,
    pub(crate) frame_time: f64,
    pub(crate) frame_rate: f64,
    pub(crate) rotation_order: RotationOrder,
    pub(crate) channel_count: usize,
}

impl Skeleton {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            joints: Vec::new(),
            end_sites: Vec::new(),
            frame_count: 0,
            frame_time: 0.0,
            frame_rate: 0.0,
            rotation_order: RotationOrder::default(),
            channel_count: 0,
        }
    }

    /// Append a node to the arena and link it under its parent
    pub(crate) fn push(&mut self, joint: Joint) -> JointId {
        let id = JointId(self.nodes.len());
        if let Some(parent) = joint.parent {
            let parent = &mut self.nodes[parent.0];
            parent.children.push(id);
            if joint.is_end_site {
                parent.is_leaf = true;
            }
        }
        if joint.is_end_site {
            self.end_sites.push(id);
        } else {
            self.joints.push(id);
        }
        self.nodes.push(joint);
        id
    }

    pub(crate) fn node_mut(&mut self, id: JointId) -> &mut Joint {
        &mut self.nodes[id.0]
    }

    /// The root joint
    pub fn root(&self) -> &Joint {
        &self.nodes[0]
    }

    /// Id of the root joint, always the first node created
    pub fn root_id(&self) -> JointId {
        JointId(0)
    }

    /// Look up a node by id
    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.nodes.get(id.0)
    }

    /// Find a node by name
    pub fn find(&self, name: &str) -> Option<JointId> {
        self.nodes
            .iter()
            .position(|joint| joint.name == name)
            .map(JointId)
    }

    /// Parent of a node
    pub fn parent(&self, id: JointId) -> Option<&Joint> {
        self.joint(id)?.parent.map(|parent| &self[parent])
    }

    /// Children of a node in declaration order
    pub fn children(&self, id: JointId) -> impl Iterator<Item = &Joint> {
        self.joint(id)
            .map(|joint| joint.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|child| &self[*child])
    }

    /// Ids of animated joints in creation order (the motion channel order)
    pub fn joint_ids(&self) -> &[JointId] {
        &self.joints
    }

    /// Animated joints in creation order
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter().map(|id| &self[*id])
    }

    /// Ids of End Sites in creation order
    pub fn end_site_ids(&self) -> &[JointId] {
        &self.end_sites
    }

    /// End Sites in creation order
    pub fn end_sites(&self) -> impl Iterator<Item = &Joint> {
        self.end_sites.iter().map(|id| &self[*id])
    }

    /// Every node, joints and End Sites, in creation order
    pub fn nodes(&self) -> &[Joint] {
        &self.nodes
    }

    /// Number of animated joints
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Declared number of frames
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Seconds per frame
    pub fn frame_time(&self) -> f64 {
        self.frame_time
    }

    /// Frames per second
    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    /// Length of the clip in seconds
    pub fn duration(&self) -> f64 {
        self.frame_count as f64 * self.frame_time
    }

    /// Rotation-axis order shared by all joints
    pub fn rotation_order(&self) -> RotationOrder {
        self.rotation_order
    }

    /// Total number of channels in a motion line
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }
}

impl Index<JointId> for Skeleton {
    type Output = Joint;

    fn index(&self, id: JointId) -> &Joint {
        &self.nodes[id.0]
    }
}

impl fmt::Display for Skeleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BVH skeleton ({} joints, {} end sites, {} channels, {} frames at {:.2} fps, {})",
            self.joints.len(),
            self.end_sites.len(),
            self.channel_count,
            self.frame_count,
            self.frame_rate,
            self.rotation_order
        )
    }
}
