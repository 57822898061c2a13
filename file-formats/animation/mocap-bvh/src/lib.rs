//! Parser and forward-kinematics evaluator for BVH motion-capture files
//!
//! A BVH file has two sections: a `HIERARCHY` describing the joint tree with
//! parent-relative offsets and animated channels, and a `MOTION` block with one
//! line of channel values per frame. This crate reads both and evaluates:
//!
//! - a frame-independent rest pose for every joint and End Site
//! - per-frame global position and orientation for every animated joint
//!
//! ## Example
//!
//! ```no_run
//! use mocap_bvh::BvhParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let skeleton = BvhParser::new().parse_file("walk.bvh")?;
//!
//! for joint in skeleton.joints() {
//!     if let Some(pose) = joint.pose() {
//!         println!("{}: {:?}", joint.name(), pose.global_position[0]);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize` on the model types and the [`BvhDocument`] export
//! - `parallel`: evaluate frames on the rayon thread pool

pub mod channel;
pub mod error;
#[cfg(feature = "serde")]
pub mod export;
pub mod hierarchy;
pub mod motion;
pub mod parser;
pub mod pose;
pub mod rest_pose;
pub mod rotation;
pub mod skeleton;
pub mod source;
pub mod validation;

pub use channel::{Axis, Channel, RotationOrder};
pub use error::{BvhError, Result};
#[cfg(feature = "serde")]
pub use export::{BvhDocument, JointDocument};
pub use hierarchy::HierarchyParser;
pub use motion::MotionParser;
pub use parser::BvhParser;
pub use pose::{FrameTransform, PoseCalculator};
pub use rest_pose::RestPoseCalculator;
pub use rotation::quat_from_euler_degrees;
pub use skeleton::{Joint, JointId, Pose, RestPose, Skeleton};
pub use validation::validate_skeleton;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
