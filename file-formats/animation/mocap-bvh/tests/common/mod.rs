//! Shared helpers for integration tests

use std::path::PathBuf;

/// Path of a fixture under `tests/data`
pub fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// A root with one child joint that ends in an End Site
///
/// `root_channels` and `child_channels` are the full `CHANNELS` lines.
pub fn two_joint_bvh(root_channels: &str, child_channels: &str, frames: usize, motion: &str) -> String {
    format!(
        "HIERARCHY
ROOT Hips
{{
  OFFSET 0 0 0
  {root_channels}
  JOINT Arm
  {{
    OFFSET 1 0 0
    {child_channels}
    End Site
    {{
      OFFSET 1 0 0
    }}
  }}
}}
MOTION
Frames: {frames}
Frame Time: 0.04
{motion}"
    )
}

pub const ROOT_ZXY: &str = "CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation";
pub const JOINT_ZXY: &str = "CHANNELS 3 Zrotation Xrotation Yrotation";

/// One motion line of zeros for the two-joint skeleton
pub const ZERO_FRAME: &str = "0 0 0 0 0 0 0 0 0\n";
