//! Rest pose and forward kinematics invariants on a full skeleton

use glam::{DQuat, DVec3};
use mocap_bvh::{BvhParser, RotationOrder, Skeleton, quat_from_euler_degrees};

use crate::common::data_path;

const EPSILON: f64 = 1e-9;

fn walk() -> Skeleton {
    BvhParser::new().parse_file(data_path("walk.bvh")).unwrap()
}

#[test]
fn test_rest_positions_accumulate_offsets() {
    let skeleton = walk();

    for joint in skeleton.nodes() {
        let rest = joint.rest_pose();
        let expected = match joint.parent() {
            None => rest.offset,
            Some(parent) => skeleton[parent].rest_pose().global_position + rest.offset,
        };
        assert!(
            rest.global_position.abs_diff_eq(expected, EPSILON),
            "{}: {} != {}",
            joint.name(),
            rest.global_position,
            expected
        );
    }

    let foot = skeleton.find("LeftLeg_End").unwrap();
    assert!(
        skeleton[foot]
            .rest_pose()
            .global_position
            .abs_diff_eq(DVec3::new(4.0, -37.0, 0.0), EPSILON)
    );
}

#[test]
fn test_rest_orientation_follows_bone_direction() {
    let skeleton = walk();

    // Legs point straight down, the spine straight up
    let leg = skeleton.find("LeftLeg").unwrap();
    let down = skeleton[leg].rest_pose().global_rotation * DVec3::Y;
    assert!(down.abs_diff_eq(DVec3::NEG_Y, EPSILON));

    let spine = skeleton.find("Spine").unwrap();
    assert!(
        skeleton[spine]
            .rest_pose()
            .global_rotation
            .abs_diff_eq(DQuat::IDENTITY, EPSILON)
    );

    // Hips average (0,10,0), (4,-2,0) and (-4,-2,0) into a +Y direction
    assert!(
        skeleton
            .root()
            .rest_pose()
            .global_rotation
            .abs_diff_eq(DQuat::IDENTITY, EPSILON)
    );
}

#[test]
fn test_rest_rotation_from_parent_recomposes() {
    let skeleton = walk();

    for joint in skeleton.nodes() {
        let rest = joint.rest_pose();
        let composed = match joint.parent() {
            None => rest.rotation_from_parent,
            Some(parent) => skeleton[parent].rest_pose().global_rotation * rest.rotation_from_parent,
        };
        assert!(
            composed.abs_diff_eq(rest.global_rotation, EPSILON),
            "{}",
            joint.name()
        );
    }
}

#[test]
fn test_forward_kinematics_every_frame() {
    let skeleton = walk();

    for &id in skeleton.joint_ids() {
        let joint = &skeleton[id];
        let Some(parent) = joint.parent() else {
            continue;
        };
        let pose = joint.pose().unwrap();
        let parent_pose = skeleton[parent].pose().unwrap();

        for frame in 0..skeleton.frame_count() {
            let local = pose.rotation_from_rest[frame];
            let expected =
                parent_pose.global_position[frame] + local * joint.rest_pose().offset;
            assert!(
                pose.global_position[frame].abs_diff_eq(expected, EPSILON),
                "{} frame {}",
                joint.name(),
                frame
            );

            let rotation = parent_pose.global_rotation[frame] * local;
            assert!(pose.global_rotation[frame].abs_diff_eq(rotation, EPSILON));
        }
    }
}

#[test]
fn test_root_orientation_is_local_rotation() {
    let skeleton = walk();
    let root = skeleton.root().pose().unwrap();

    // Frame 1: Zrotation 5, Xrotation -3, Yrotation 10
    let expected = quat_from_euler_degrees(DVec3::new(-3.0, 10.0, 5.0), RotationOrder::Zxy);
    assert!(root.rotation_from_rest[1].abs_diff_eq(expected, EPSILON));
    assert!(root.global_rotation[1].abs_diff_eq(expected, EPSILON));
}

#[test]
fn test_position_deltas() {
    let skeleton = walk();

    let root = skeleton.root();
    let pose = root.pose().unwrap();
    assert!(
        pose.position_from_rest[1]
            .abs_diff_eq(pose.global_position[1] - root.rest_pose().global_position, EPSILON)
    );

    for joint in skeleton.joints().filter(|joint| !joint.is_root()) {
        let pose = joint.pose().unwrap();
        let offset = joint.rest_pose().offset;
        for frame in 0..skeleton.frame_count() {
            let rotated = pose.rotation_from_rest[frame] * offset;
            assert!(pose.position_from_rest[frame].abs_diff_eq(rotated - offset, EPSILON));
        }
    }

    // Frame 0 has every rotation at zero
    let spine = skeleton.find("Spine").unwrap();
    assert!(
        skeleton[spine].pose().unwrap().position_from_rest[0].abs_diff_eq(DVec3::ZERO, EPSILON)
    );
}
