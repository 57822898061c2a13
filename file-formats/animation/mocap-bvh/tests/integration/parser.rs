//! Integration tests for the BVH parser on fixture files

use std::fs::File;
use std::io::{BufReader, Write};

use glam::DVec3;
use mocap_bvh::{BvhParser, Joint, RotationOrder, validate_skeleton};
use pretty_assertions::assert_eq;

use crate::common::{ROOT_ZXY, JOINT_ZXY, ZERO_FRAME, data_path, two_joint_bvh};

#[test]
fn test_walk_metadata() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();

    assert_eq!(skeleton.joint_count(), 7);
    assert_eq!(skeleton.end_sites().count(), 3);
    assert_eq!(skeleton.channel_count(), 24);
    assert_eq!(skeleton.frame_count(), 3);
    assert_eq!(skeleton.rotation_order(), RotationOrder::Zxy);
    assert!((skeleton.frame_time() - 0.041667).abs() < 1e-12);
    assert!((skeleton.frame_rate() - 1.0 / 0.041667).abs() < 1e-9);
    assert!((skeleton.duration() - 3.0 * 0.041667).abs() < 1e-12);

    validate_skeleton(&skeleton).unwrap();
}

#[test]
fn test_walk_tree_shape() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();

    let names: Vec<&str> = skeleton.joints().map(Joint::name).collect();
    assert_eq!(
        names,
        ["Hips", "Spine", "Head", "LeftUpLeg", "LeftLeg", "RightUpLeg", "RightLeg"]
    );

    let hips = skeleton.find("Hips").unwrap();
    let children: Vec<&str> = skeleton.children(hips).map(Joint::name).collect();
    assert_eq!(children, ["Spine", "LeftUpLeg", "RightUpLeg"]);

    // Siblings below the first level attach to the right parent
    let parent_of = |name: &str| {
        skeleton
            .parent(skeleton.find(name).unwrap())
            .map(Joint::name)
    };
    assert_eq!(parent_of("LeftLeg"), Some("LeftUpLeg"));
    assert_eq!(parent_of("RightUpLeg"), Some("Hips"));
    assert_eq!(parent_of("RightLeg"), Some("RightUpLeg"));
    assert_eq!(parent_of("Head_End"), Some("Head"));

    let end_sites: Vec<(&str, usize)> = skeleton
        .end_sites()
        .map(|end| (end.name(), end.depth()))
        .collect();
    assert_eq!(
        end_sites,
        [("Head_End", 3), ("LeftLeg_End", 3), ("RightLeg_End", 3)]
    );
}

#[test]
fn test_channel_offsets_follow_declaration_order() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();

    let offsets: Vec<usize> = skeleton.joints().map(Joint::channel_offset).collect();
    assert_eq!(offsets, [0, 6, 9, 12, 15, 18, 21]);
}

#[test]
fn test_leaf_flags() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();

    let leaves: Vec<&str> = skeleton
        .joints()
        .filter(|joint| joint.is_leaf())
        .map(Joint::name)
        .collect();
    assert_eq!(leaves, ["Head", "LeftLeg", "RightLeg"]);
    assert!(skeleton.root().is_root());
    assert!(skeleton.end_sites().all(|end| end.pose().is_none()));
}

#[test]
fn test_root_translation_read_from_motion() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();
    let root = skeleton.root().pose().unwrap();

    assert_eq!(root.global_position[0], DVec3::new(0.0, 36.0, 0.0));
    assert_eq!(root.global_position[1], DVec3::new(1.5, 36.2, 2.0));
    assert_eq!(root.global_position[2], DVec3::new(3.0, 36.1, 4.0));
}

#[test]
fn test_parse_file_matches_reader() {
    let from_path = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();
    let file = File::open(data_path("walk.bvh")).unwrap();
    let from_reader = BvhParser::new().parse(BufReader::new(file)).unwrap();
    assert_eq!(from_path, from_reader);
}

#[test]
fn test_parse_file_from_temp_dir() {
    let text = two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 2, &ZERO_FRAME.repeat(2));
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();

    let skeleton = BvhParser::new().parse_file(file.path()).unwrap();
    assert_eq!(skeleton.frame_count(), 2);
    assert_eq!(skeleton.find("Arm_End").map(|id| id.index()), Some(2));
}

#[test]
fn test_crlf_and_blank_lines() {
    let text = two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 1, ZERO_FRAME)
        .replace('\n', "\r\n")
        .replace("MOTION", "\r\nMOTION\r\n");
    let skeleton = BvhParser::new().parse_str(&text).unwrap();
    assert_eq!(skeleton.joint_count(), 2);
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let sequential = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();
    let parallel = BvhParser::new()
        .with_parallel(true)
        .parse_file(data_path("walk.bvh"))
        .unwrap();
    assert_eq!(sequential, parallel);
}
