//! Error reporting for malformed BVH input

use mocap_bvh::{BvhError, BvhParser};
use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::common::{JOINT_ZXY, ROOT_ZXY, ZERO_FRAME, two_joint_bvh};

fn parse(text: &str) -> mocap_bvh::Result<mocap_bvh::Skeleton> {
    BvhParser::new().parse_str(text)
}

#[test_case(
    "CHANNELS 3 Zrotation Xrotation Yrotation", JOINT_ZXY, "Hips", 6, 3 ;
    "root with three channels"
)]
#[test_case(
    ROOT_ZXY,
    "CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation",
    "Arm",
    3,
    6 ;
    "joint with six channels"
)]
fn test_channel_count_rejected(
    root: &str,
    child: &str,
    joint_name: &str,
    expected_count: usize,
    found_count: usize,
) {
    let text = two_joint_bvh(root, child, 1, ZERO_FRAME);
    match parse(&text) {
        Err(BvhError::ChannelCount {
            joint,
            expected,
            found,
        }) => {
            assert_eq!(joint, joint_name);
            assert_eq!(expected, expected_count);
            assert_eq!(found, found_count);
        }
        other => panic!("expected channel count error, got {other:?}"),
    }
}

#[test]
fn test_rotation_order_mismatch_names_both_joints() {
    let text = two_joint_bvh(
        ROOT_ZXY,
        "CHANNELS 3 Xrotation Yrotation Zrotation",
        1,
        ZERO_FRAME,
    );
    let err = parse(&text).unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, BvhError::RotationOrderMismatch { .. }));
    assert!(message.contains("'Arm'"), "{message}");
    assert!(message.contains("'Hips'"), "{message}");
    assert!(message.contains("XYZ") && message.contains("ZXY"), "{message}");
}

#[test]
fn test_repeated_rotation_axis_is_unsupported() {
    let text = two_joint_bvh(
        "CHANNELS 6 Xposition Yposition Zposition Xrotation Xrotation Yrotation",
        "CHANNELS 3 Xrotation Xrotation Yrotation",
        1,
        ZERO_FRAME,
    );
    assert!(matches!(
        parse(&text),
        Err(BvhError::UnsupportedRotationOrder(order)) if order == "XXY"
    ));
}

#[test_case("HIERARCHY\n", "ROOT Hips\nHIERARCHY\n" ; "missing header")]
#[test_case("  }\n}\nMOTION", "  }\n}\n}\nMOTION" ; "unmatched closing brace")]
#[test_case("  }\n}\nMOTION", "  }\nMOTION" ; "motion inside open joint")]
#[test_case("MOTION\n", "ROOT Other\n{\n}\nMOTION\n" ; "second root")]
#[test_case("Xrotation Yrotation\n", "Xrotation Wrotation\n" ; "unknown channel token")]
#[test_case("OFFSET 1 0 0\n    }", "}" ; "end site without offset")]
#[test_case("OFFSET 1 0 0\n    CHANNELS", "OFFSET 1 0\n    CHANNELS" ; "offset with two values")]
#[test_case("Frame Time: 0.04", "Frame Time: 0" ; "zero frame time")]
#[test_case("Frames: 1\nFrame Time: 0.04", "Frame Time: 0.04\nFrames: 1" ; "frame time before frames")]
#[test_case("MOTION", "BOGUS line\nMOTION" ; "unrecognized keyword")]
fn test_structural_errors(from: &str, to: &str) {
    let text = two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 1, ZERO_FRAME).replacen(from, to, 1);
    assert_ne!(
        text,
        two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 1, ZERO_FRAME),
        "fixture edit did not apply"
    );
    match parse(&text) {
        Err(BvhError::Structural { line, .. }) => assert!(line > 0),
        other => panic!("expected structural error, got {other:?}"),
    }
}

#[test]
fn test_truncated_hierarchy() {
    let text = two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 1, ZERO_FRAME);
    let truncated = &text[..text.find("MOTION").unwrap()];
    let err = parse(truncated).unwrap_err();
    assert!(err.to_string().contains("Frame Time"), "{err}");
}

#[test]
fn test_joint_without_channels() {
    let text = two_joint_bvh(ROOT_ZXY, "", 1, ZERO_FRAME);
    assert!(matches!(
        parse(&text),
        Err(BvhError::ChannelCount { joint, found: 0, .. }) if joint == "Arm"
    ));
}

#[test_case("OFFSET 1 0 0", "OFFSET 1 abc 0", "OFFSET y", "abc" ; "offset component")]
#[test_case("Frames: 1", "Frames: many", "frame count", "many" ; "frame count")]
#[test_case("0 0 0 0 0 0 0 0 0", "0 0 0 0 0 0 0 0 1e", "channel 8 of frame 0", "1e" ; "motion value")]
fn test_numeric_errors(from: &str, to: &str, expected_field: &str, expected_value: &str) {
    let text = two_joint_bvh(ROOT_ZXY, JOINT_ZXY, 1, ZERO_FRAME).replacen(from, to, 1);
    match parse(&text) {
        Err(BvhError::NumericFormat { field, value, .. }) => {
            assert_eq!(field, expected_field);
            assert_eq!(value, expected_value);
        }
        other => panic!("expected numeric error, got {other:?}"),
    }
}

#[test]
fn test_io_error_for_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = BvhParser::new()
        .parse_file(dir.path().join("missing.bvh"))
        .unwrap_err();
    assert!(matches!(err, BvhError::Io(_)));
}
