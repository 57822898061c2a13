//! Export projection of a parsed skeleton

use mocap_bvh::{BvhDocument, BvhParser};
use pretty_assertions::assert_eq;

use crate::common::data_path;

#[test]
fn test_document_mirrors_skeleton() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();
    let document = BvhDocument::from_skeleton(&skeleton);

    assert_eq!(document.num_frames, 3);
    assert_eq!(document.num_channels, 24);
    assert_eq!(document.joints.len(), 7);
    assert_eq!(document.end_sites.len(), 3);

    let right_leg = document
        .joints
        .iter()
        .find(|joint| joint.name == "RightLeg")
        .unwrap();
    assert_eq!(right_leg.parent.as_deref(), Some("RightUpLeg"));
    assert_eq!(right_leg.children, ["RightLeg_End"]);
    assert_eq!(right_leg.depth, 2);
    assert!(right_leg.is_leaf);
    assert_eq!(right_leg.pose.as_ref().map(|pose| pose.frame_count()), Some(3));
}

#[test]
fn test_json_round_trip_shape() {
    let skeleton = BvhParser::new().parse_file(data_path("walk.bvh")).unwrap();
    let json = serde_json::to_string_pretty(&BvhDocument::from(&skeleton)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["rotation_order"], "ZXY");
    assert_eq!(value["joints"][0]["name"], "Hips");
    assert_eq!(value["joints"][0]["channels"][3], "Zrotation");
    assert_eq!(value["end_sites"][0]["parent"], "Head");
    // DVec3 is written as a plain [x, y, z] array
    assert_eq!(value["end_sites"][0]["rest_pose"]["offset"], serde_json::json!([0.0, 8.0, 0.0]));
}
