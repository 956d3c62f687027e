use grimhall_choreo_core::{parse_stored_clip_json, Easing, Value};

#[test]
fn parses_scalar_clip_with_default_easing() {
    let doc = r#"{
        "name": "swing",
        "target": "hero/ArmR.rotation",
        "keys": [
            { "frame": 0, "value": 0.0 },
            { "frame": 12, "value": 1.5 }
        ]
    }"#;
    let clip = parse_stored_clip_json(doc).expect("parse");
    assert_eq!(clip.name, "swing");
    assert_eq!(clip.target_path, "hero/ArmR.rotation");
    assert_eq!(clip.length(), 12);
    assert_eq!(clip.easing, Easing::Linear);
    assert_eq!(clip.keys[1].value, Value::Float(1.5));
}

#[test]
fn parses_vector_and_quaternion_values() {
    let doc = r#"{
        "name": "step",
        "target": "hero/Root.translation",
        "easing": "ease-in-out",
        "keys": [
            { "frame": 0, "value": { "x": 0, "y": 0, "z": 0 } },
            { "frame": 6, "value": { "x": 0, "y": 0, "z": 1, "w": 0 } }
        ]
    }"#;
    let clip = parse_stored_clip_json(doc).expect("parse");
    assert_eq!(clip.easing, Easing::EaseInOut);
    assert_eq!(clip.keys[0].value, Value::Vec3([0.0, 0.0, 0.0]));
    assert_eq!(clip.keys[1].value, Value::Quat([0.0, 0.0, 1.0, 0.0]));
}

#[test]
fn rejects_unordered_keys() {
    let doc = r#"{
        "name": "bad",
        "target": "hero/ArmR.rotation",
        "keys": [
            { "frame": 8, "value": 0.0 },
            { "frame": 3, "value": 1.0 }
        ]
    }"#;
    assert!(parse_stored_clip_json(doc).is_err());
}

#[test]
fn rejects_malformed_json() {
    assert!(parse_stored_clip_json("{ not json").is_err());
}
