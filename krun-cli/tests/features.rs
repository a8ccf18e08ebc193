use predicates::prelude::*;

mod common;

#[test]
fn test_features_table() {
    common::krunctl()
        .arg("features")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Compile-time features")
                .and(predicate::str::contains("Networking"))
                .and(predicate::str::contains("Virgl Resource Map2")),
        );
}

#[test]
fn test_features_json() {
    let output = common::krunctl()
        .args(["features", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["native_library"], krun::native_available());
    assert_eq!(json["features"].as_array().map(Vec::len), Some(11));
    if !krun::native_available() {
        assert!(json["max_vcpus"].is_null());
        assert_eq!(json["features"][0][1]["status"], "unsupported");
    }
}
