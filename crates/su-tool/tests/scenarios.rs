use std::path::PathBuf;

use su_tool::{assert_case, discover_cases};

fn scenarios_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("scenarios")
}

#[test]
fn all_recorded_scenarios_pass() {
    let cases = discover_cases(&scenarios_root()).expect("scenarios root must hold cases");
    assert!(cases.len() >= 8, "expected the recorded scenarios, got {:?}", cases);

    for case_path in cases {
        if let Err(error) = assert_case(&case_path) {
            panic!("scenario {} failed: {}", case_path.display(), error);
        }
    }
}
