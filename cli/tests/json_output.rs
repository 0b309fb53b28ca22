use std::process::Command;
use tempfile::TempDir;

#[test]
fn test_json_format_keeps_stdout_parseable() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("contacts.txt");
    std::fs::write(&input, "# contacts\n1 2\n2 3\n3 1\n3 4\n4 5\n").unwrap();

    // No config.yaml in the working directory, so defaults apply with a warning
    let output = Command::new(env!("CARGO_BIN_EXE_commgraph"))
        .current_dir(dir.path())
        .arg("--data")
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out"))
        .args(["--skip-viz", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["basic"]["num_nodes"], 5);
    assert!(value["written"].as_array().unwrap().len() >= 7);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Starting analysis"));
}
