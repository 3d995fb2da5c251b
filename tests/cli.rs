use std::io::Write;

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn frames(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn script_drives_layout() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_file(
        &dir,
        "script.txt",
        "# comment\nkey Ctrl+g\nopen terminal\nresize 1600 900\nterm windows\nmaximize about\n",
    );

    let output = test_bin::get_test_bin("deskfolio")
        .args(["--no-persist", "--script"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let frames = frames(&output.stdout);
    assert_eq!(frames.len(), 5);

    assert_eq!(frames[0]["layout"], "grid");
    assert_eq!(frames[0]["positions"].as_object().unwrap().len(), 1);

    let opened = &frames[1];
    assert_eq!(opened["active"], "terminal");
    assert_eq!(opened["taskbar"], serde_json::json!(["about", "terminal"]));
    let positions = opened["positions"].as_object().unwrap();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions["about"]["width"], positions["terminal"]["width"]);

    assert!(frames[3]["output"].as_str().unwrap().contains("about"));

    let maximized = &frames[4]["positions"]["about"];
    assert_eq!(maximized["top"], 50.0);
    assert_eq!(maximized["left"], 8.0);
    assert_eq!(maximized["width"], 1584.0);
}

#[test]
fn custom_config_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        &dir,
        "deskfolio.toml",
        "[settings]\npersist_preferences = false\n\n[settings.layout]\nmode = \"main-vertical\"\n\n\
         [[settings.windows]]\nid = \"notes\"\ntitle = \"Notes\"\n",
    );
    let script = write_file(&dir, "script.txt", "windows\n");

    let output = test_bin::get_test_bin("deskfolio")
        .arg("--config")
        .arg(&config)
        .arg("--script")
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let frames = frames(&output.stdout);
    assert_eq!(frames[0]["layout"], "main-vertical");
    assert_eq!(frames[0]["active"], "notes");
    assert!(frames[0]["output"].as_str().unwrap().contains("Notes"));
}

#[test]
fn validate_reports_bad_values() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(&dir, "deskfolio.toml", "[settings.layout]\ngap = -4.0\n");

    let output = test_bin::get_test_bin("deskfolio")
        .arg("--config")
        .arg(&config)
        .arg("--validate")
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gap must be non-negative"));
}
