use std::path::Path;
use tempfile::NamedTempFile;
use zsh_trace_studio::aggregator::build_call_tree;
use zsh_trace_studio::output::{read_profile, to_speedscope_file, validate_path, write_profile};
use zsh_trace_studio::parser::{parse_trace_text, SpeedscopeFile};

fn create_test_profile() -> SpeedscopeFile {
    let parsed = parse_trace_text(
        "\
+0mZ|1|100.0|funcA|a.sh|10> echo a
+0mZ|2|100.5|funcB|a.sh|20> echo b
+0mZ|1|101.0|funcA|a.sh|10> echo a2
",
    );
    to_speedscope_file("trace.log", build_call_tree(&parsed.entries))
}

#[test]
fn test_write_and_read_profile() {
    let profile = create_test_profile();
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    write_profile(&profile, path).unwrap();
    let loaded = read_profile(path).unwrap();

    assert_eq!(loaded, profile);
}

#[test]
fn test_written_document_shape() {
    let profile = create_test_profile();
    let temp_file = NamedTempFile::new().unwrap();
    write_profile(&profile, temp_file.path()).unwrap();

    let text = std::fs::read_to_string(temp_file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(value["name"], "Zsh Trace Flamegraph");
    assert_eq!(value["activeProfileIndex"], 0);
    assert_eq!(value["profiles"][0]["type"], "evented");
    assert_eq!(value["profiles"][0]["name"], "trace.log");
    assert_eq!(value["profiles"][0]["unit"], "seconds");
    assert_eq!(value["profiles"][0]["startValue"], 100.0);
    assert_eq!(value["profiles"][0]["endValue"], 101.0);
    assert_eq!(value["profiles"][0]["events"][0]["type"], "O");
    assert_eq!(value["profiles"][0]["events"][2]["type"], "C");
    assert_eq!(value["shared"]["frames"][0]["line"], 10);
    assert_eq!(value["shared"]["frames"][1]["executedCode"][0]["code"], "echo b");
}

#[test]
fn test_empty_trace_document() {
    let profile = to_speedscope_file("empty.log", build_call_tree(&[]));

    assert!(profile.shared.frames.is_empty());
    assert!(profile.profiles[0].events.is_empty());
    assert_eq!(profile.profiles[0].start_value, 0.0);
    assert_eq!(profile.profiles[0].end_value, 0.0);
}

#[test]
fn test_validate_output_path_empty() {
    let result = validate_path(Path::new(""));
    assert!(result.is_err());
}

#[test]
fn test_validate_output_path_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let result = validate_path(temp_dir.path());
    assert!(result.is_err());
}

#[test]
fn test_write_creates_parent_dirs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let nested_path = temp_dir.path().join("nested/dirs/profile.json");

    write_profile(&create_test_profile(), &nested_path).unwrap();

    assert!(nested_path.exists());
}
