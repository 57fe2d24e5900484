use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use scx_core::sections::{Condition, Effect, Trigger};
use scx_core::{Bitmap, Scenario};
use serde_json::Value;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_scx"))
        .args(args)
        .output()
        .expect("failed to run scx CLI")
}

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!(
        "{prefix}_{}_{}.{ext}",
        std::process::id(),
        nanos
    ))
}

fn sample_scenario(with_bitmap: bool) -> Scenario {
    let mut trigger = Trigger::new("Timer", "Fires once");
    trigger.push_condition(Condition::timer(42));
    trigger.push_effect(Effect::activate_trigger(0));

    let mut scenario = Scenario {
        last_save_timestamp: 1_000_000,
        instructions: "Hold the ford".to_string(),
        player_count: 2,
        ..Scenario::new()
    };
    scenario.triggers.push(trigger);
    if with_bitmap {
        let palette = vec![[0, 0, 0, 0], [255, 255, 255, 0]];
        let bitmap = Bitmap::indexed8(3, 2, palette, &[0, 1, 0, 1, 0, 1]).expect("bitmap");
        scenario.messages.bitmap = Some(bitmap);
    }
    scenario
}

/// Writes `scenario` to a fresh temp file and returns its path.
fn write_sample(prefix: &str, scenario: &Scenario) -> PathBuf {
    let path = temp_path(prefix, "scx");
    fs::write(&path, scenario.encode().expect("encode sample")).expect("write sample");
    path
}

fn stdout_json(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
fn info_prints_summary_pairs() {
    let path = write_sample("scx_info", &sample_scenario(false));
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["info", &path_str]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("instructions=Hold the ford"), "{stdout}");
    assert!(stdout.contains("players=2"));
    assert!(stdout.contains("triggers=1"));
    assert!(stdout.contains("bitmap=none"));

    let _ = fs::remove_file(path);
}

#[test]
fn info_json_reports_bitmap_size() {
    let path = write_sample("scx_info_json", &sample_scenario(true));
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["info", "--json", &path_str]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["timestamp"], 1_000_000);
    assert_eq!(json["bitmap"]["width"], 3);
    assert_eq!(json["bitmap"]["height"], 2);
    assert_eq!(json["included_files"], 0);

    let _ = fs::remove_file(path);
}

#[test]
fn dump_round_trips_through_serde() {
    let scenario = sample_scenario(false);
    let path = write_sample("scx_dump", &scenario);
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["dump", &path_str]);
    assert!(output.status.success());
    let dumped: Scenario =
        serde_json::from_value(stdout_json(&output)).expect("dump should deserialize");
    assert_eq!(dumped, scenario);

    let _ = fs::remove_file(path);
}

#[test]
fn layout_json_lists_sections_in_order() {
    let path = write_sample("scx_layout", &sample_scenario(false));
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["layout", "--json", &path_str]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["validation_ok"], true);
    let sections = json["sections"]
        .as_array()
        .expect("sections should be an array");
    assert_eq!(sections.len(), 11);
    assert_eq!(sections[0]["id"], "header");
    assert_eq!(sections[0]["start"], 0);
    assert_eq!(sections[10]["id"], "included_files");
    assert_eq!(sections[10]["end"], json["body_len"]);

    let _ = fs::remove_file(path);
}

#[test]
fn triggers_lists_kinds() {
    let path = write_sample("scx_triggers", &sample_scenario(false));
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["triggers", &path_str]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0: Timer (1 conditions, 1 effects)"), "{stdout}");
    assert!(stdout.contains("if   Timer"));
    assert!(stdout.contains("then ActivateTrigger"));

    let _ = fs::remove_file(path);
}

#[test]
fn rewrite_reproduces_input_bytes() {
    let path = write_sample("scx_rewrite_in", &sample_scenario(true));
    let out = temp_path("scx_rewrite_out", "scx");
    let path_str = path.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();

    let output = run_cli(&["rewrite", &path_str, "--output", &out_str]);
    assert!(output.status.success());
    assert_eq!(
        fs::read(&out).expect("read rewritten"),
        fs::read(&path).expect("read input")
    );

    let output = run_cli(&["rewrite", &path_str, "--output", &out_str, "--level", "9"]);
    assert!(output.status.success());
    let rewritten = Scenario::decode(&fs::read(&out).expect("read rewritten")).expect("decode");
    assert_eq!(rewritten, sample_scenario(true));

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn bitmap_exports_bmp_file() {
    let path = write_sample("scx_bitmap_in", &sample_scenario(true));
    let out = temp_path("scx_bitmap_out", "bmp");
    let path_str = path.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();

    let output = run_cli(&["bitmap", &path_str, "--output", &out_str]);
    assert!(output.status.success());
    let bmp = fs::read(&out).expect("read bmp");
    assert_eq!(&bmp[..2], b"BM");
    assert_eq!(&bmp[2..6], &(bmp.len() as u32).to_le_bytes());

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(out);
}

#[test]
fn bitmap_without_embedded_image_fails() {
    let path = write_sample("scx_bitmap_none", &sample_scenario(false));
    let out = temp_path("scx_bitmap_none_out", "bmp");
    let path_str = path.to_string_lossy().to_string();
    let out_str = out.to_string_lossy().to_string();

    let output = run_cli(&["bitmap", &path_str, "--output", &out_str]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());

    let _ = fs::remove_file(path);
}

#[test]
fn corrupt_input_exits_with_error() {
    let mut bytes = sample_scenario(false).encode().expect("encode");
    bytes[..4].copy_from_slice(b"1.18");
    let path = temp_path("scx_corrupt", "scx");
    fs::write(&path, bytes).expect("write corrupt sample");
    let path_str = path.to_string_lossy().to_string();

    let output = run_cli(&["info", &path_str]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1.18"), "{stderr}");

    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_and_bad_usage_have_distinct_codes() {
    let missing = temp_path("scx_missing", "scx");
    let missing_str = missing.to_string_lossy().to_string();
    let output = run_cli(&["info", &missing_str]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_cli(&["rewrite", &missing_str]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_cli(&["rewrite", &missing_str, "--output", "x", "--level", "12"]);
    assert_eq!(output.status.code(), Some(2));
}
