//! Runs the riffkit binary against files in a temp directory

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use riffkit::riff::{self, riff_form, Chunk, FormatChunk, Tag};

fn riffkit(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_riffkit"))
        .args(args)
        .output()
        .expect("failed to run riffkit")
}

fn write_pcm_wave(path: &Path) {
    let fmt = FormatChunk {
        channels: 1,
        sample_rate: 8000,
        byte_rate: 16000,
        block_align: 2,
        bits_per_sample: 16,
        ..FormatChunk::default()
    };
    let form = riff_form(
        "WAVE",
        [fmt.to_chunk(), Chunk::new("data", vec![0x00, 0x00, 0xFF, 0x7F])],
    );
    fs::write(path, form.to_bytes()).unwrap();
}

#[test]
fn describe_prints_chunk_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    write_pcm_wave(&input);

    let output = riffkit(&["describe", input.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "RIFF('WAVE'  fmt (1, 1, 8000, 16000, 2, 16, 0)\n             data())\n"
    );
}

#[test]
fn describe_uses_indent_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let config = dir.path().join("riffkit.cfg");
    write_pcm_wave(&input);
    fs::write(&config, "# riffkit settings\nindent = 2\n").unwrap();

    let output = riffkit(&[
        "--config",
        config.to_str().unwrap(),
        "describe",
        input.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("  RIFF('WAVE'  fmt "));
    assert!(stdout.contains("\n               data())"));
}

#[test]
fn to_ulaw_writes_mulaw_form() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_pcm_wave(&input);

    let output = riffkit(&[
        "to-ulaw",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Wrote "));

    let form = riff::ChunkRegistry::with_builtins().decode(&fs::read(&output_path).unwrap());
    let fmt = FormatChunk::from_chunk(form.find_by_tag(Tag::FMT).unwrap()).unwrap();
    assert_eq!(fmt.format_tag, riff::WAVE_FORMAT_MULAW);
    assert_eq!(form.find_by_tag(Tag::DATA).unwrap().payload(), &[0xFF, 0x80]);
}

#[test]
fn to_ulaw_keeps_existing_output_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output_path = dir.path().join("out.wav");
    write_pcm_wave(&input);
    fs::write(&output_path, b"keep").unwrap();

    let args = [input.to_str().unwrap(), output_path.to_str().unwrap()];
    let output = riffkit(&["to-ulaw", args[0], args[1]]);
    assert!(!output.status.success());
    assert_eq!(fs::read(&output_path).unwrap(), b"keep");

    let output = riffkit(&["to-ulaw", args[0], args[1], "--force"]);
    assert!(output.status.success());
    assert_ne!(fs::read(&output_path).unwrap(), b"keep");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = riffkit(&["describe", dir.path().join("nope.wav").to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn tags_lists_builtin_kinds() {
    let output = riffkit(&["tags"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let tags: Vec<&str> = stdout.lines().collect();
    assert_eq!(tags.len(), 27);
    assert!(tags.contains(&"LIST"));
    assert!(tags.contains(&"fmt "));
    assert!(tags.contains(&"IARL"));
}
