use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn gcode_run(path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gcode-run"))
        .arg(path)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn runs_program_and_prints_machine_actions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part.gcode");
    fs::write(&path, "%\nO0001\nN5 G91 G01 X-20.000 Y-10.000\nN7 G00 Z-10.000\nN8 M30\n").unwrap();

    let output = gcode_run(&path);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "A file with the following ending has been added: gcode",
            "Incremental positioning turned on.",
            "Linear interpolation turned on.",
            "Moving to X=-20.000 Y=-10.000 Z=0.000 [mm].",
            "Rapid positioning turned on.",
            "Moving Z to -10.000 [mm].",
            "Coolant turned off.",
            "Spindle stopped from turning.",
            "Moving to home.",
            "Program quitting...",
        ]
    );
}

#[test]
fn wrong_extension_is_not_interpreted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part.nc");
    fs::write(&path, "not even a program").unwrap();

    let output = gcode_run(&path);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Add a gcode file"));
}

#[test]
fn syntax_error_is_a_single_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.gcode");
    fs::write(&path, "%\nN6 A01 Y-12.000\n").unwrap();

    let output = gcode_run(&path);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.trim(), "error: line 2: unknown command letter 'A' in 'A01'");
}
