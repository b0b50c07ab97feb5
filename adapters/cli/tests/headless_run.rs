use std::process::Command;

fn maze_runner(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_maze-runner"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch maze-runner")
}

#[test]
fn scripted_run_prints_banner_minimap_and_clock() {
    let output = maze_runner(&[
        "--width",
        "3",
        "--height",
        "2",
        "--seed",
        "5",
        "--fps",
        "50",
        "--script",
        "left*10 legend idle*5 quit idle",
    ]);
    assert!(output.status.success(), "run failed: {output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Welcome to Maze Runner.");
    assert_eq!(lines[1], "Seed 5");
    assert_eq!(lines[2], "#######", "minimap top border");
    assert!(lines[3].starts_with("#@"), "player drawn on start: {}", lines[3]);
    assert!(stdout.contains("Time 00:00.32"), "clock missing:\n{stdout}");
    assert!(stdout.contains("E eye, blinds and teleports"));
}

#[test]
fn same_seed_prints_the_same_maze() {
    let args = ["--seed", "11", "--script", "idle"];
    let first = maze_runner(&args);
    let second = maze_runner(&args);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn rejects_invalid_dimensions() {
    let output = maze_runner(&["--width", "1", "--height", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid maze configuration"), "{stderr}");
}

#[test]
fn rejects_unknown_script_actions() {
    let output = maze_runner(&["--script", "forward fly"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse --script"), "{stderr}");
}
