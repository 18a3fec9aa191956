use std::net::TcpListener;
use std::process::{Command, Output};

const LOADGEN_EXE: &str = env!("CARGO_BIN_EXE_loadgen");

fn loadgen(args: &[&str], env: &[(&str, &str)]) -> Output {
    Command::new(LOADGEN_EXE)
        .args(args)
        .envs(env.iter().copied())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run loadgen")
}

#[test]
fn test_dry_run() {
    let output = loadgen(
        &["--dry-run", "--seed", "7"],
        &[("LOADGEN__BASE_RATE", "10"), ("LOADGEN__DURATION", "10s")],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## SCHEDULE"), "{stdout}");
    assert!(stdout.contains("expected 99.5"), "{stdout}");
}

#[test]
fn test_invalid_parameters_fail_fast() {
    let output = loadgen(
        &["127.0.0.1", "1", "heavywork"],
        &[("LOADGEN__BASE_RATE", "0")],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid process parameters"), "{stderr}");
}

#[test]
fn test_unreachable_target() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port().to_string()
    };

    let output = loadgen(
        &["--seed", "3", "127.0.0.1", &port, "heavywork"],
        &[
            ("LOADGEN__BASE_RATE", "100"),
            ("LOADGEN__DECAY_RATE", "0"),
            ("LOADGEN__DURATION", "200ms"),
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let failures = stdout
        .lines()
        .filter(|line| line.starts_with("error: "))
        .count();
    assert!(failures > 0, "{stdout}");
    assert!(stdout.contains("## REPLAY"), "{stdout}");
}

#[test]
fn test_partial_target_uses_defaults() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let port = listener.local_addr().unwrap().port().to_string();

    let output = loadgen(
        &["--seed", "5", "127.0.0.1", &port],
        &[
            ("LOADGEN__BASE_RATE", "50"),
            ("LOADGEN__DECAY_RATE", "0"),
            ("LOADGEN__DURATION", "100ms"),
            ("LOADGEN__REQUEST_TIMEOUT", "200ms"),
        ],
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using the default target"), "{stderr}");

    let accepted = listener.accept();
    assert!(
        matches!(&accepted, Err(e) if e.kind() == std::io::ErrorKind::WouldBlock),
        "partial target must not be contacted: {accepted:?}"
    );
}

#[test]
fn test_invalid_port() {
    let output = loadgen(&["127.0.0.1", "http", "heavywork"], &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid target port `http`"), "{stderr}");
}

#[test]
fn test_invalid_log_filter() {
    let output = loadgen(
        &["--dry-run"],
        &[("LOADGEN__LOGGING__FILTER", "loadgen=loudest")],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid log filter"), "{stderr}");
}
