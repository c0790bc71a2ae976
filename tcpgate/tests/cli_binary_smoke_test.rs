use std::process::Command;
use std::time::{Duration, Instant};

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_tcpgate")
}

fn unique_test_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to reserve test port");
    let port = listener
        .local_addr()
        .expect("failed to read test port")
        .port();
    drop(listener);
    port
}

fn tcpgate() -> Command {
    let mut command = Command::new(bin_path());
    command.env_clear();
    command
}

#[test]
fn exits_zero_without_services() {
    let output = tcpgate()
        .args(["--timeout", "5"])
        .output()
        .expect("failed to run tcpgate");

    assert!(output.status.success(), "no services should mean ready");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("All services are up"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn exits_zero_when_service_is_listening() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let port = listener.local_addr().expect("failed to read port").port();

    let output = tcpgate()
        .env("APP_TCP_ADDR", "127.0.0.1")
        .env("APP_TCP_PORT", port.to_string())
        .args(["--timeout", "5"])
        .output()
        .expect("failed to run tcpgate");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Service is up"), "unexpected stderr: {stderr}");
}

#[test]
fn exits_non_zero_when_service_never_listens() {
    let port = unique_test_port();

    let start = Instant::now();
    let output = tcpgate()
        .env("DB_TCP_ADDR", "127.0.0.1")
        .env("DB_TCP_PORT", port.to_string())
        .args(["--timeout", "1", "--connect-timeout-ms", "200"])
        .output()
        .expect("failed to run tcpgate");

    assert_eq!(output.status.code(), Some(1));
    assert!(start.elapsed() < Duration::from_secs(5));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("timed out after 1 second(s)"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn skips_service_with_invalid_port() {
    let output = tcpgate()
        .env("WEB_TCP_ADDR", "127.0.0.1")
        .env("WEB_TCP_PORT", "http")
        .args(["--timeout", "5"])
        .output()
        .expect("failed to run tcpgate");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipping service"), "unexpected stderr: {stderr}");
}

#[test]
fn exits_two_on_invalid_configuration() {
    let output = tcpgate()
        .args(["--timeout", "0"])
        .output()
        .expect("failed to run tcpgate");

    assert_eq!(output.status.code(), Some(2));
}
