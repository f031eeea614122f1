use super::*;
use std::time::{Duration, Instant};

fn drain(process: &mut Subprocess, deadline: Duration) -> (Vec<u8>, Option<i32>) {
    let start = Instant::now();
    let mut out = Vec::new();
    loop {
        match process.poll() {
            Poll::Data(chunk) => out.extend_from_slice(&chunk),
            Poll::Closed(code) => return (out, code),
            Poll::Pending => {
                assert!(start.elapsed() < deadline, "subprocess did not finish");
                std::thread::sleep(Duration::from_millis(5));
            }
        }
    }
}

#[test]
fn test_captures_stdout() {
    let mut process =
        Subprocess::spawn(&["echo".to_string(), "hello".to_string()]).unwrap();
    let (out, code) = drain(&mut process, Duration::from_secs(10));
    assert_eq!(String::from_utf8_lossy(&out), "hello\n");
    assert_eq!(code, Some(0));
}

#[test]
fn test_captures_stderr_and_nonzero_exit() {
    let mut process = Subprocess::spawn(&[
        "sh".to_string(),
        "-c".to_string(),
        "echo oops >&2; exit 3".to_string(),
    ])
    .unwrap();
    let (out, code) = drain(&mut process, Duration::from_secs(10));
    assert_eq!(String::from_utf8_lossy(&out), "oops\n");
    assert_eq!(code, Some(3));
}

#[test]
fn test_spawn_failure_is_build_error() {
    let err = Subprocess::spawn(&["definitely-not-a-real-binary-xyz".to_string()]).unwrap_err();
    assert_eq!(err.kind, crate::error::ErrorKind::Build);
}

#[test]
fn test_empty_command_rejected() {
    assert!(Subprocess::spawn(&[]).is_err());
}
