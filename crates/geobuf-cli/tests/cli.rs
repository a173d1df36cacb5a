//! Tests that drive the built `geobuf` binary over stdin/stdout.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::{json, Value};

fn run(args: &[&str], stdin: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_geobuf"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn geobuf");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin)
        .expect("write stdin");
    child.wait_with_output().expect("wait for geobuf")
}

fn encode(args: &[&str], value: &Value) -> Vec<u8> {
    let mut full = vec!["encode"];
    full.extend_from_slice(args);
    let output = run(&full, value.to_string().as_bytes());
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    output.stdout
}

fn decode(bytes: &[u8]) -> Value {
    let output = run(&["decode"], bytes);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("decode output is JSON")
}

#[test]
fn test_encode_decode_pipeline() {
    let collection = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "id": 7,
            "properties": {"name": "Bergen", "population": 291_940},
            "geometry": {"type": "Point", "coordinates": [5.324383, 60.392]}
        }]
    });
    let bytes = encode(&[], &collection);
    assert!(!bytes.is_empty());
    assert_eq!(decode(&bytes), collection);
}

#[test]
fn test_precision_flag() {
    let point = json!({"type": "Point", "coordinates": [1.23456789, 2.3456789]});
    let bytes = encode(&["--precision", "2"], &point);
    assert_eq!(
        decode(&bytes),
        json!({"type": "Point", "coordinates": [1.23, 2.35]})
    );
}

#[test]
fn test_z_flags() {
    let point = json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]});
    assert_eq!(
        decode(&encode(&["--with-z"], &point)),
        json!({"type": "Point", "coordinates": [1.0, 2.0, 3.0]})
    );
    assert_eq!(
        decode(&encode(&[], &point)),
        json!({"type": "Point", "coordinates": [1.0, 2.0]})
    );
    // The last of the two flags wins.
    assert_eq!(
        decode(&encode(&["--with-z", "--without-z"], &point)),
        json!({"type": "Point", "coordinates": [1.0, 2.0]})
    );
}

#[test]
fn test_version() {
    let output = run(&["--version"], b"");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(geobuf::VERSION));
}

#[test]
fn test_failures_exit_with_one() {
    let cases: [(&[&str], &[u8]); 5] = [
        (&["encode"], b"not json"),
        (&["encode"], br#"{"type": "Circle"}"#),
        (&["encode", "--precision", "16"], br#"{"type": "Point", "coordinates": [0, 0]}"#),
        (&["decode"], &[0x32, 0x05, 0x08]),
        (&["transcode"], b""),
    ];
    for (args, stdin) in cases {
        let output = run(args, stdin);
        assert_eq!(output.status.code(), Some(1), "{args:?}");
        assert!(!output.stderr.is_empty(), "{args:?}");
        assert!(output.stdout.is_empty(), "{args:?}");
    }
}
