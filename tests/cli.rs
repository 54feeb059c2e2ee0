//! Runs the `cryptotests` binary against a temporary key directory.

use std::path::Path;
use std::process::{Command, Output};

fn cryptotests(base: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cryptotests"))
        .arg("--base")
        .arg(base)
        .args(args)
        .env_remove("CRYPTOTESTS_MESSAGE")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_generate_and_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("CryptoTests");

    let output = cryptotests(&base, &["gen", "--bits", "512"]);
    assert!(output.status.success(), "{:?}", output);
    for name in [
        "key-private.xml",
        "key-public.xml",
        "key-private.pem",
        "key-public.pem",
    ] {
        assert!(base.join(name).is_file(), "{name}");
        assert!(stdout(&output).contains(name));
    }

    let output = cryptotests(&base, &["test-pem"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("Test Message!"));

    let output = cryptotests(&base, &["test-xml", "--message", "other text"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("other text"));

    let output = cryptotests(&base, &["encrypt", "--message", "hello"]);
    assert!(output.status.success(), "{:?}", output);
    let ciphertext = stdout(&output);

    let private_xml = base.join("key-private.xml");
    let output = cryptotests(
        &base,
        &[
            "decrypt",
            "--key",
            private_xml.to_str().unwrap(),
            ciphertext.trim(),
        ],
    );
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(stdout(&output).trim_end(), "hello");
}

#[test]
fn test_missing_keys_fail() {
    let dir = tempfile::tempdir().unwrap();

    let output = cryptotests(dir.path(), &["test-pem"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("key-public.pem"));
}
