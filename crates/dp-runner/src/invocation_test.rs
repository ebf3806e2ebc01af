use super::*;

fn target(password: &str) -> TargetConfig {
    TargetConfig {
        host: "127.0.0.1".to_string(),
        port: 3306,
        user: "root".to_string(),
        password: password.to_string(),
        name: "app".to_string(),
        client_bin: "mysql".to_string(),
    }
}

#[test]
fn test_detect_unix_family() {
    for os in ["linux", "macos", "freebsd", "openbsd"] {
        assert_eq!(Platform::detect(os).unwrap(), Platform::Unix, "{os}");
    }
}

#[test]
fn test_detect_windows() {
    assert_eq!(Platform::detect("windows").unwrap(), Platform::Windows);
}

#[test]
fn test_detect_unsupported() {
    let err = Platform::detect("plan9").unwrap_err();
    match err {
        RunnerError::UnsupportedPlatform { os } => assert_eq!(os, "plan9"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unix_invocation() {
    let inv = Invocation::build(
        Platform::Unix,
        &target("secret"),
        Path::new("/srv/changes/001_init.sql"),
    );
    assert_eq!(inv.program, "/bin/sh");
    assert_eq!(
        inv.args,
        vec![
            "-c".to_string(),
            "mysql -h127.0.0.1 -P3306 -uroot --password=secret app < /srv/changes/001_init.sql"
                .to_string(),
        ]
    );
}

#[test]
fn test_windows_invocation_quotes_path() {
    let inv = Invocation::build(
        Platform::Windows,
        &target("secret"),
        Path::new(r"C:\changes\001 init.sql"),
    );
    assert_eq!(inv.platform, Platform::Windows);
    assert_eq!(inv.program, "cmd");
    assert_eq!(inv.args[0], "/C");
    assert_eq!(
        inv.args[1],
        r#"mysql -h127.0.0.1 -P3306 -uroot --password=secret app < "C:\changes\001 init.sql""#
    );
}

#[test]
fn test_redacted_hides_password() {
    let inv = Invocation::build(
        Platform::Unix,
        &target("secret"),
        Path::new("/srv/changes/001_init.sql"),
    );
    assert_eq!(
        inv.redacted(),
        "/bin/sh -c mysql -h127.0.0.1 -P3306 -uroot --password=**** app < /srv/changes/001_init.sql"
    );
    assert!(!inv.to_string().contains("secret"));
    assert!(!format!("{:?}", inv).contains("secret"));
}

#[test]
fn test_posix_quoting_of_special_characters() {
    let inv = Invocation::build(
        Platform::Unix,
        &target("p@ss word'x"),
        Path::new("/srv/my changes/001_init.sql"),
    );
    assert_eq!(
        inv.args[1],
        r#"mysql -h127.0.0.1 -P3306 -uroot --password='p@ss word'\''x' app < '/srv/my changes/001_init.sql'"#
    );
}

#[test]
fn test_password_that_looks_redacted_is_still_quoted() {
    let inv = Invocation::build(Platform::Unix, &target("****"), Path::new("/a.sql"));
    assert!(inv.args[1].contains("--password='****'"));
}

#[test]
fn test_empty_password_is_quoted() {
    let inv = Invocation::build(Platform::Unix, &target(""), Path::new("/a.sql"));
    assert!(inv.args[1].contains("--password='' app"));

    let inv = Invocation::build(Platform::Windows, &target(""), Path::new("a.sql"));
    assert!(inv.args[1].contains(r#"--password="" app"#));
}

#[test]
fn test_client_bin_is_verbatim() {
    let mut target = target("secret");
    target.client_bin = "mysql --default-character-set=utf8mb4".to_string();
    let inv = Invocation::build(Platform::Unix, &target, Path::new("/a.sql"));
    assert!(inv
        .args[1]
        .starts_with("mysql --default-character-set=utf8mb4 -h127.0.0.1 "));
}
