//! Config file persistence.

use voxshell::ShellConfig;

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = ShellConfig::default();
    config.identity.username = "Ada".to_owned();
    config.identity.assistant_name = "Jarvis".to_owned();
    config.polling.mic_poll_ms = 250;
    config.image.count = 2;
    config.save_to_file(&path).unwrap();

    let loaded = ShellConfig::from_file(&path).unwrap();
    assert_eq!(loaded.identity.username, "Ada");
    assert_eq!(loaded.identity.assistant_name, "Jarvis");
    assert_eq!(loaded.polling.mic_poll_ms, 250);
    assert_eq!(loaded.image.count, 2);
    assert_eq!(loaded.exit_grace_ms, 2000);
}

#[test]
fn partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[identity]\nusername = \"Grace\"\n").unwrap();

    let loaded = ShellConfig::from_file(&path).unwrap();
    assert_eq!(loaded.identity.username, "Grace");
    assert_eq!(loaded.identity.assistant_name, "Assistant");
    assert_eq!(loaded.completion.api_key_env, "GROQ_API_KEY");
}

#[test]
fn malformed_file_is_config_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "identity = [").unwrap();

    let err = ShellConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, voxshell::ShellError::Config(_)));
}
