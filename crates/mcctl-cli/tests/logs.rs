//! One-shot `logs` and `config` commands.

use std::fs;

use mcctl_cli::handlers::{config, logs};
use mcctl_cli::{CliError, ConfigCommand, LogsCommand};
use mcctl_core::{SupervisorSettings, load_settings_with};
use tempfile::tempdir;

fn settings_in(dir: &std::path::Path) -> SupervisorSettings {
    SupervisorSettings {
        logs_dir: dir.join("logs"),
        ..Default::default()
    }
}

#[test]
fn list_and_show_archives() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());
    fs::create_dir(&settings.logs_dir).unwrap();
    fs::write(settings.logs_dir.join("01-02-2025_10-00-00.log"), "older\n").unwrap();
    fs::write(settings.logs_dir.join("15-01-2025_10-00-00.log"), "oldest\n").unwrap();
    fs::write(settings.logs_dir.join("02-02-2025_10-00-00.log"), "newest\n").unwrap();

    let mut out = Vec::new();
    logs::execute(&settings, LogsCommand::List { limit: Some(2) }, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let newest = text.find("02-02-2025_10-00-00.log").unwrap();
    let older = text.find("01-02-2025_10-00-00.log").unwrap();
    assert!(newest < older);
    assert!(!text.contains("15-01-2025"));

    let mut out = Vec::new();
    logs::execute(
        &settings,
        LogsCommand::Show {
            name: "latest".into(),
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(out, b"newest\n");
}

#[test]
fn show_errors_carry_exit_codes() {
    let dir = tempdir().unwrap();
    let settings = settings_in(dir.path());

    let err = logs::execute(
        &settings,
        LogsCommand::Show {
            name: "../etc/passwd".into(),
        },
        &mut Vec::<u8>::new(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);

    let err = logs::execute(
        &settings,
        LogsCommand::Show {
            name: "missing.log".into(),
        },
        &mut Vec::<u8>::new(),
    )
    .unwrap_err();
    assert!(matches!(err, CliError::NotFound(_)));

    let err = logs::execute(&settings, LogsCommand::List { limit: Some(0) }, &mut Vec::<u8>::new())
        .unwrap_err();
    assert!(matches!(err, CliError::Arguments(_)));
}

#[test]
fn config_check_reports_file_and_overrides() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("mcctl.toml"),
        "modpack_name = \"Vault Hunters\"\nlogs_dir = \"archives\"\n\n[timing]\nboot_timeout_secs = 600\n",
    )
    .unwrap();

    let loaded = load_settings_with(None, dir.path(), |key| {
        (key == "MCCTL_START_COMMAND").then(|| "./start.sh".to_string())
    })
    .unwrap();

    let mut out = Vec::new();
    config::execute(&loaded, ConfigCommand::Check, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("# Settings are valid"));
    assert!(text.contains("mcctl.toml"));
    assert!(text.contains("modpack_name = \"Vault Hunters\""));
    assert!(text.contains("start_command = \"./start.sh\""));
    assert!(text.contains("boot_timeout_secs = 600"));
}
