//! Boot progress as an operator sees it across one boot.

use std::time::Duration;

use mcctl_core::{
    BootRecord, ProgressEstimator, ProgressUpdate, ServerState, StopStage, SupervisorSettings,
    validate_settings,
};

#[test]
fn progress_climbs_then_holds_below_full_until_online() {
    let mut history = BootRecord::new("All the Mods 9");
    history.push(Duration::from_secs(80));
    history.push(Duration::from_secs(100));
    let average = history.average();
    assert_eq!(average, Some(90.0));

    let mut last = 0.0;
    for secs in [0, 30, 60, 89, 90, 120, 300] {
        let snapshot =
            ProgressEstimator::estimate(Duration::from_secs(secs), average, ServerState::Starting);
        assert!(snapshot.percentage >= last, "dropped at {secs}s");
        assert!(snapshot.percentage < 100.0);
        assert_eq!(snapshot.bar.chars().count(), 25);
        last = snapshot.percentage;
    }

    let online = ProgressEstimator::estimate(Duration::from_secs(95), average, ServerState::On)
        .with_access_point("203.0.113.7:25565");
    assert_eq!(online.percentage, 100.0);
    assert_eq!(online.bar, "█".repeat(25));
    let text = online.panel().to_string();
    assert!(text.contains("Server is Online"));
    assert!(text.contains("Average Boot time: 1m 30s"));
    assert!(text.contains("Server is online at: 203.0.113.7:25565"));
}

#[test]
fn first_boot_has_no_average() {
    let snapshot =
        ProgressEstimator::estimate(Duration::from_secs(12), None, ServerState::Starting);
    let text = ProgressUpdate::Boot(snapshot).panel().to_string();
    assert!(text.contains("First time boot. No previous data to work with."));
    assert!(text.contains("Elapsed Time: 12s"));
}

#[test]
fn forced_stop_panel_names_the_archive() {
    let text = ProgressUpdate::Stop(StopStage::Off {
        archive: Some("07-03-2025_09-00-00.log".into()),
        forced: true,
    })
    .panel()
    .to_string();
    assert!(text.contains("Shutdown was not confirmed, process was terminated"));
    assert!(text.contains("07-03-2025_09-00-00.log"));
}

#[test]
fn config_file_fills_missing_fields_with_defaults() {
    let settings: SupervisorSettings = toml::from_str(
        r#"
        server_dir = "/srv/minecraft"
        start_args = ["-Xms{min_memory}", "-Xmx{max_memory}"]
        min_memory = "4G"
        max_memory = "8G"

        [markers]
        ready = "Server started"
        "#,
    )
    .unwrap();

    validate_settings(&settings).unwrap();
    assert_eq!(settings.markers.ready, "Server started");
    assert_eq!(settings.markers.shutdown, "All dimensions are saved");
    assert_eq!(settings.tail_capacity, 30);
    assert_eq!(settings.resolved_start_args(), vec!["-Xms4G", "-Xmx8G"]);
}
