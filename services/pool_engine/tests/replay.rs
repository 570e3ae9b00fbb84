//! Replays the bundled scenario through a file-loaded configuration

use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use torq_config::EngineConfig;
use torq_pool_engine::{RunSummary, Scenario, ScenarioRunner};

fn bundled_scenario() -> Scenario {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/basic.json");
    Scenario::load(&path).unwrap()
}

fn file_config() -> EngineConfig {
    let dir = tempdir().unwrap();
    let path = dir.path().join("engine.toml");
    fs::write(
        &path,
        r#"
[engine]
vault = "0x0000000000000000000000000000000000000fee"

[events]
channel_capacity = 8
"#,
    )
    .unwrap();
    EngineConfig::load(Some(&path), None).unwrap()
}

#[test]
fn test_bundled_scenario_replays() {
    let scenario = bundled_scenario();
    let runner = ScenarioRunner::new(&file_config(), &scenario).unwrap();
    let mut out = Vec::new();

    let summary = runner.run(&scenario, &mut out).unwrap();

    assert_eq!(
        summary,
        RunSummary {
            steps: 8,
            failed: 2,
            events: 3
        }
    );

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let steps: Vec<&serde_json::Value> = lines
        .iter()
        .filter_map(|line| line.get("step"))
        .collect();

    assert_eq!(steps[0]["outcome"]["added"]["shares_minted"], 1000);
    assert_eq!(steps[2]["outcome"]["swapped"]["amount_out"], 362);
    // reversed pair: caller order is (Y, X)
    assert_eq!(steps[3]["outcome"]["added"]["amount_a"], 330);
    assert_eq!(steps[3]["outcome"]["added"]["amount_b"], 100);
    assert_eq!(steps[4]["outcome"]["reserves"]["reserve_a"], 1200);
    assert_eq!(steps[4]["outcome"]["reserves"]["reserve_b"], 3968);
    assert!(steps[5]["outcome"].get("error").is_some());
    assert_eq!(steps[6]["outcome"]["clock"]["now"], 1_700_000_120u64);
    assert!(steps[7]["outcome"]["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Expired"));

    let stats = runner.engine().stats();
    assert_eq!((stats.total_pools, stats.active_pools), (1, 1));
}
