use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const SHIPPED_CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/module_blueprint_catalog.json");

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_foundry")
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("foundry-{name}-{stamp}.{extension}"))
}

fn write_request(name: &str) -> PathBuf {
    let path = unique_temp_path(name, "json");
    fs::write(
        &path,
        r#"{
            "modules": [
                {"spec": {"id": "laser-s-1", "class": "Laser", "offense_rating": 5, "mass_tons": 2}},
                {"spec": {"id": "pd-s-1", "class": "PointDefense", "offense_rating": 3, "mass_tons": 1}}
            ],
            "perks": [{"op": "MulStat", "stat": "FireRate", "value": 1.1}]
        }"#,
    )
    .expect("request fixture should be written");
    path
}

#[test]
fn unknown_command_prints_usage() {
    let output = Command::new(bin())
        .arg("serve")
        .output()
        .expect("binary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: foundry"));
}

#[test]
fn status_command_emits_json() {
    let output = Command::new(bin())
        .args(["status", SHIPPED_CATALOG])
        .output()
        .expect("status should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("status should emit json");
    assert_eq!(payload["loaded"], serde_json::Value::Bool(true));
    assert_eq!(payload["has_errors"], serde_json::Value::Bool(false));
    assert_eq!(payload["blueprints"].as_u64(), Some(6));
}

#[test]
fn resolve_command_emits_one_result_per_module() {
    let request = write_request("resolve");

    let output = Command::new(bin())
        .args(["resolve", request.to_string_lossy().as_ref(), SHIPPED_CATALOG])
        .output()
        .expect("resolve should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("resolve should emit json");
    let modules = payload["modules"].as_array().expect("array of modules");
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["module_id"], "laser-s-1");
    assert_eq!(
        modules[0]["blueprint_ref"]["blueprint_id"],
        "blueprint.laser.prismworks"
    );
    assert_eq!(modules[1]["result"]["attack_family"], "Kinetic");

    let _ = fs::remove_file(request);
}

#[test]
fn resolve_command_reports_carrier_rollup() {
    let request = unique_temp_path("carrier", "json");
    fs::write(
        &request,
        r#"{
            "modules": [
                {"spec": {"id": "reactor-m-1", "class": "Reactor", "power_draw_mw": -40, "mass_tons": 100}},
                {"spec": {"id": "hangar-s-1", "class": "Hangar", "function_capacity": 4}},
                {"spec": {"id": "laser-s-1", "class": "Laser", "offense_rating": 5}}
            ]
        }"#,
    )
    .expect("request fixture should be written");

    let output = Command::new(bin())
        .args(["resolve", request.to_string_lossy().as_ref(), SHIPPED_CATALOG])
        .output()
        .expect("resolve should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("resolve should emit json");
    assert_eq!(payload["modules"].as_array().map(Vec::len), Some(3));
    let carrier = &payload["carrier"];
    assert!(carrier["reactor"]["output_mw"].as_f64().is_some_and(|mw| mw > 0.0));
    assert_eq!(carrier["hangar"]["drone_attack_family"], "Energy");
    assert_eq!(carrier["drone_damage_type"], "Energy");
    assert_eq!(carrier["drone_delivery"], "Beam");

    let _ = fs::remove_file(request);
}

#[test]
fn resolve_command_without_carrier_modules_has_empty_rollup() {
    let request = write_request("no_carrier");

    let output = Command::new(bin())
        .args(["resolve", request.to_string_lossy().as_ref(), SHIPPED_CATALOG])
        .output()
        .expect("resolve should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value = serde_json::from_str(&String::from_utf8_lossy(&output.stdout))
        .expect("resolve should emit json");
    assert!(payload["carrier"]["reactor"].is_null());
    assert!(payload["carrier"]["hangar"].is_null());

    let _ = fs::remove_file(request);
}

#[test]
fn resolve_command_returns_usage_without_request() {
    let output = Command::new(bin())
        .arg("resolve")
        .output()
        .expect("resolve should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: foundry resolve"));
}

#[test]
fn export_command_writes_csv() {
    let request = write_request("export");
    let out = unique_temp_path("export", "csv");

    let output = Command::new(bin())
        .args([
            "export",
            request.to_string_lossy().as_ref(),
            out.to_string_lossy().as_ref(),
            SHIPPED_CATALOG,
        ])
        .output()
        .expect("export should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("export complete: modules=2"));

    let csv = fs::read_to_string(&out).expect("csv should be written");
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().nth(1).is_some_and(|row| row.starts_with("laser-s-1,")));

    let _ = fs::remove_file(request);
    let _ = fs::remove_file(out);
}

#[test]
fn validate_command_passes_on_shipped_catalog() {
    let output = Command::new(bin())
        .args(["validate", SHIPPED_CATALOG])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("validation passed"));
}

#[test]
fn validate_command_returns_non_zero_on_dangling_reference() {
    let path = unique_temp_path("dangling", "json");
    fs::write(
        &path,
        r#"{
            "manufacturers": [{"id": "acme"}],
            "parts": [{"id": "core_x", "slotType": "Core"}],
            "blueprints": [
                {"blueprintId": "bp.ok", "baseModuleId": "laser-s-1", "manufacturerId": "acme", "parts": ["core_x"]},
                {"blueprintId": "bp.bad", "baseModuleId": "laser-s-1", "manufacturerId": "ghost", "parts": ["core_x"]}
            ]
        }"#,
    )
    .expect("fixture should be written");

    let output = Command::new(bin())
        .args(["validate", path.to_string_lossy().as_ref()])
        .output()
        .expect("validate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("validation failed"));
    assert!(stderr.contains("missing manufacturer 'ghost'"));

    let _ = fs::remove_file(path);
}

#[test]
fn validate_command_checks_request_base_modules() {
    let request = write_request("validate-request");

    let output = Command::new(bin())
        .args([
            "validate",
            "--request",
            request.to_string_lossy().as_ref(),
            SHIPPED_CATALOG,
        ])
        .output()
        .expect("validate should run");

    // The shipped catalog has blueprints for modules the request never mentions.
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing base module 'missile-m-1'"));

    let _ = fs::remove_file(request);
}
