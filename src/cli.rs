use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::blueprint::export_csv::write_modules_csv;
use crate::blueprint::{CarrierSummary, ModuleRequest, ResolvedModule, ResolvedOp};
use crate::catalog::schema::parse_document;
use crate::catalog::{CatalogRuntime, CatalogSource, DocumentFormat};
use crate::config::FoundryConfig;
use crate::error::{Error, Result};
use crate::parallel::{resolve_batch, WorkerPool};

const USAGE: &str = "usage: foundry <status|validate|resolve|export|blueprints>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Validate,
    Resolve,
    Export,
    Blueprints,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("status") => Some(Command::Status),
        Some("validate") => Some(Command::Validate),
        Some("resolve") => Some(Command::Resolve),
        Some("export") => Some(Command::Export),
        Some("blueprints") => Some(Command::Blueprints),
        _ => None,
    }
}

/// Modules to resolve plus run perks applied to every one of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestDocument {
    #[serde(default)]
    pub modules: Vec<ModuleRequest>,
    #[serde(default)]
    pub perks: Vec<ResolvedOp>,
}

/// Output of `resolve`: per-module results plus the carrier roll-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveReport {
    pub modules: Vec<ResolvedModule>,
    pub carrier: CarrierSummary,
}

impl ResolveReport {
    pub fn new(modules: Vec<ResolvedModule>) -> Self {
        Self {
            carrier: CarrierSummary::from_modules(&modules),
            modules,
        }
    }
}

pub fn load_request(path: &Path) -> Result<RequestDocument> {
    let text = std::fs::read_to_string(path)?;
    let document: RequestDocument = parse_document(
        &text,
        DocumentFormat::from_path(path),
        &path.display().to_string(),
    )?;
    if document.modules.is_empty() {
        return Err(Error::InvalidRequest {
            message: format!("'{}' lists no modules", path.display()),
        });
    }
    Ok(document)
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = FoundryConfig::from_env();
    match parse_command(args) {
        Some(Command::Status) => handle_status(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        Some(Command::Resolve) => handle_resolve(args, &config),
        Some(Command::Export) => handle_export(args, &config),
        Some(Command::Blueprints) => handle_blueprints(args, &config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

/// Arguments after the command name that are not flags or flag values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut values = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        if arg == "--request" {
            iter.next();
        } else if !arg.starts_with("--") {
            values.push(arg.as_str());
        }
    }
    values
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn load_catalog(path: Option<&str>, config: &FoundryConfig) -> CatalogRuntime {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(|| config.catalog_path.clone());
    CatalogRuntime::load(&CatalogSource::File(path))
}

fn print_json<T: Serialize>(value: &T, what: &str) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize {what}: {err}");
            1
        }
    }
}

fn handle_status(args: &[String], config: &FoundryConfig) -> i32 {
    let catalog = load_catalog(positional(args).first().copied(), config);
    print_json(&catalog.status_report(), "catalog status")
}

fn handle_validate(args: &[String], config: &FoundryConfig) -> i32 {
    let catalog = load_catalog(positional(args).first().copied(), config);
    let mut report = catalog.status_report();

    if let Some(request_path) = flag_value(args, "--request") {
        match load_request(Path::new(request_path)) {
            Ok(request) => report.extend_errors(
                catalog.validate_base_modules(request.modules.iter().map(|m| m.spec.id.as_str())),
            ),
            Err(err) => {
                eprintln!("failed to load request: {err}");
                return 1;
            }
        }
    }

    if report.validation_errors.is_empty() {
        println!(
            "validation passed: {} (digest {})",
            report.source,
            report.digest_hex()
        );
        return 0;
    }
    eprintln!(
        "validation failed: {} issue(s) in {}",
        report.validation_errors.len(),
        report.source
    );
    for issue in &report.validation_errors {
        eprintln!("- {issue}");
    }
    1
}

fn resolve_from_args(
    request_path: &str,
    catalog_path: Option<&str>,
    config: &FoundryConfig,
) -> Result<Vec<ResolvedModule>> {
    let request = load_request(Path::new(request_path))?;
    let catalog = Arc::new(load_catalog(catalog_path, config));
    Ok(resolve_batch(
        &request.modules,
        &request.perks,
        &catalog,
        &WorkerPool::with_workers(config.workers),
    ))
}

fn handle_resolve(args: &[String], config: &FoundryConfig) -> i32 {
    let positional = positional(args);
    let Some(request_path) = positional.first() else {
        eprintln!("usage: foundry resolve <request> [catalog] [--table]");
        return 2;
    };
    let as_table = args.iter().any(|arg| arg == "--table");

    let modules = match resolve_from_args(request_path, positional.get(1).copied(), config) {
        Ok(modules) => modules,
        Err(err) => {
            eprintln!("resolve failed: {err}");
            return 1;
        }
    };

    let report = ResolveReport::new(modules);
    if as_table {
        println!("module\tblueprint\tdamage\tfamily\tdamage_type\tdelivery\tdigest");
        for module in &report.modules {
            let result = &module.result;
            println!(
                "{}\t{}\t{:.3}\t{}\t{}\t{}\t{:08x}",
                module.module_id,
                module.blueprint_ref.blueprint_id,
                result.damage,
                result.attack_family.map_or("-", |family| family.as_str()),
                result.damage_type.map_or("-", |damage_type| damage_type.as_str()),
                result.delivery.map_or("-", |delivery| delivery.as_str()),
                result.digest
            );
        }
        if let Some(reactor) = &report.carrier.reactor {
            println!(
                "carrier reactor\toutput_mw={:.3}\tefficiency={:.3}\tidle_draw_mw={:.3}",
                reactor.output_mw, reactor.efficiency, reactor.idle_draw_mw
            );
        }
        if let Some(hangar) = &report.carrier.hangar {
            println!(
                "carrier hangar\tdrones={:.3}\tfamily={}",
                hangar.drone_capacity,
                hangar.drone_attack_family.as_str()
            );
        }
        return 0;
    }
    print_json(&report, "resolve result")
}

fn handle_export(args: &[String], config: &FoundryConfig) -> i32 {
    let positional = positional(args);
    let (Some(request_path), Some(out_path)) = (positional.first(), positional.get(1)) else {
        eprintln!("usage: foundry export <request> <out.csv> [catalog]");
        return 2;
    };

    let written = resolve_from_args(request_path, positional.get(2).copied(), config).and_then(
        |modules| {
            let file = File::create(out_path)?;
            write_modules_csv(BufWriter::new(file), &modules)?;
            Ok(modules.len())
        },
    );
    match written {
        Ok(count) => {
            println!("export complete: modules={count}, path='{out_path}'");
            0
        }
        Err(err) => {
            eprintln!("export failed: {err}");
            1
        }
    }
}

fn handle_blueprints(args: &[String], config: &FoundryConfig) -> i32 {
    let catalog = load_catalog(positional(args).first().copied(), config);
    print_json(catalog.base_module_index(), "blueprint index")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn commands_parse() {
        assert_eq!(parse_command(&args(&["foundry", "status"])), Some(Command::Status));
        assert_eq!(parse_command(&args(&["foundry", "export"])), Some(Command::Export));
        assert_eq!(parse_command(&args(&["foundry", "serve"])), None);
        assert_eq!(parse_command(&args(&["foundry"])), None);
    }

    #[test]
    fn positional_skips_flags_and_flag_values() {
        let argv = args(&["foundry", "validate", "--request", "req.json", "cat.json", "--table"]);
        assert_eq!(positional(&argv), vec!["cat.json"]);
        assert_eq!(flag_value(&argv, "--request"), Some("req.json"));
        assert_eq!(flag_value(&argv, "--missing"), None);
    }
}
