//! CLI command implementations
//!
//! Both commands load the model directory first and refuse an unknown root
//! entity. `compile` answers a rejected request with an error envelope on
//! stdout and still exits successfully.

use std::path::Path;

use serde_json::{json, Value};

use crate::criteria::CriteriaBuilder;
use crate::model::{resolve_path, EntityRegistry};
use crate::search::{CompilerConfig, NoHooks, SearchCompiler, SearchRequest};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_request, write_json};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Compile {
            models,
            entity,
            config,
        } => compile(&models, &entity, config.as_deref()),
        Command::Check {
            models,
            entity,
            paths,
        } => check(&models, &entity, &paths),
    }
}

/// Compile the search request on stdin against `entity`
pub fn compile(models: &Path, entity: &str, config_path: Option<&Path>) -> CliResult<()> {
    let config = config_path
        .map(CompilerConfig::load)
        .transpose()?
        .unwrap_or_default();
    let registry = load_models(models, entity)?;

    let request = read_request()?;
    let response = compile_response(&registry, &config, entity, request)?;
    write_json(&response)
}

/// Report the authorization of every path
pub fn check(models: &Path, entity: &str, paths: &[String]) -> CliResult<()> {
    let registry = load_models(models, entity)?;
    write_json(&ok_response(check_paths(&registry, entity, paths)))
}

fn load_models(models: &Path, entity: &str) -> CliResult<EntityRegistry> {
    let registry = EntityRegistry::load_dir(models)?;
    if !registry.contains(entity) {
        return Err(CliError::unknown_entity(entity));
    }
    Ok(registry)
}

/// Builds the response envelope for one compile.
///
/// Only a malformed request document is a CLI error; compile rejections
/// become error envelopes.
pub(crate) fn compile_response(
    registry: &EntityRegistry,
    config: &CompilerConfig,
    entity: &str,
    request: Value,
) -> CliResult<Value> {
    let request: SearchRequest = serde_json::from_value(request)?;
    let compiler = SearchCompiler::new(registry, config);
    let mut ctx = CriteriaBuilder::new(entity);

    let compiled = match compiler.compile(entity, &mut ctx, &request, &mut NoHooks) {
        Ok(compiled) => compiled,
        Err(err) => {
            return Ok(error_response(err.code().code(), err.message(), err.field()));
        }
    };

    let where_clause = compiled.predicate.as_ref().map(|p| p.to_string());
    let order_by: Vec<String> = compiled.orders.iter().map(|o| o.to_string()).collect();

    Ok(ok_response(json!({
        "entity": entity,
        "from": ctx.from_clause(),
        "where": where_clause,
        "order_by": order_by,
        "joins": ctx.joins(),
        "criteria": compiled,
    })))
}

pub(crate) fn check_paths(registry: &EntityRegistry, entity: &str, paths: &[String]) -> Value {
    let results: Vec<Value> = paths
        .iter()
        .map(|path| match resolve_path(registry, entity, path) {
            Some(resolved) => json!({
                "path": path,
                "authorized": true,
                "canonical": resolved.canonical(),
                "type": resolved.field.kind.type_name(),
            }),
            None => json!({
                "path": path,
                "authorized": false,
            }),
        })
        .collect();

    json!({
        "entity": entity,
        "paths": results,
    })
}
