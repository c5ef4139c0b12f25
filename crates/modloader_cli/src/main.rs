//! CLI entry point for inspecting an unpacked module.
//!
//! # Responsibility
//! - Load `<module_dir>/config.xml` through `modloader_core`.
//! - Print the descriptor and the resources excluded on the given platform
//!   as JSON on stdout.
//!
//! Usage: `modloader_cli <module_dir> <platform_version> [--installed id=version]... [--log-dir DIR]`
//!
//! The platform version is required: activation checks are meaningless
//! without the version of the platform the module would run on.

use log::info;
use modloader_core::{
    core_version, default_log_level, init_logging, DirectoryArtifactStore, LoaderConfig,
    ModuleDescriptor, ModuleLoader, PlatformVersionSource, RuntimeEnvironment,
};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str =
    "usage: modloader_cli <module_dir> <platform_version> [--installed id=version]... [--log-dir DIR]";

#[derive(Debug, Default)]
struct CliArgs {
    module_dir: PathBuf,
    platform_version: String,
    installed: Vec<(String, String)>,
    log_dir: Option<String>,
}

#[derive(Serialize)]
struct ModuleReport<'a> {
    core_version: &'static str,
    platform_version: String,
    descriptor: &'a ModuleDescriptor,
    supports_platform: bool,
    inactive_resources: Vec<String>,
}

fn main() -> ExitCode {
    match run(std::env::args().skip(1)) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("modloader_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: impl Iterator<Item = String>) -> Result<String, String> {
    let args = parse_args(args)?;
    if let Some(log_dir) = args.log_dir.as_deref() {
        init_logging(default_log_level(), log_dir)?;
    }

    let config = LoaderConfig::for_platform(&args.platform_version)?;
    let platform_version = config.platform_version();
    let mut environment = RuntimeEnvironment::new(platform_version.clone());
    for (module_id, version) in &args.installed {
        environment.install(module_id, version);
    }

    let loader = ModuleLoader::new(DirectoryArtifactStore::new(&config), config.clone());
    let module = loader
        .load(&args.module_dir)
        .map_err(|err| err.to_string())?;
    let inactive_resources = loader.inactive_resource_paths(&module, &environment);
    info!(
        "event=cli_inspect module=cli status=ok module_id={} inactive={}",
        module.module_id(),
        inactive_resources.len()
    );

    let report = ModuleReport {
        core_version: core_version(),
        platform_version,
        descriptor: module.descriptor(),
        supports_platform: module.descriptor().supports_platform(&config),
        inactive_resources,
    };
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--installed" => {
                let value = args.next().ok_or("--installed expects id=version")?;
                let (module_id, version) = value
                    .split_once('=')
                    .filter(|(id, version)| !id.trim().is_empty() && !version.trim().is_empty())
                    .ok_or_else(|| format!("--installed expects id=version, got `{value}`"))?;
                parsed
                    .installed
                    .push((module_id.to_string(), version.to_string()));
            }
            "--log-dir" => {
                parsed.log_dir = Some(args.next().ok_or("--log-dir expects a directory")?);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag `{flag}`\n{USAGE}")),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    parsed.module_dir = positional.next().map(PathBuf::from).ok_or(USAGE)?;
    parsed.platform_version = positional
        .next()
        .ok_or_else(|| format!("missing platform_version\n{USAGE}"))?;
    if positional.next().is_some() {
        return Err(format!("too many arguments\n{USAGE}"));
    }
    Ok(parsed)
}
