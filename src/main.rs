use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use std::path::PathBuf;
use tracing_subscriber::{self, filter::EnvFilter};

use hash_refactor_mcp::{
    config::ServiceConfig, hash_refactor_service::HashRefactorService,
    refactoring::RefactorOptions,
};

/// Hash Refactor MCP Server - Turn Lua string literals into hash constants
#[derive(Parser, Debug)]
#[command(name = "hash-refactor-mcp")]
#[command(about = "Model Context Protocol server for Lua hash refactoring")]
#[command(version)]
struct Args {
    /// Workspace roots (can be specified multiple times)
    #[arg(
        short = 'd',
        long = "root-dir",
        help = "Workspace root directory (default: current directory)",
        value_name = "PATH"
    )]
    root_directories: Vec<PathBuf>,

    /// Maximum file size to process (in bytes)
    #[arg(
        long = "max-file-size",
        default_value = "10485760", // 10MB
        help = "Maximum file size to process in bytes"
    )]
    max_file_size: u64,

    #[arg(
        long = "prefix",
        default_value = "",
        help = "Default prefix for generated constant names"
    )]
    prefix: String,

    #[arg(long = "capitalise", help = "Upper-case generated constant names by default")]
    capitalise: bool,

    #[arg(
        long = "module-path",
        default_value = "",
        help = "Default workspace-relative hash module (empty: declare locals)",
        value_name = "PATH"
    )]
    module_path: String,

    #[arg(
        long = "module-require-binding",
        default_value = "h",
        help = "Default local name the hash module is required as"
    )]
    module_require_binding: String,
}

#[tokio::main]
#[tracing::instrument]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting MCP server with config: {:?}", args);

    let config = create_config_from_args(args)?;

    let service = HashRefactorService::with_config(config)
        .serve(stdio())
        .await?;

    tracing::info!("Service started, waiting for connections");
    service.waiting().await?;
    Ok(())
}

/// Create a ServiceConfig from command line arguments
fn create_config_from_args(args: Args) -> Result<ServiceConfig> {
    let root_directories = if args.root_directories.is_empty() {
        // Default to current working directory, then home
        let fallback = std::env::current_dir()
            .ok()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("no --root-dir given and no current directory"))?;
        vec![fallback]
    } else {
        args.root_directories
    };

    Ok(ServiceConfig {
        max_file_size: args.max_file_size,
        root_directories,
        default_options: RefactorOptions {
            prefix: args.prefix,
            capitalise: args.capitalise,
            module_path: args.module_path,
            module_require_binding: args.module_require_binding,
        },
        ..Default::default()
    })
}
