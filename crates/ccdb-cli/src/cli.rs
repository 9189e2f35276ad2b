use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ccdb",
    about = "CCDB object-store backend: pack and unpack calibration objects",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Backend configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Pack an object into a PUT request
    Pack(PackArgs),
    /// Unpack a request or response into the original object
    Unpack(UnpackArgs),
    /// Show the fields of a request without decompressing it
    Inspect(InspectArgs),
    /// Write a GET request for a key
    GetRequest(GetRequestArgs),
}

#[derive(Args)]
pub struct PackArgs {
    /// Object path relative to the root directory
    pub path: String,
    #[arg(short, long)]
    pub key: String,
    /// Directory holding the source objects
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Output file; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct UnpackArgs {
    pub message: PathBuf,
    /// Output file; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    pub message: PathBuf,
}

#[derive(Args)]
pub struct GetRequestArgs {
    pub key: String,
    /// Output file; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
