use std::{fmt, fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use zkgeo_common::{
    convert_verifying_key, pack_response, render_rust_module, ProverResponse, SignalLayout,
    VerifyingKeyJson,
};
use zkgeo_solana::{submit_payload, SUBMIT_PAYLOAD_BYTES};

const DEFAULT_VK_PATH: &str = "artifacts/verification_key.json";

#[derive(Parser)]
#[command(
    name = "zkgeo-tools",
    about = "Utility commands for geofence verifier artifacts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a snarkjs verification key into the verifier's constant table module.
    ConvertVk(ConvertVkArgs),
    /// Print metadata about a snarkjs verification key.
    DumpVk(DumpVkArgs),
    /// Pack a prover response into the on-chain instruction payload.
    PackProof(PackProofArgs),
}

/// Public signal layout of the deployed circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Four bounds signals, no nullifier.
    V1,
    /// Bounds then a trailing nullifier.
    V2Trailing,
    /// A leading nullifier then bounds.
    V2Leading,
}

impl From<LayoutArg> for SignalLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::V1 => SignalLayout::V1,
            LayoutArg::V2Trailing => SignalLayout::V2TrailingNullifier,
            LayoutArg::V2Leading => SignalLayout::V2LeadingNullifier,
        }
    }
}

#[derive(Args)]
struct ConvertVkArgs {
    /// Path to verification_key.json.
    #[arg(long, default_value = DEFAULT_VK_PATH)]
    vk: PathBuf,
    /// Output path for the generated Rust module; stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DumpVkArgs {
    #[arg(long, default_value = DEFAULT_VK_PATH)]
    vk: PathBuf,
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PackProofArgs {
    /// Path to the prover response JSON (proof plus publicSignals).
    #[arg(long)]
    response: PathBuf,
    /// Public signal layout to validate against.
    #[arg(long, value_enum, default_value_t = LayoutArg::V1)]
    layout: LayoutArg,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::ConvertVk(args) => convert_vk(args),
        Commands::DumpVk(args) => dump_vk(args),
        Commands::PackProof(args) => pack_proof(args),
    }
}

fn convert_vk(args: ConvertVkArgs) -> Result<()> {
    let vk = load_vk(&args.vk)?;
    let table = convert_verifying_key(&vk)
        .with_context(|| format!("failed to convert {}", args.vk.display()))?;
    let source_name = args
        .vk
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.vk.display().to_string());
    let module = render_rust_module(&table, &source_name);
    match args.output {
        Some(path) => {
            fs::write(&path, module)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!(
                "Wrote constant table ({} public inputs, {} IC entries) to {}",
                table.nr_pubinputs,
                table.ic.len(),
                path.display()
            );
        }
        None => print!("{module}"),
    }
    Ok(())
}

fn dump_vk(args: DumpVkArgs) -> Result<()> {
    let vk = load_vk(&args.vk)?;
    let table = convert_verifying_key(&vk)
        .with_context(|| format!("failed to convert {}", args.vk.display()))?;
    let summary = VkSummary {
        vk_path: args.vk.display().to_string(),
        protocol: vk.protocol,
        curve: vk.curve,
        n_public: table.nr_pubinputs,
        ic_entries: table.ic.len(),
        alpha_g1: hex::encode(table.alpha_g1),
    };
    output_summary(&summary, args.json)
}

fn pack_proof(args: PackProofArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.response)
        .with_context(|| format!("failed to read {}", args.response.display()))?;
    let response: ProverResponse = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", args.response.display()))?;
    let layout = SignalLayout::from(args.layout);
    let (proof, inputs) = pack_response(layout, &response)
        .with_context(|| format!("failed to pack {}", args.response.display()))?;
    let payload = submit_payload(&proof, &inputs);
    println!("payload: {} bytes", SUBMIT_PAYLOAD_BYTES);
    println!("{}", hex::encode(&payload));
    if let Some(nullifier) = inputs.nullifier {
        println!("nullifier: {}", hex::encode(nullifier));
    }
    Ok(())
}

fn load_vk(path: &PathBuf) -> Result<VerifyingKeyJson> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn output_summary<T>(summary: &T, json: bool) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        println!("{}", summary);
    }
    Ok(())
}

#[derive(Serialize)]
struct VkSummary {
    vk_path: String,
    protocol: String,
    curve: String,
    n_public: usize,
    ic_entries: usize,
    alpha_g1: String,
}

impl fmt::Display for VkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "vk: {}", self.vk_path)?;
        writeln!(f, "protocol: {}", self.protocol)?;
        writeln!(f, "curve: {}", self.curve)?;
        writeln!(f, "public inputs: {}", self.n_public)?;
        writeln!(f, "IC entries: {}", self.ic_entries)?;
        writeln!(f, "alpha_g1 (le hex): {}", self.alpha_g1)
    }
}
