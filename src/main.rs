use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use networking::messages::{
    MessageData, NewBlockHashesMessage, NodeDataMessage, RawMessage,
    codes::{eth_pv62, eth_pv63, message_name},
};
use networking::sync::PivotBlockConfig;
use tracing::info;

#[derive(Parser, Debug)]
struct Args {
    /// Pivot block settings, YAML. Defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode an eth wire message payload.
    Decode {
        /// Message code, decimal or 0x-prefixed hex.
        #[arg(long, value_parser = parse_code)]
        code: u32,

        /// RLP payload as hex.
        #[arg(long)]
        hex: String,
    },

    /// Print the effective pivot block settings.
    Config,

    /// Tell whether a pivot would be replaced at the given chain height.
    Check {
        #[arg(long)]
        pivot: Option<u64>,

        #[arg(long)]
        head: u64,
    },
}

fn parse_code(value: &str) -> Result<u32> {
    let code = match value.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    code.with_context(|| format!("invalid message code {value}"))
}

fn load_config(path: Option<&PathBuf>) -> Result<PivotBlockConfig> {
    match path {
        Some(path) => PivotBlockConfig::load_from_file(path),
        None => Ok(PivotBlockConfig::default()),
    }
}

fn decode(code: u32, payload: &str) -> Result<()> {
    let payload = hex::decode(payload.trim_start_matches("0x")).context("payload is not hex")?;
    let raw = RawMessage::new(code, payload);
    info!(
        code,
        name = message_name(code).unwrap_or("unknown"),
        size = raw.size(),
        "Decoding message"
    );

    match code {
        eth_pv62::NEW_BLOCK_HASHES => {
            let message = NewBlockHashesMessage::try_from(raw)?;
            for announced in message.new_hashes()? {
                println!("{}", announced?);
            }
        }
        eth_pv63::NODE_DATA => {
            let message = NodeDataMessage::try_from(raw)?;
            for (i, node) in message.iter_node_data()?.enumerate() {
                let node = node?;
                println!("{i}: {} bytes {node}", node.len());
            }
        }
        other => bail!(
            "cannot decode {} messages",
            message_name(other).unwrap_or("unknown")
        ),
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Decode { code, hex } => decode(code, &hex)?,
        Command::Config => print!("{}", serde_yaml::to_string(&config)?),
        Command::Check { pivot, head } => {
            let stale = pivot.is_none_or(|pivot| !config.is_close_to_head(pivot, head));
            println!("pivot {pivot:?} at head {head}: stale={stale}");
            if stale {
                println!("switch allowed once head >= candidate + {}", config.switch_margin);
            }
        }
    }
    Ok(())
}
