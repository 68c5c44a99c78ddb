use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pix_core::charge::RentCharge;
use pix_core::config::PixConfig;
use pix_core::{ErrorCorrection, PixCommand, PixEvent, PixPayload, PixRequest, run_backend};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod output;

#[derive(Parser)]
#[command(name = "pix")]
#[command(about = "Generate PIX copy-and-paste codes and QR images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a payload and its QR code
    Build(BuildArgs),

    /// Check the structure and checksum of a payload
    Verify {
        /// Payload to check
        payload: String,
    },

    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// Receiver's PIX key (email, phone, tax id or random key)
    #[arg(short, long, env = "PIX_KEY")]
    key: Option<String>,

    /// Receiver name, cut to 25 chars
    #[arg(short, long, env = "PIX_MERCHANT_NAME")]
    name: Option<String>,

    /// Receiver city, cut to 15 chars
    #[arg(short, long, env = "PIX_MERCHANT_CITY")]
    city: Option<String>,

    /// Amount in BRL, e.g. 10.50 or 10,50. Omit for an open amount
    #[arg(short, long)]
    amount: Option<String>,

    /// Transaction id, cut to 25 chars
    #[arg(short, long, conflicts_with = "contract")]
    txid: Option<String>,

    /// Rent contract id: generates a txid and fills missing fields from defaults
    #[arg(long)]
    contract: Option<u64>,

    /// Error correction level (l, m, q, h)
    #[arg(long)]
    ecc: Option<ErrorCorrection>,

    /// Write the QR code as PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Print payload and data URL as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Do not draw the QR code in the terminal
    #[arg(long)]
    no_terminal_qr: bool,
}

impl BuildArgs {
    fn to_command(&self, config: &PixConfig) -> Result<PixCommand> {
        if let Some(contract_id) = self.contract {
            let charge = RentCharge {
                contract_id,
                owner_full_name: self.name.clone(),
                owner_username: None,
                city: self.city.clone(),
                price: self.amount.clone(),
                pix_key: self.key.clone(),
            };
            return Ok(PixCommand::BuildForCharge {
                request_id: format!("contract-{contract_id}"),
                charge,
            });
        }

        let key = self
            .key
            .clone()
            .context("--key is required unless --contract is given")?;
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| config.defaults.merchant_name.clone());
        let city = self
            .city
            .clone()
            .unwrap_or_else(|| config.defaults.merchant_city.clone());

        let mut request = PixRequest::new(key, name, city);
        if let Some(amount) = &self.amount {
            request = request.with_amount(amount.as_str());
        }
        if let Some(txid) = &self.txid {
            request = request.with_txid(txid.as_str());
        }
        Ok(PixCommand::build(request).1)
    }
}

async fn build(args: BuildArgs, mut config: PixConfig) -> Result<()> {
    if let Some(level) = args.ecc {
        config.qr.error_correction = level;
    }
    let command = args.to_command(&config)?;
    let request_id = command.request_id().to_string();
    let error_correction = config.qr.error_correction;

    let (cmd_tx, cmd_rx) = mpsc::channel::<PixCommand>(1);
    let (event_tx, mut event_rx) = mpsc::channel::<PixEvent>(1);
    let backend = tokio::spawn(run_backend(cmd_rx, event_tx, config));

    cmd_tx.send(command).await.context("Backend stopped")?;
    drop(cmd_tx);

    let event = event_rx.recv().await.context("Backend sent no result")?;
    backend.await.context("Backend task panicked")?;

    let result = match event {
        PixEvent::Built { request_id: id, result } if id == request_id => result,
        PixEvent::Built { request_id: id, .. } => bail!("Unexpected result for request {id}"),
        PixEvent::Failed { error, .. } => bail!(error),
    };

    if let Some(path) = &args.png {
        output::write_png(path, &result.qr_image)?;
    }

    if args.json {
        output::print_json(&result)?;
    } else {
        output::print_text(&result, !args.no_terminal_qr, error_correction)?;
    }
    Ok(())
}

fn verify(payload: &str) -> Result<()> {
    let payload = PixPayload::parse(payload.trim()).context("Invalid payload")?;
    println!("OK: CRC {}", payload.crc());
    for field in payload.fields()? {
        println!("{} {:>2} {}", field.tag, field.value.chars().count(), field.value);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file (PIX_KEY, PIX_CONFIG_DIR etc.)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PixConfig::load();

    match cli.command {
        Commands::Build(args) => {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start runtime")?;
            rt.block_on(build(args, config))
        }
        Commands::Verify { payload } => verify(&payload),
        Commands::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            if save {
                let path = config.save()?;
                eprintln!("Saved to {}", path.display());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> BuildArgs {
        let mut argv = vec!["pix", "build"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("Should parse").command {
            Commands::Build(args) => args,
            _ => panic!("Expected build"),
        }
    }

    #[test]
    fn test_explicit_fields() {
        let args = parse(&["-k", "k@x.com", "-n", "Ana", "-c", "Natal", "-a", "10,50", "-t", "T1"]);
        match args.to_command(&PixConfig::default()).unwrap() {
            PixCommand::Build { request, .. } => {
                assert_eq!(request.pix_key, "k@x.com");
                assert_eq!(request.txid.as_deref(), Some("T1"));
            }
            _ => panic!("Expected Build"),
        }
    }

    #[test]
    fn test_contract_mode() {
        let args = parse(&["--contract", "42", "-a", "1500"]);
        match args.to_command(&PixConfig::default()).unwrap() {
            PixCommand::BuildForCharge { request_id, charge } => {
                assert_eq!(request_id, "contract-42");
                assert_eq!(charge.price.as_deref(), Some("1500"));
            }
            _ => panic!("Expected BuildForCharge"),
        }
    }

    #[test]
    fn test_txid_conflicts_with_contract() {
        assert!(Cli::try_parse_from(["pix", "build", "--contract", "1", "-t", "X"]).is_err());
    }

    #[test]
    fn test_ecc_flag() {
        let args = parse(&["-k", "k", "--ecc", "h"]);
        assert_eq!(args.ecc, Some(ErrorCorrection::High));
    }
}
