//! ledgermark CLI - sign trust-check annotations and publish them to a ledger.

use clap::{Parser, Subcommand};
use ledgermark_contracts::{AnnotationKind, HashType, NetType, SdkAction, TopicId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{annotate, hash, history, keygen, publish, verify};

#[derive(Parser)]
#[command(name = "ledgermark")]
#[command(about = "Signed provenance annotations and ledger publication")]
struct Cli {
    /// Log at debug level (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an Ed25519 key pair as hex key files
    Keygen {
        /// Output file for the private key
        #[arg(long)]
        private: PathBuf,
        /// Output file for the public key
        #[arg(long)]
        public: PathBuf,
    },
    /// Print the content hash of input data
    Hash {
        /// Hash algorithm: sha256, blake3 or none
        #[arg(long, default_value = "sha256")]
        algorithm: HashType,
        /// Input file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Run one annotator over input data and print the signed annotation
    Annotate {
        /// SDK configuration file
        #[arg(long)]
        config: PathBuf,
        /// Annotator kind: attestation or remote-tpm
        #[arg(long)]
        kind: AnnotationKind,
        /// Device identifier attached to the request
        #[arg(long)]
        device_id: Option<String>,
        /// Input file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Verify the signature of an annotation
    Verify {
        /// File holding the hex public key
        #[arg(long)]
        public_key: PathBuf,
        /// Annotation JSON file (or stdin if not provided)
        annotation: Option<PathBuf>,
    },
    /// Run the configured annotators and publish their annotations
    Publish {
        /// SDK configuration file
        #[arg(long)]
        config: PathBuf,
        /// Directory holding the local ledger journals
        #[arg(long)]
        ledger_dir: PathBuf,
        /// Device identifier attached to the request
        #[arg(long)]
        device_id: Option<String>,
        /// Action recorded in the envelope
        #[arg(long, default_value = "publish")]
        action: SdkAction,
        /// Input file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// List messages committed to a topic
    History {
        /// Directory holding the local ledger journals
        #[arg(long)]
        ledger_dir: PathBuf,
        /// Network: mainnet, testnet or previewnet
        #[arg(long)]
        network: NetType,
        /// Topic identifier
        #[arg(long)]
        topic: TopicId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Treat a truncated journal tail as its end
        #[arg(long)]
        permissive: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Keygen { private, public } => keygen::run(private, public),
        Commands::Hash { algorithm, input } => hash::run(algorithm, input),
        Commands::Annotate {
            config,
            kind,
            device_id,
            input,
        } => annotate::run(config, kind, device_id, input),
        Commands::Verify {
            public_key,
            annotation,
        } => verify::run(public_key, annotation),
        Commands::Publish {
            config,
            ledger_dir,
            device_id,
            action,
            input,
        } => publish::run(config, ledger_dir, device_id, action, input),
        Commands::History {
            ledger_dir,
            network,
            topic,
            json,
            permissive,
        } => history::run(ledger_dir, network, topic, json, permissive),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
