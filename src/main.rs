use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dapptools::config::{self, Config};
use dapptools::infrastructure::abi::{FourByteClient, MemorySignatureCache, SignatureResolver};
use dapptools::infrastructure::runtime::CancellationToken;
use dapptools::modules::toolkit::{
    base, convert, create, create2, decode, encode, event, fourbyte, selector, tx, vanity,
    ToolResult,
};

#[derive(Debug, Parser)]
#[command(
    name = "dapptools",
    version,
    about = "dapptools: Ethereum developer tools for the command line"
)]
struct Args {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Signature database URL (overrides the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert an amount between ether units (e.g. "1.5 gwei")
    Convert {
        /// Amount followed by an optional unit
        input: Vec<String>,
    },
    /// Show a number in binary, octal, decimal and hex
    Base {
        value: String,
        /// Input base (bin, oct, dec, hex); guessed when omitted
        #[arg(long)]
        from: Option<String>,
    },
    /// Decode function calldata
    Decode {
        calldata: String,
        /// ABI text; the signature database is queried when omitted
        #[arg(long)]
        abi: Option<String>,
    },
    /// Decode an event log
    Event {
        /// Log topics, topic0 first
        #[arg(long = "topic", required = true)]
        topics: Vec<String>,
        /// Log data
        #[arg(long, default_value = "0x")]
        data: String,
        #[arg(long)]
        abi: Option<String>,
    },
    /// Decode a signed raw transaction and recover its sender
    Tx { raw: String },
    /// ABI-encode constructor arguments or a function call
    Encode {
        abi: String,
        /// Encode a call to this function instead of the constructor
        #[arg(long)]
        function: Option<String>,
        args: Vec<String>,
    },
    /// Address of a contract deployed with CREATE
    Create { deployer: String, nonce: String },
    /// Address of a contract deployed with CREATE2
    Create2 {
        deployer: String,
        salt: String,
        /// Init code, or its 32-byte keccak256 hash
        init_code: String,
    },
    /// Selectors and topics of every fragment in an ABI
    Sig { abi: String },
    /// Look up selectors or topics in the signature database
    Lookup {
        #[arg(required = true)]
        hashes: Vec<String>,
    },
    /// Generate a key pair whose address matches a pattern
    Vanity {
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value = "")]
        suffix: String,
        #[arg(long)]
        case_sensitive: bool,
        /// Worker threads (overrides the config file)
        #[arg(long)]
        workers: Option<usize>,
        /// Attempts per worker (overrides the config file)
        #[arg(long)]
        max_tries: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = config::load();
    if let Some(api_url) = &args.api_url {
        config.signatures.api_url = api_url.clone();
    }

    let results = run(args.command, &config).await?;
    print_results(&results, args.json)
}

async fn run(command: Command, config: &Config) -> Result<Vec<ToolResult>> {
    let results = match command {
        Command::Convert { input } => vec![convert::convert(&input.join(" "))?],
        Command::Base { value, from } => {
            let from = from.as_deref().map(str::parse::<base::Base>).transpose()?;
            vec![base::base(&value, from)?]
        }
        Command::Decode { calldata, abi } => {
            decode::decode(&calldata, abi.as_deref(), &resolver(config)?).await?
        }
        Command::Event { topics, data, abi } => {
            event::decode_log(&topics, &data, abi.as_deref(), &resolver(config)?).await?
        }
        Command::Tx { raw } => vec![tx::tx(&raw)?],
        Command::Encode {
            abi,
            function,
            args,
        } => vec![encode::encode(&abi, function.as_deref(), &args)?],
        Command::Create { deployer, nonce } => vec![create::create(&deployer, &nonce)?],
        Command::Create2 {
            deployer,
            salt,
            init_code,
        } => vec![create2::create2(&deployer, &salt, &init_code)?],
        Command::Sig { abi } => vec![selector::selector(&abi)?],
        Command::Lookup { hashes } => fourbyte::fourbyte_many(&hashes, &resolver(config)?).await?,
        Command::Vanity {
            prefix,
            suffix,
            case_sensitive,
            workers,
            max_tries,
        } => {
            let request = vanity::VanityRequest {
                prefix,
                suffix,
                case_sensitive,
                workers: workers.unwrap_or_else(|| config.vanity.worker_count()),
                max_tries: max_tries.or(config.vanity.max_tries),
            };
            vec![run_vanity(request).await?]
        }
    };
    Ok(results)
}

fn resolver(config: &Config) -> Result<SignatureResolver> {
    let client = FourByteClient::new(&config.signatures.api_url, config.signatures.timeout())
        .context("failed to build signature database client")?;
    Ok(SignatureResolver::new(
        Arc::new(client),
        Arc::new(MemorySignatureCache::new()),
    ))
}

/// Run the search off the async runtime; Ctrl-C stops every worker
async fn run_vanity(request: vanity::VanityRequest) -> Result<ToolResult> {
    let cancel = CancellationToken::new();
    let worker_cancel = cancel.clone();
    let search = tokio::task::spawn_blocking(move || vanity::vanity(&request, &worker_cancel));

    tokio::select! {
        result = search => result.context("vanity search panicked")?,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            anyhow::bail!("vanity search interrupted")
        }
    }
}

fn print_results(results: &[ToolResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print!("{}", result);
    }
    Ok(())
}
