#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("Build with --features cli to enable the carbon-registry tool.");
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    cli::run()
}

#[cfg(feature = "cli")]
mod cli {
    use anyhow::{anyhow, bail, Context};
    use carbon_registry_core::call::Call;
    use carbon_registry_core::config::GenesisConfig;
    use carbon_registry_core::replay::Replayer;
    use carbon_registry_core::validation::{principal_of, sign_call};
    use clap::{Args, Parser, Subcommand};
    use std::fs;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    /// Offline driver for the carbon registry: sign calls and replay them
    /// against a genesis state.
    #[derive(Parser, Debug)]
    #[command(name = "carbon-registry")]
    struct Cli {
        /// Log filter used when RUST_LOG is unset
        #[arg(long, env = "LOG_LEVEL", default_value = "info")]
        log_level: String,

        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Print the principal (public key hex) of a secret key
        Principal(KeyArgs),
        /// Sign a call given as JSON and print the signed envelope
        Sign {
            #[command(flatten)]
            key: KeyArgs,
            /// Chain the envelope is valid on (genesis `chain_id`)
            #[arg(long)]
            chain_id: String,
            /// Per-caller sequence number, above any nonce used before
            #[arg(long)]
            nonce: u64,
            /// Call JSON, e.g. {"op":"verify_entity","entity_id":"entity1"}
            #[arg(long)]
            call: String,
        },
        /// Apply a JSON-lines file of {"block_height": N, "call": SignedCall}
        Replay {
            #[arg(long)]
            genesis: PathBuf,
            #[arg(long)]
            calls: PathBuf,
            /// Print the final registry state as JSON
            #[arg(long)]
            print_state: bool,
        },
    }

    #[derive(Args, Debug)]
    struct KeyArgs {
        /// 32-byte ed25519 secret key, hex
        #[arg(long, conflicts_with = "key_file")]
        key_hex: Option<String>,
        /// File holding the secret key hex
        #[arg(long)]
        key_file: Option<PathBuf>,
    }

    impl KeyArgs {
        fn secret(&self) -> anyhow::Result<[u8; 32]> {
            let secret_hex = match (&self.key_hex, &self.key_file) {
                (Some(h), _) => h.clone(),
                (None, Some(path)) => fs::read_to_string(path)
                    .with_context(|| format!("read key file {}", path.display()))?,
                (None, None) => bail!("missing --key-hex or --key-file"),
            };
            let mut sk = [0u8; 32];
            hex::decode_to_slice(secret_hex.trim(), &mut sk)
                .map_err(|_| anyhow!("secret key must be 32 bytes hex"))?;
            Ok(sk)
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();

        tracing_subscriber::registry()
            .with(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        match cli.command {
            Command::Principal(key) => {
                println!("{}", principal_of(&key.secret()?));
            }
            Command::Sign {
                key,
                chain_id,
                nonce,
                call,
            } => {
                let call: Call = serde_json::from_str(&call).context("parse call json")?;
                let signed = sign_call(&chain_id, nonce, call, &key.secret()?);
                println!("{}", serde_json::to_string(&signed)?);
            }
            Command::Replay {
                genesis,
                calls,
                print_state,
            } => replay(&genesis, &calls, print_state)?,
        }
        Ok(())
    }

    fn replay(genesis: &Path, calls: &Path, print_state: bool) -> anyhow::Result<()> {
        let genesis = GenesisConfig::load(genesis)?;
        let mut replayer = Replayer::from_genesis(&genesis);

        let file = fs::File::open(calls).with_context(|| format!("open {}", calls.display()))?;
        for report in replayer.replay(BufReader::new(file))? {
            println!("{report}");
        }
        if print_state {
            println!("{}", serde_json::to_string_pretty(replayer.state())?);
        }
        Ok(())
    }
}
