use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use rand_core::OsRng;

use cryptotests::cmd::{self, DEFAULT_BITS, DEFAULT_MESSAGE};
use cryptotests::keystore::{KeyFile, KeyFormat, KeyStore};

/// Generate RSA key pairs as PEM and XML and round-trip messages through them.
#[derive(Debug, Parser)]
#[command(name = "cryptotests", version)]
struct Cli {
    /// Directory holding the key files [default: ~/CryptoTests]
    #[arg(long, env = "CRYPTOTESTS_BASE", global = true)]
    base: Option<PathBuf>,

    /// Message to encrypt
    #[arg(long, env = "CRYPTOTESTS_MESSAGE", default_value = DEFAULT_MESSAGE, global = true)]
    message: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a key pair and write it as PEM and XML
    Gen {
        /// Modulus size in bits
        #[arg(long, default_value_t = DEFAULT_BITS)]
        bits: usize,
    },
    /// Encrypt with key-public.xml and decrypt with key-private.xml
    TestXml,
    /// Encrypt with key-public.pem and decrypt with key-private.pem
    TestPem,
    /// Print the base64 ciphertext of the message
    Encrypt {
        /// Key file to encrypt with [default: <BASE>/key-public.pem]
        #[arg(long)]
        key: Option<PathBuf>,
    },
    /// Decrypt a base64 ciphertext and print the message
    Decrypt {
        /// Key file to decrypt with [default: <BASE>/key-private.pem]
        #[arg(long)]
        key: Option<PathBuf>,

        /// Base64 ciphertext
        ciphertext: String,
    },
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let base = match cli.base {
        Some(base) => base,
        None => KeyStore::default_base().ok_or_else(|| anyhow!("cannot get home dir"))?,
    };
    let store = KeyStore::new(base);
    let mut rng = OsRng;

    match cli.command {
        Command::Gen { bits } => {
            cmd::generate(&mut rng, &store, bits)?;
            for file in KeyFile::ALL {
                println!("{}", store.path(file).display());
            }
        }
        Command::TestXml => {
            cmd::round_trip(&mut rng, &store, KeyFormat::Xml, &cli.message)?;
            println!("XML: decrypted message matches \"{}\"", cli.message);
        }
        Command::TestPem => {
            cmd::round_trip(&mut rng, &store, KeyFormat::Pem, &cli.message)?;
            println!("PEM: decrypted message matches \"{}\"", cli.message);
        }
        Command::Encrypt { key } => {
            let key = key.unwrap_or_else(|| store.path(KeyFile::PublicPem));
            println!("{}", cmd::encrypt_message(&mut rng, &key, &cli.message)?);
        }
        Command::Decrypt { key, ciphertext } => {
            let key = key.unwrap_or_else(|| store.path(KeyFile::PrivatePem));
            println!("{}", cmd::decrypt_message(&key, &ciphertext)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
