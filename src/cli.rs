//! # PAASCTL CLI
//!
//! Command-line companion of the Paas webservice.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a key pair for the webservice
//! paasctl generate --private-key privateKey --public-key publicKey
//!
//! # Encrypt an SSH key for a Paas (reads the secret from stdin)
//! paasctl encrypt --public-key publicKey --paas my-paas < id_rsa
//!
//! # Check that every SSH secret in a Paas manifest can be decrypted
//! paasctl check-paas --private-key privateKey --public-key publicKey paas.yaml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paas_webservice::constants::DEFAULT_KEY_BITS;
use paas_webservice::crypt::{self, Crypt};
use paas_webservice::{check_paas, Paas};
use std::io::Read;
use std::path::PathBuf;
use zeroize::Zeroizing;

#[derive(Parser)]
#[command(name = "paasctl")]
#[command(about = "Encrypt and verify SSH secrets for Paas resources", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new RSA key pair
    Generate {
        /// Path to write the private key to
        #[arg(long)]
        private_key: PathBuf,
        /// Path to write the public key to
        #[arg(long)]
        public_key: PathBuf,
        /// Key size in bits
        #[arg(long, default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
    },
    /// Encrypt a secret for a Paas
    Encrypt {
        /// Public key of the webservice
        #[arg(long)]
        public_key: PathBuf,
        /// Name of the Paas the secret belongs to
        #[arg(long)]
        paas: String,
        /// File containing the secret (reads stdin when omitted)
        #[arg(long)]
        secret_file: Option<PathBuf>,
    },
    /// Check that every SSH secret in a Paas manifest can be decrypted
    CheckPaas {
        /// Private key of the webservice
        #[arg(long)]
        private_key: PathBuf,
        /// Public key of the webservice
        #[arg(long)]
        public_key: PathBuf,
        /// Paas manifest (YAML or JSON)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            private_key,
            public_key,
            bits,
        } => {
            crypt::generate_key_pair(&private_key, &public_key, bits)
                .context("Failed to generate key pair")?;
            println!(
                "✅ Wrote private key to {} and public key to {}",
                private_key.display(),
                public_key.display()
            );
        }
        Commands::Encrypt {
            public_key,
            paas,
            secret_file,
        } => {
            let key = crypt::load_public_key(&public_key)?;
            let secret = read_secret(secret_file.as_ref())?;
            let encrypted = crypt::encrypt_for(&key, &paas, &secret)
                .context("Failed to encrypt secret")?;
            println!("{encrypted}");
        }
        Commands::CheckPaas {
            private_key,
            public_key,
            file,
        } => {
            let manifest = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let value: serde_json::Value = serde_yaml::from_str(&manifest)
                .with_context(|| format!("{} is not valid YAML or JSON", file.display()))?;
            let paas = Paas::from_value(value)
                .with_context(|| format!("{} is not a Paas manifest", file.display()))?;
            let name = paas
                .metadata
                .name
                .clone()
                .filter(|name| !name.is_empty())
                .context("Paas manifest has no metadata.name")?;

            let crypt = Crypt::from_files(&private_key, &public_key, name.as_str())?;
            check_paas(&crypt, &paas).with_context(|| format!("Paas '{name}' is rejected"))?;
            println!(
                "✅ All {} SSH secrets of Paas '{}' can be decrypted",
                paas.spec.secret_count(),
                name
            );
        }
    }

    Ok(())
}

fn read_secret(secret_file: Option<&PathBuf>) -> Result<Zeroizing<Vec<u8>>> {
    let mut secret = Zeroizing::new(Vec::new());
    match secret_file {
        Some(path) => {
            let mut file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            file.read_to_end(&mut secret)?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut secret)
                .context("Failed to read secret from stdin")?;
        }
    }
    Ok(secret)
}
