//! Shroud CLI
//!
//! Command-line interface for stealth meta-addresses and burn payments.

use alloy_primitives::{Address, B256};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shroud_core::constants::DEFAULT_KEY_DOMAIN;
use shroud_core::types::{BurnAnnouncement, BurnLogEntry, CompressedPublicKey, MetaAddress, SecretScalar};
use shroud_crypto::{compute_burn_address, recover_signer_address, recover_signer_public_key, sign_message, secret_to_public_key};
use shroud_ens::{EnsClient, EnsConfig, MetaKeyRegistry};
use shroud_registry::{MemoryBurnLog, MemoryTextRecords};
use shroud_relay::{RelayClient, RelayConfig};
use shroud_scanner::{BurnScanner, RpcLogSource, ScanProgress, ScannerConfig};
use shroud_stealth::{create_burn_payment, scan_entries, BurnPayment, Erc5564Deriver, StealthWallet};

/// Shroud - stealth meta-addresses and burn payments
#[derive(Parser)]
#[command(name = "shroud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Use Sepolia contract addresses
    #[arg(long, global = true)]
    sepolia: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive stealth keys and the meta-address from a wallet signature
    Derive {
        /// 65-byte wallet signature (hex)
        #[arg(short, long)]
        signature: String,
        /// Key derivation domain
        #[arg(long, default_value = DEFAULT_KEY_DOMAIN)]
        domain: String,
        /// Also print the secret keys
        #[arg(long)]
        show_secrets: bool,
    },

    /// Meta-address utilities
    Meta {
        #[command(subcommand)]
        command: MetaCommands,
    },

    /// Create a burn payment to a meta-address or ENS name
    Send {
        /// Recipient meta-address, ENS name or address
        recipient: String,
        /// Observer public key bound into the burn address (compressed hex)
        #[arg(short, long)]
        observer: String,
        /// Ethereum RPC URL (for ENS lookups)
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: Option<String>,
        /// Submit the announcement to the relay
        #[arg(long)]
        relay: bool,
        /// Relay base URL
        #[arg(long, env = "SHROUD_RELAY_URL")]
        relay_url: Option<String>,
    },

    /// Compute the burn address for an observer key and stealth address
    BurnAddress {
        /// Observer public key (compressed hex)
        #[arg(short, long)]
        observer: String,
        /// Stealth address
        #[arg(short, long)]
        stealth_address: Address,
    },

    /// Recover the signer of an EIP-191 personal message
    Recover {
        /// Signed message
        #[arg(short, long, default_value = DEFAULT_KEY_DOMAIN)]
        message: String,
        /// 65-byte signature (hex)
        #[arg(short, long)]
        signature: String,
    },

    /// Fetch the meta-address of an ENS name or address
    Fetch {
        /// ENS name or address
        name: String,
        /// Ethereum RPC URL
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: Option<String>,
    },

    /// Publish a meta-address to an ENS name
    Publish {
        /// ENS name
        name: String,
        #[command(flatten)]
        source: MetaSource,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Empty the metaKey record of an ENS name
    Clear {
        /// ENS name
        name: String,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Read the metaKey record, publishing one if it is missing
    GetOrCreate {
        /// ENS name
        name: String,
        #[command(flatten)]
        source: MetaSource,
        /// Publish a random placeholder instead of a meta-address
        #[arg(long, conflicts_with_all = ["signature", "meta"])]
        placeholder: bool,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Scan recent StealthBurn events
    Scan {
        /// Ethereum RPC URL
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: String,
        /// StealthBurn registry contract
        #[arg(long, env = "SHROUD_BURN_REGISTRY")]
        registry: Address,
        /// Blocks per window
        #[arg(long)]
        lookback: Option<u64>,
        /// Windows to walk back from the head
        #[arg(long, default_value = "1")]
        windows: u64,
        /// Wallet signature; when set, only burns paying to this wallet are shown
        #[arg(short, long, requires = "observer")]
        signature: Option<String>,
        /// Observer public key used by senders (compressed hex)
        #[arg(short, long)]
        observer: Option<String>,
    },

    /// Submit a burn announcement to the relay
    Relay {
        /// Compressed ephemeral public key (hex)
        #[arg(short, long)]
        ephemeral_key: String,
        /// Burn address
        #[arg(short, long)]
        burn_address: Address,
        /// Relay base URL
        #[arg(long, env = "SHROUD_RELAY_URL")]
        relay_url: Option<String>,
    },

    /// Check relay health
    RelayHealth {
        /// Relay base URL
        #[arg(long, env = "SHROUD_RELAY_URL")]
        relay_url: Option<String>,
    },

    /// Run the full flow offline against in-memory collaborators
    Demo {
        /// Unrelated burns to mix into the log
        #[arg(short, long, default_value = "20")]
        noise: u64,
    },
}

#[derive(Subcommand)]
enum MetaCommands {
    /// Parse and validate a meta-address
    Parse {
        /// Meta-address (st:eth:0x...)
        meta: String,
    },
}

#[derive(clap::Args)]
struct MetaSource {
    /// Derive the meta-address from this wallet signature
    #[arg(short, long, conflicts_with = "meta")]
    signature: Option<String>,
    /// Meta-address to publish
    #[arg(short, long)]
    meta: Option<String>,
}

#[derive(clap::Args)]
struct WriteArgs {
    /// Ethereum RPC URL (node must hold the account)
    #[arg(long, env = "ETH_RPC_URL")]
    rpc_url: Option<String>,
    /// Account sending the transaction
    #[arg(long, env = "SHROUD_ENS_ACCOUNT")]
    account: Address,
    /// Resolver to write to instead of the registered one
    #[arg(long)]
    resolver: Option<Address>,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "shroud=debug,info"
    } else {
        "shroud=info,warn"
    };
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()));
    if cli.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let sepolia = cli.sepolia;
    debug!(sepolia, json = cli.log_json, "Logging initialized");
    match cli.command {
        Commands::Derive {
            signature,
            domain,
            show_secrets,
        } => cmd_derive(&signature, &domain, show_secrets),
        Commands::Meta {
            command: MetaCommands::Parse { meta },
        } => cmd_meta_parse(&meta),
        Commands::Send {
            recipient,
            observer,
            rpc_url,
            relay,
            relay_url,
        } => cmd_send(&recipient, &observer, rpc_url, sepolia, relay.then_some(relay_url)).await,
        Commands::BurnAddress {
            observer,
            stealth_address,
        } => cmd_burn_address(&observer, stealth_address),
        Commands::Recover { message, signature } => cmd_recover(&message, &signature),
        Commands::Fetch { name, rpc_url } => cmd_fetch(&name, rpc_url, sepolia).await,
        Commands::Publish {
            name,
            source,
            write,
        } => cmd_publish(&name, &source, &write, sepolia).await,
        Commands::Clear { name, write } => cmd_clear(&name, &write, sepolia).await,
        Commands::GetOrCreate {
            name,
            source,
            placeholder,
            write,
        } => cmd_get_or_create(&name, &source, placeholder, &write, sepolia).await,
        Commands::Scan {
            rpc_url,
            registry,
            lookback,
            windows,
            signature,
            observer,
        } => {
            cmd_scan(
                &rpc_url,
                registry,
                lookback,
                windows,
                signature.as_deref(),
                observer.as_deref(),
                sepolia,
            )
            .await
        }
        Commands::Relay {
            ephemeral_key,
            burn_address,
            relay_url,
        } => cmd_relay(&ephemeral_key, burn_address, relay_url).await,
        Commands::RelayHealth { relay_url } => cmd_relay_health(relay_url).await,
        Commands::Demo { noise } => cmd_demo(noise).await,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_signature(signature: &str) -> Result<Vec<u8>> {
    hex::decode(signature.trim().trim_start_matches("0x")).context("Signature is not valid hex")
}

fn parse_observer(observer: &str) -> Result<CompressedPublicKey> {
    CompressedPublicKey::from_hex(observer.trim()).context("Invalid observer public key")
}

fn wallet_from_signature(signature: &str) -> Result<StealthWallet> {
    StealthWallet::from_signature(&parse_signature(signature)?).context("Failed to derive stealth keys")
}

fn ens_config(rpc_url: Option<String>, sepolia: bool) -> EnsConfig {
    match (rpc_url, sepolia) {
        (Some(url), true) => EnsConfig::sepolia(url),
        (Some(url), false) => EnsConfig::new(url),
        (None, _) => EnsConfig::default(),
    }
}

fn ens_registry(rpc_url: Option<String>, sepolia: bool) -> Result<MetaKeyRegistry<EnsClient>> {
    let client = EnsClient::with_config(ens_config(rpc_url, sepolia)).context("Invalid ENS configuration")?;
    Ok(MetaKeyRegistry::new(client))
}

fn write_registry(write: &WriteArgs, sepolia: bool) -> Result<MetaKeyRegistry<EnsClient>> {
    let config = ens_config(write.rpc_url.clone(), sepolia).with_account(write.account);
    let client = EnsClient::with_config(config).context("Invalid ENS configuration")?;
    let registry = MetaKeyRegistry::new(client);
    Ok(match write.resolver {
        Some(resolver) => registry.with_resolver(resolver),
        None => registry,
    })
}

fn meta_from_source(source: &MetaSource) -> Result<MetaAddress> {
    match (&source.signature, &source.meta) {
        (Some(signature), _) => Ok(wallet_from_signature(signature)?.meta_address().clone()),
        (None, Some(meta)) => MetaAddress::parse(meta).context("Invalid meta-address"),
        (None, None) => bail!("Provide --signature or --meta"),
    }
}

fn confirm(prompt: String, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn relay_client(relay_url: Option<String>) -> Result<RelayClient> {
    debug!(from_flag = relay_url.is_some(), "Configuring relay client");
    let client = match relay_url {
        Some(url) => RelayClient::new(RelayConfig::new(url)),
        None => RelayClient::from_env(),
    };
    client.context("Relay is not configured")
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    Ok(pb)
}

fn print_payment(payment: &BurnPayment) {
    println!("\n{}", "✅ Burn payment created:".green().bold());
    println!("   {} {}", "Stealth address:".yellow(), payment.stealth.stealth_address);
    println!("   {} {}", "Burn address:".yellow(), payment.burn_address);
    println!("   {} {}", "Ephemeral key:".dimmed(), payment.stealth.ephemeral_public_key);
    println!("   {} {}", "View tag:".dimmed(), payment.stealth.view_tag);
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEYS & META-ADDRESSES
// ═══════════════════════════════════════════════════════════════════════════════

/// Derive keys from a signature
fn cmd_derive(signature: &str, domain: &str, show_secrets: bool) -> Result<()> {
    println!("{}", "🔑 Deriving stealth keys...".cyan().bold());

    let wallet = StealthWallet::from_signature_with_domain(&parse_signature(signature)?, domain)
        .context("Failed to derive stealth keys")?;
    let keys = wallet.public_keys();

    println!("\n{}", "Meta-address:".yellow().bold());
    println!("   {}", wallet.meta_address());
    println!("   {} {}", "Spending PK:".dimmed(), keys.spending_public_key);
    println!("   {} {}", "Viewing PK:".dimmed(), keys.viewing_public_key);

    if show_secrets {
        let material = wallet.key_material();
        println!("\n{}", "⚠️  Secret keys - never share these:".red().bold());
        println!("   {} {}", "Spending SK:".dimmed(), material.spending_key.to_hex());
        println!("   {} {}", "Viewing SK:".dimmed(), material.viewing_key.to_hex());
    }

    Ok(())
}

/// Parse a meta-address
fn cmd_meta_parse(meta: &str) -> Result<()> {
    let meta = MetaAddress::parse(meta).context("Invalid meta-address")?;
    let keys = meta.keys();

    // Curve validity is checked by the crypto layer, not the codec
    let spending_ok = shroud_crypto::stealth::decode_public_key(&keys.spending_public_key).is_ok();
    let viewing_ok = shroud_crypto::stealth::decode_public_key(&keys.viewing_public_key).is_ok();
    let mark = |ok: bool| if ok { "✓".green() } else { "✗ not on curve".red() };

    println!("{}", "✅ Meta-address parsed:".green().bold());
    println!("   {} {} {}", "Spending PK:".dimmed(), keys.spending_public_key, mark(spending_ok));
    println!("   {} {} {}", "Viewing PK:".dimmed(), keys.viewing_public_key, mark(viewing_ok));
    println!("\n{}", serde_json::to_string_pretty(keys)?);

    Ok(())
}

/// Recover a signer
fn cmd_recover(message: &str, signature: &str) -> Result<()> {
    let signature = parse_signature(signature)?;
    let public_key = recover_signer_public_key(message.as_bytes(), &signature)
        .context("Failed to recover signer")?;
    let address = recover_signer_address(message.as_bytes(), &signature)?;

    println!("{}", "✅ Signer recovered:".green().bold());
    println!("   {} {}", "Address:".yellow(), address);
    println!("   {} {}", "Public key:".dimmed(), public_key);

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PAYMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Create a burn payment
async fn cmd_send(
    recipient: &str,
    observer: &str,
    rpc_url: Option<String>,
    sepolia: bool,
    relay_url: Option<Option<String>>,
) -> Result<()> {
    println!("{} {}", "💸 Creating burn payment to:".cyan().bold(), recipient);

    let observer = parse_observer(observer)?;
    let meta = if recipient.starts_with("st:") {
        MetaAddress::parse(recipient).context("Invalid meta-address")?
    } else {
        println!("   Looking up metaKey record...");
        ens_registry(rpc_url, sepolia)?
            .fetch(recipient)
            .await
            .context("Recipient published a malformed meta-address")?
            .with_context(|| format!("No meta-address published for {recipient}"))?
    };

    let payment = create_burn_payment(&Erc5564Deriver, &meta, &observer)
        .context("Failed to create burn payment")?;
    info!(
        stealth_address = %payment.stealth.stealth_address,
        burn_address = %payment.burn_address,
        "Burn payment created"
    );
    print_payment(&payment);

    match relay_url {
        Some(relay_url) => submit_to_relay(relay_client(relay_url)?, &payment.announcement).await?,
        None => {
            println!("\n{}", "ℹ️  Next steps:".cyan());
            println!("   1. Burn the value to the burn address above");
            println!("   2. Announce with: shroud relay -e {} -b {}",
                payment.announcement.ephemeral_public_key, payment.burn_address);
        }
    }

    Ok(())
}

/// Compute a burn address
fn cmd_burn_address(observer: &str, stealth_address: Address) -> Result<()> {
    let observer = parse_observer(observer)?;
    let burn = compute_burn_address(&observer, &stealth_address)
        .context("Observer key or stealth address does not fit the BN254 field")?;
    println!("{}", burn);
    Ok(())
}

async fn submit_to_relay(client: RelayClient, announcement: &BurnAnnouncement) -> Result<()> {
    let pb = spinner("Submitting to relay...")?;
    let result = client.submit(announcement).await;
    pb.finish_and_clear();

    let result = result.context("Relay submission failed")?;
    if result.success {
        println!("\n{} {}", "✅ Relayed:".green().bold(), result.message);
        if let Some(tx_hash) = result.tx_hash {
            println!("   {} {}", "Tx:".dimmed(), tx_hash);
        }
    } else {
        println!("\n{} {}", "❌ Relay failed:".red().bold(), result.error.unwrap_or(result.message));
    }
    Ok(())
}

/// Submit an announcement
async fn cmd_relay(ephemeral_key: &str, burn_address: Address, relay_url: Option<String>) -> Result<()> {
    let ephemeral = CompressedPublicKey::from_hex(ephemeral_key).context("Invalid ephemeral key")?;
    submit_to_relay(relay_client(relay_url)?, &BurnAnnouncement::new(ephemeral, burn_address)).await
}

/// Check relay health
async fn cmd_relay_health(relay_url: Option<String>) -> Result<()> {
    let client = relay_client(relay_url)?;
    if client.health().await.context("Relay unreachable")? {
        println!("{} {}", "✅ Relay healthy:".green().bold(), client.base_url());
    } else {
        println!("{} {}", "❌ Relay unhealthy:".red().bold(), client.base_url());
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetch a meta-address
async fn cmd_fetch(name: &str, rpc_url: Option<String>, sepolia: bool) -> Result<()> {
    println!("{} {}", "🔍 Fetching:".cyan().bold(), name);

    match ens_registry(rpc_url, sepolia)?.fetch(name).await {
        Ok(Some(meta)) => {
            println!("\n{}", "✅ Meta-address:".green().bold());
            println!("   {}", meta);
        }
        Ok(None) => println!("\n{}", "⚠️  No meta-address published.".yellow()),
        Err(e) => println!("\n{} {}", "❌ Record is malformed:".red().bold(), e),
    }
    Ok(())
}

/// Publish a meta-address
async fn cmd_publish(name: &str, source: &MetaSource, write: &WriteArgs, sepolia: bool) -> Result<()> {
    let meta = meta_from_source(source)?;
    println!("{} {}", "📤 Publishing to:".cyan().bold(), name);
    println!("   {}", meta);

    if !confirm(format!("Send setText for {name} from {}?", write.account), write.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let tx_hash = write_registry(write, sepolia)?
        .publish(name, &meta)
        .await
        .context("Failed to publish meta-address")?;
    info!(name, %tx_hash, "Publish transaction sent");
    println!("\n{} {}", "✅ Sent:".green().bold(), tx_hash);
    Ok(())
}

/// Clear the metaKey record
async fn cmd_clear(name: &str, write: &WriteArgs, sepolia: bool) -> Result<()> {
    if !confirm(format!("Clear the metaKey record of {name}?"), write.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let tx_hash = write_registry(write, sepolia)?
        .clear(name)
        .await
        .context("Failed to clear record")?;
    info!(name, %tx_hash, "Clear transaction sent");
    println!("{} {}", "✅ Cleared:".green().bold(), tx_hash);
    Ok(())
}

/// Read or create the metaKey record
async fn cmd_get_or_create(
    name: &str,
    source: &MetaSource,
    placeholder: bool,
    write: &WriteArgs,
    sepolia: bool,
) -> Result<()> {
    let registry = write_registry(write, sepolia)?;
    let record = if placeholder {
        registry.get_or_create_placeholder(name).await
    } else {
        registry.get_or_create(name, &meta_from_source(source)?).await
    }
    .context("Failed to read or create record")?;

    if record.is_new {
        println!("{} {}", "✅ Created:".green().bold(), record.value);
        if let Some(tx_hash) = record.tx_hash {
            println!("   {} {}", "Tx:".dimmed(), tx_hash);
        }
    } else {
        println!("{} {}", "ℹ️  Existing:".cyan().bold(), record.value);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SCANNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Scan for burns
async fn cmd_scan(
    rpc_url: &str,
    registry: Address,
    lookback: Option<u64>,
    windows: u64,
    signature: Option<&str>,
    observer: Option<&str>,
    sepolia: bool,
) -> Result<()> {
    println!("{}", "🔎 Scanning StealthBurn events...".cyan().bold());

    let mut config = if sepolia { ScannerConfig::sepolia() } else { ScannerConfig::new() };
    if let Some(lookback) = lookback {
        config = config.lookback(lookback);
    }
    debug!(%registry, lookback = config.lookback, min_block = config.min_block, windows, "Starting scan");
    let source = RpcLogSource::new(rpc_url, registry).context("Invalid RPC URL")?;
    let scanner = BurnScanner::new(source, config);

    let pb = ProgressBar::new(windows);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} windows {msg}")?
            .progress_chars("#>-"),
    );
    let progress_bar = pb.clone();
    let entries = scanner
        .scan_history(
            windows,
            Some(Box::new(move |p: &ScanProgress| {
                progress_bar.set_position(p.windows);
                progress_bar.set_message(format!("{} burns", p.entries));
            })),
        )
        .await;
    pb.finish_and_clear();

    if entries.is_empty() {
        println!("\n{}", "No burns found (or the log query failed; see logs).".yellow());
        return Ok(());
    }

    match (signature, observer) {
        (Some(signature), Some(observer)) => {
            let wallet = wallet_from_signature(signature)?;
            let (found, stats) = scan_entries(&wallet, &entries, &parse_observer(observer)?)
                .context("Observer key does not fit the BN254 field")?;

            println!(
                "\n{} {} of {} burn(s) pay to this wallet ({} candidates tried)",
                "✅".green(),
                found.len(),
                stats.total_scanned,
                stats.candidates_tried
            );
            for burn in found {
                println!("   {} {}", "Stealth address:".green(), burn.stealth_address);
                println!("      block {} log {} tx {}", burn.block_number, burn.log_index, burn.transaction_hash);
            }
        }
        _ => {
            println!("\n{} {} burn(s):", "✅".green(), entries.len());
            for entry in entries {
                println!(
                    "   #{}:{}  {}  eph {}",
                    entry.block_number, entry.log_index, entry.burn_address, entry.ephemeral_public_key
                );
            }
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEMO
// ═══════════════════════════════════════════════════════════════════════════════

/// End-to-end run against in-memory collaborators
async fn cmd_demo(noise: u64) -> Result<()> {
    println!("{}", "🎬 Running offline demo...".cyan().bold());

    // Recipient signs the derivation message and derives keys
    let mut recipient_secret = [0u8; 32];
    recipient_secret[31] = 0x2a;
    let recipient_secret = SecretScalar::from_array(recipient_secret);
    let signature = sign_message(&recipient_secret, DEFAULT_KEY_DOMAIN.as_bytes())?;
    let owner = recover_signer_address(DEFAULT_KEY_DOMAIN.as_bytes(), &signature)?;
    let wallet = StealthWallet::from_signature(&signature)?;
    println!("   ✓ Derived meta-address for {}", owner);

    // Publish it under a name
    let store = MemoryTextRecords::new().with_account(owner);
    store.register("recipient.eth", owner);
    store.set_reverse(owner, "recipient.eth");
    let registry = MetaKeyRegistry::new(store);
    let tx_hash = registry.publish("recipient.eth", wallet.meta_address()).await?;
    println!("   ✓ Published to recipient.eth ({})", tx_hash);

    // Sender looks the recipient up by address and pays
    let meta = registry
        .fetch(&owner.to_string())
        .await?
        .context("Published meta-address not found")?;
    let mut observer_secret = [0u8; 32];
    observer_secret[31] = 5;
    let observer = secret_to_public_key(&SecretScalar::from_array(observer_secret))?;
    let payment = create_burn_payment(&Erc5564Deriver, &meta, &observer)?;
    print_payment(&payment);

    // The relay would emit this; append it among unrelated burns
    let log = MemoryBurnLog::new();
    for i in 0..noise {
        log.push(BurnLogEntry {
            ephemeral_public_key: B256::repeat_byte(0x02),
            burn_address: Address::repeat_byte((i % 255) as u8 + 1),
            block_number: 100 + i,
            transaction_hash: B256::repeat_byte(0xaa),
            log_index: 0,
        });
    }
    log.push(BurnLogEntry {
        ephemeral_public_key: payment.announcement.onchain_ephemeral_key(),
        burn_address: payment.burn_address,
        block_number: 100 + noise / 2,
        transaction_hash: B256::repeat_byte(0xbb),
        log_index: 1,
    });

    // Recipient scans
    let pb = spinner("Scanning...")?;
    let summary = BurnScanner::new(log, ScannerConfig::new())
        .scan_for_wallet(&wallet, &observer)
        .await?;
    pb.finish_and_clear();

    println!(
        "\n{} scanned {} burns in {}ms, {} candidates tried",
        "📈".green(),
        summary.stats.total_scanned,
        summary.duration_ms,
        summary.stats.candidates_tried
    );
    match summary.discoveries.first() {
        Some(found) if found.stealth_address == payment.stealth.stealth_address => {
            println!("   {} Found our burn at block {}", "✅".green(), found.block_number);
        }
        _ => println!("   {} Burn not found", "❌".red()),
    }

    Ok(())
}
