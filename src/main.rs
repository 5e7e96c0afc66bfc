use ::tracing::{error, info};
use bigdecimal::BigDecimal;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use balanced_swap::{
    ClientError, EncodingError, PayloadError, Settings,
    format::{NumberFormat, format_big_number},
    icon_rpc::{ClientService, JsonRpcTransport, PayloadBuilder, PoolId, SwapRequest, TransactionService},
    types::CurrencyId,
    units::{parse_amount, to_base_units_for, to_display_units_for},
};

#[derive(Debug, Parser)]
#[command(name = "balanced", about = "Balanced exchange client for the ICON network")]
struct Cli {
    /// Overrides BALANCED_ACCOUNT
    #[arg(long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price of a pool's base token in its quote token
    Price {
        #[arg(long, default_value_t = PoolId::SICX_BNUSD.0)]
        pool: u32,
    },
    /// Token balance of an address
    Balance {
        currency: String,
        /// Defaults to the active account
        #[arg(long)]
        owner: Option<String>,
    },
    /// Display units to base units
    ToBase { amount: String, currency: Option<String> },
    /// Base units to display units
    ToDisplay { amount: String, currency: Option<String> },
    /// Builds an unsigned ICX transfer
    Transfer { to: String, value: String },
    /// Builds an unsigned exact-input swap
    Swap {
        from: String,
        to: String,
        amount: String,
        #[arg(long, default_value = "0")]
        minimum_receive: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = balanced_swap::tracing::init() {
        eprintln!("Error initializing tracing: {e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();

    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    settings.inject_account(cli.account);

    if let Err(e) = run(cli.command, &settings).await {
        error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, settings: &Settings) -> Result<(), ClientError> {
    let transport = Arc::new(JsonRpcTransport::new(settings.endpoint.clone()));

    match command {
        Command::Price { pool } => {
            let client_service = ClientService::new(transport, settings);
            let price = client_service.get_price(PoolId(pool)).await?;
            println!("{}", format_big_number(Some(&price), NumberFormat::Price));
        }
        Command::Balance { currency, owner } => {
            let owner = owner
                .or_else(|| settings.account.clone())
                .ok_or(PayloadError::MissingAccount)?;
            let currency = CurrencyId::new(currency);
            let client_service = ClientService::new(transport, settings);
            let balance = client_service.balance_of(&currency, &owner).await?;
            println!(
                "{} {currency}",
                format_big_number(Some(&balance), NumberFormat::Currency)
            );
        }
        Command::ToBase { amount, currency } => {
            let currency = currency.map(CurrencyId::new);
            let value = parse_amount(&amount)?;
            println!("{}", to_base_units_for(&value, currency.as_ref()));
        }
        Command::ToDisplay { amount, currency } => {
            let currency = currency.map(CurrencyId::new);
            let value = parse_amount(&amount)?;
            if !value.is_integer() {
                return Err(EncodingError::Fractional(value).into());
            }
            let (raw, _) = value.with_scale(0).into_bigint_and_exponent();
            println!("{}", to_display_units_for(&raw, currency.as_ref()));
        }
        Command::Transfer { to, value } => {
            let account = settings
                .account
                .clone()
                .ok_or(PayloadError::MissingAccount)?;
            let value: BigDecimal = parse_amount(&value)?;
            let payload = PayloadBuilder::new(settings.network)
                .with_step_limit(settings.step_limit)
                .with_account(account)
                .build_native_transfer_payload(&to, &value)?;
            print_json(&payload);
        }
        Command::Swap {
            from,
            to,
            amount,
            minimum_receive,
        } => {
            let transaction_service = TransactionService::new(transport, settings)?;
            let request = SwapRequest::new(
                CurrencyId::new(from),
                CurrencyId::new(to),
                amount,
                minimum_receive,
            );
            info!(?request, "Building swap");
            let payload = transaction_service.build_swap_payload(&request)?;
            print_json(&payload);
        }
    }

    Ok(())
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to serialize payload: {e}"),
    }
}
