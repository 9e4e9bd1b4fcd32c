use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::sync::Arc;
use x402_payer_reqwest::{ResourceRequest, X402Payer};
use x402_payer_wallet::Wallet;

/// Fetches one URL, paying for it if the server asks.
///
/// Environment:
/// - `EVM_PRIVATE_KEY` - hex private key of the paying wallet (required)
/// - `X402_NETWORK` - network identifier (default: `base-sepolia`)
/// - `X402_BUDGET_USD` - budget ceiling in USD (default: `1.00`)
/// - `X402_MAX_PRICE_USD` - optional per-call price ceiling
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let private_key = env::var("EVM_PRIVATE_KEY")?;
    let network = env::var("X402_NETWORK").unwrap_or_else(|_| "base-sepolia".to_string());
    let budget: Decimal = env::var("X402_BUDGET_USD")
        .unwrap_or_else(|_| "1.00".to_string())
        .parse()?;
    let max_price: Option<Decimal> = env::var("X402_MAX_PRICE_USD")
        .ok()
        .map(|raw| raw.parse())
        .transpose()?;
    let url = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:3000/protected-route".to_string());

    let wallet = Arc::new(Wallet::from_private_key(&private_key, &network, budget)?);
    println!("Paying from {} on {}", wallet.address(), wallet.network());

    let payer = X402Payer::new(Arc::clone(&wallet));
    let outcome = payer
        .request(ResourceRequest::get(url.parse()?), max_price)
        .await?;
    println!("{outcome}");

    let summary = wallet.summary();
    println!(
        "Spent ${:.4} of ${:.4} across {} payment(s)",
        summary.spent_usd, summary.budget_usd, summary.payment_count
    );

    Ok(())
}
