use serde_json::{json, Value};
use tracing::debug;
use zkv_sui_types::{ObjectRef, SuiAddress};

use crate::{
    parse_gas_price, Coin, CoinPage, NetworkError, RetryableRpc, RpcTransport, SuiClient,
    METHOD_GET_COINS, METHOD_GET_REFERENCE_GAS_PRICE,
};

/// The coin type used to pay for gas.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// The maximum number of coins that may pay for a single transaction.
pub const MAX_GAS_OBJECTS: usize = 256;

const COINS_PAGE_LIMIT: u64 = 50;
const MAX_COIN_PAGES: usize = 20;

/// Fetches the reference gas price of the current epoch.
pub async fn fetch_reference_gas_price<T: RpcTransport>(
    client: &SuiClient<T>,
) -> Result<u64, NetworkError> {
    let value = client
        .with_retry(
            || async move {
                client.transport().request(METHOD_GET_REFERENCE_GAS_PRICE, json!([])).await
            },
            "fetching reference gas price",
        )
        .await?;
    parse_gas_price(value)
}

/// Fetches the SUI coins owned by `owner`, following pagination.
pub async fn fetch_gas_coins<T: RpcTransport>(
    client: &SuiClient<T>,
    owner: SuiAddress,
) -> Result<Vec<Coin>, NetworkError> {
    let mut coins = Vec::new();
    let mut cursor: Option<String> = None;

    for _ in 0..MAX_COIN_PAGES {
        let params = json!([owner.to_string(), SUI_COIN_TYPE, cursor, COINS_PAGE_LIMIT]);
        let value: Value = client
            .with_retry(
                || {
                    let params = params.clone();
                    async move { client.transport().request(METHOD_GET_COINS, params).await }
                },
                "fetching gas coins",
            )
            .await?;
        let page: CoinPage = serde_json::from_value(value)
            .map_err(|e| NetworkError::invalid_response(METHOD_GET_COINS, e))?;
        debug!(count = page.data.len(), has_next_page = page.has_next_page, "fetched coin page");

        coins.extend(page.data);
        match page.next_cursor {
            Some(next) if page.has_next_page => cursor = Some(next),
            _ => break,
        }
    }

    Ok(coins)
}

/// Picks gas coins covering `budget`, largest balances first.
///
/// Fails with [`NetworkError::InsufficientGas`] if the coins, capped at [`MAX_GAS_OBJECTS`], do
/// not add up to the budget.
pub fn select_gas_coins(coins: &[Coin], budget: u64) -> Result<Vec<ObjectRef>, NetworkError> {
    let mut sorted: Vec<&Coin> = coins.iter().collect();
    sorted.sort_by(|a, b| b.balance.cmp(&a.balance));

    let mut selected = Vec::new();
    let mut total: u128 = 0;
    for coin in sorted.into_iter().take(MAX_GAS_OBJECTS) {
        if total >= u128::from(budget) {
            break;
        }
        total += u128::from(coin.balance);
        selected.push(coin.object_ref());
    }

    if total < u128::from(budget) || selected.is_empty() {
        return Err(NetworkError::InsufficientGas { available: total, budget });
    }
    Ok(selected)
}
