//! Rent charges: turns a rental contract into a PIX request.

use crate::config::MerchantDefaults;
use crate::payload::PixRequest;
use crate::payload::constants::MAX_TXID_LEN;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis()
}

/// Placeholder key for contracts whose owner has not registered one
pub fn simulated_pix_key(contract_id: u64) -> String {
    format!("pix:{contract_id}@quartinho-pix.simulado")
}

/// Fresh transaction id `c<contract>-<unix millis>`, at most 25 chars
pub fn generate_txid(contract_id: u64) -> String {
    format!("c{contract_id}-{}", now_millis())
        .chars()
        .take(MAX_TXID_LEN)
        .collect()
}

/// What the payment screen knows about the first rent of a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentCharge {
    pub contract_id: u64,
    #[serde(default)]
    pub owner_full_name: Option<String>,
    #[serde(default)]
    pub owner_username: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Monthly price as stored, e.g. "1500.00"
    #[serde(default)]
    pub price: Option<String>,
    /// Owner's key; a simulated one is used when absent
    #[serde(default)]
    pub pix_key: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl RentCharge {
    pub fn merchant_name<'a>(&'a self, defaults: &'a MerchantDefaults) -> &'a str {
        non_empty(&self.owner_full_name)
            .or_else(|| non_empty(&self.owner_username))
            .unwrap_or(defaults.merchant_name.as_str())
    }

    pub fn merchant_city<'a>(&'a self, defaults: &'a MerchantDefaults) -> &'a str {
        non_empty(&self.city).unwrap_or(defaults.merchant_city.as_str())
    }

    /// Build a request with a freshly generated txid
    pub fn to_request(&self, defaults: &MerchantDefaults) -> PixRequest {
        let pix_key = non_empty(&self.pix_key)
            .map(str::to_string)
            .unwrap_or_else(|| simulated_pix_key(self.contract_id));

        let mut request = PixRequest::new(
            pix_key,
            self.merchant_name(defaults),
            self.merchant_city(defaults),
        )
        .with_txid(generate_txid(self.contract_id));

        if let Some(price) = &self.price {
            request = request.with_amount(price.as_str());
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_key() {
        assert_eq!(simulated_pix_key(42), "pix:42@quartinho-pix.simulado");
    }

    #[test]
    fn test_txid_shape() {
        let txid = generate_txid(42);
        assert!(txid.starts_with("c42-"));
        assert!(txid[4..].chars().all(|c| c.is_ascii_digit()));
        assert!(txid.len() <= MAX_TXID_LEN);
    }

    #[test]
    fn test_txid_capped_for_large_ids() {
        let txid = generate_txid(u64::MAX);
        assert_eq!(txid.len(), MAX_TXID_LEN);
    }

    #[test]
    fn test_merchant_fallbacks() {
        let defaults = MerchantDefaults::default();
        let mut charge = RentCharge {
            contract_id: 7,
            owner_username: Some("mariasouza".to_string()),
            ..Default::default()
        };
        assert_eq!(charge.merchant_name(&defaults), "mariasouza");
        assert_eq!(charge.merchant_city(&defaults), "CIDADE");

        charge.owner_full_name = Some("Maria Souza".to_string());
        charge.city = Some("Recife".to_string());
        assert_eq!(charge.merchant_name(&defaults), "Maria Souza");
        assert_eq!(charge.merchant_city(&defaults), "Recife");

        charge.owner_full_name = Some(String::new());
        charge.owner_username = None;
        assert_eq!(charge.merchant_name(&defaults), "QUARTINHO");
    }
}
