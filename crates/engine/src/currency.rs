use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO-like currency code attached to a donation.
///
/// The ledger does not convert between currencies: amounts are summed as
/// plain magnitudes. The code is kept so that consumers can label values.
///
/// Codes are normalized to three upper-case ASCII letters (`"usd"` becomes
/// `"USD"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    pub const DEFAULT_CODE: &'static str = "USD";

    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(Self::DEFAULT_CODE.to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(EngineError::InvalidCurrency(format!(
                "unsupported currency: {value}"
            )));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}
