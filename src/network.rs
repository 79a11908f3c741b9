//! Network constants for the coinfeed SDK.

/// Default REST API base URL (CoinGecko public API v3).
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Request header carrying the static API credential.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";
