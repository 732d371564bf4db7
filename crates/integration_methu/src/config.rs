//! met.hu client configuration

use serde::{Deserialize, Serialize};

/// Settings for the met.hu client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetHuConfig {
    /// Autocomplete endpoint queried with `?term=<name>`
    #[serde(default = "default_autocomplete_url")]
    pub autocomplete_url: String,

    /// Forecast endpoint receiving the form submission
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Request timeout for the forecast fetch in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Request timeout for the autocomplete lookup in seconds (default: 15)
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,

    /// Value sent in the `tel` form field; the settlement name when unset
    #[serde(default)]
    pub client_identifier: Option<String>,

    /// IANA time zone the forecast table is expressed in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// User agent presented to the provider
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Public site root, used for the `Origin` and `Referer` headers
pub const SITE_ROOT: &str = "https://www.met.hu";

const FORECAST_PAGE: &str = "https://www.met.hu/idojaras/elorejelzes/magyarorszagi_telepulesek/";

fn default_autocomplete_url() -> String {
    "https://www.met.hu/jquery/search.php".to_string()
}

fn default_forecast_url() -> String {
    format!("{FORECAST_PAGE}main.php")
}

const fn default_timeout() -> u64 {
    30
}

const fn default_lookup_timeout() -> u64 {
    15
}

fn default_timezone() -> String {
    "Europe/Budapest".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

impl MetHuConfig {
    /// Referer header value expected by the forecast endpoint
    #[must_use]
    pub const fn referer() -> &'static str {
        FORECAST_PAGE
    }
}

impl Default for MetHuConfig {
    fn default() -> Self {
        Self {
            autocomplete_url: default_autocomplete_url(),
            forecast_url: default_forecast_url(),
            timeout_secs: default_timeout(),
            lookup_timeout_secs: default_lookup_timeout(),
            client_identifier: None,
            timezone: default_timezone(),
            user_agent: default_user_agent(),
        }
    }
}
