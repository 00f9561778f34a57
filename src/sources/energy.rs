//! Wallbox energy counter source

use super::http::{VendorEndpoint, render_template};
use crate::config::{ChargerConfig, ChargerProvider, HttpConfig};
use crate::error::Result;

/// Source of the charger's cumulative energy counter (kWh)
#[async_trait::async_trait]
pub trait EnergySource: Send + Sync {
    /// Read the counter as it is right now
    async fn read_total_energy(&self) -> Result<f64>;
}

impl ChargerProvider {
    /// Location of the energy counter in the provider's payload
    pub fn default_pointer(&self) -> Option<&'static str> {
        match self {
            Self::Viessmann => Some("/properties/totalEnergy/value"),
            Self::Easee => Some("/totalKwh"),
            Self::Custom => None,
        }
    }
}

/// Energy source backed by a vendor HTTP API
#[derive(Clone)]
pub struct HttpEnergySource {
    endpoint: VendorEndpoint,
}

impl HttpEnergySource {
    /// Build from the charger section of the configuration
    pub fn from_config(charger: &ChargerConfig, http: &HttpConfig) -> Result<Self> {
        let url = render_template(
            &charger.endpoint,
            &[
                ("installation_id", charger.installation_id.as_str()),
                ("gateway_id", charger.gateway_id.as_str()),
                ("device_id", charger.device_id.as_str()),
                ("site_id", charger.site_id.as_str()),
                ("charger_id", charger.charger_id.as_str()),
            ],
        )?;
        let pointer = resolve_pointer(charger.value_pointer.as_deref(), charger.provider)?;
        let endpoint = VendorEndpoint::new("energy", http, url, &charger.auth_token, pointer)?;
        Ok(Self { endpoint })
    }

    /// Resolved request URL
    pub fn url(&self) -> &str {
        self.endpoint.url()
    }
}

fn resolve_pointer(explicit: Option<&str>, provider: ChargerProvider) -> Result<String> {
    explicit
        .or_else(|| provider.default_pointer())
        .map(str::to_string)
        .ok_or_else(|| {
            crate::error::ChargelogError::validation(
                "charger.value_pointer",
                "Required for the custom provider",
            )
        })
}

#[async_trait::async_trait]
impl EnergySource for HttpEnergySource {
    async fn read_total_energy(&self) -> Result<f64> {
        self.endpoint.fetch_number().await
    }
}
