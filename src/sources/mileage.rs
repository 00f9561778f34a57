//! Vehicle odometer source

use super::http::{VendorEndpoint, render_template};
use crate::config::{HttpConfig, VehicleConfig, VehicleProvider};
use crate::error::{ChargelogError, Result};

/// Source of the vehicle's current odometer reading (km)
#[async_trait::async_trait]
pub trait MileageSource: Send + Sync {
    async fn read_odometer(&self) -> Result<f64>;
}

impl VehicleProvider {
    /// Location of the odometer in the provider's payload
    pub fn default_pointer(&self) -> Option<&'static str> {
        match self {
            Self::Bmw => Some("/mileage"),
            Self::Mercedes => Some("/odometer"),
            Self::Custom => None,
        }
    }
}

/// Odometer source backed by a telematics HTTP API
#[derive(Clone)]
pub struct HttpMileageSource {
    endpoint: VendorEndpoint,
}

impl HttpMileageSource {
    pub fn from_config(vehicle: &VehicleConfig, http: &HttpConfig) -> Result<Self> {
        let url = render_template(
            &vehicle.endpoint,
            &[("vehicle_id", vehicle.vehicle_id.as_str())],
        )?;
        let pointer = vehicle
            .value_pointer
            .as_deref()
            .or_else(|| vehicle.provider.default_pointer())
            .map(str::to_string)
            .ok_or_else(|| {
                ChargelogError::validation(
                    "vehicle.value_pointer",
                    "Required for the custom provider",
                )
            })?;
        let endpoint = VendorEndpoint::new("mileage", http, url, &vehicle.auth_token, pointer)?;
        Ok(Self { endpoint })
    }

    pub fn url(&self) -> &str {
        self.endpoint.url()
    }
}

#[async_trait::async_trait]
impl MileageSource for HttpMileageSource {
    async fn read_odometer(&self) -> Result<f64> {
        self.endpoint.fetch_number().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmw_defaults() {
        let vehicle = VehicleConfig {
            vehicle_id: "WBA123".to_string(),
            ..VehicleConfig::default()
        };
        let src = HttpMileageSource::from_config(&vehicle, &HttpConfig::default()).unwrap();
        assert_eq!(
            src.url(),
            "https://b2vapi.bmwgroup.com/webapi/v1/user/vehicles/WBA123/status"
        );
        assert_eq!(src.endpoint.value_pointer(), "/mileage");
    }

    #[test]
    fn mercedes_uses_odometer_field() {
        let vehicle = VehicleConfig {
            provider: VehicleProvider::Mercedes,
            endpoint: "https://api.mercedes-benz.com/vehicledata/v2/vehicles/{vehicle_id}/odometer"
                .to_string(),
            vehicle_id: "W1K".to_string(),
            ..VehicleConfig::default()
        };
        let src = HttpMileageSource::from_config(&vehicle, &HttpConfig::default()).unwrap();
        assert!(src.url().ends_with("/vehicles/W1K/odometer"));
        assert_eq!(src.endpoint.value_pointer(), "/odometer");
    }
}
