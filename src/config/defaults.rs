use super::*;

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: format!("chargelog/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            provider: ChargerProvider::Viessmann,
            endpoint: "https://api.viessmann.com/iot/v1/equipment/installations/{installation_id}/gateways/{gateway_id}/devices/{device_id}/features/electricity/charging".to_string(),
            auth_token: String::new(),
            installation_id: String::new(),
            gateway_id: String::new(),
            device_id: String::new(),
            site_id: String::new(),
            charger_id: String::new(),
            value_pointer: None,
        }
    }
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            provider: VehicleProvider::Bmw,
            endpoint: "https://b2vapi.bmwgroup.com/webapi/v1/user/vehicles/{vehicle_id}/status"
                .to_string(),
            auth_token: String::new(),
            vehicle_id: String::new(),
            value_pointer: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "charging_log.db".to_string(),
            export_mode: ExportMode::Full,
            export_path: "/tmp/charging_log.csv".to_string(),
            export_dir: "/tmp".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: "/tmp/chargelog.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: RunMode::Monitor,
            poll_interval_seconds: 60,
            http: HttpConfig::default(),
            charger: ChargerConfig::default(),
            vehicle: VehicleConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
