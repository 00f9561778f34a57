use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use chargelog::config::{
    ChargerConfig, ChargerProvider, HttpConfig, VehicleConfig, VehicleProvider,
};
use chargelog::error::ChargelogError;
use chargelog::sources::{EnergySource, HttpEnergySource, HttpMileageSource, MileageSource};
use serde_json::json;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http() -> HttpConfig {
    HttpConfig {
        timeout_seconds: 5,
        ..HttpConfig::default()
    }
}

async fn viessmann_feature(Path((inst, gw, dev)): Path<(String, String, String)>) -> Response {
    if (inst.as_str(), gw.as_str(), dev.as_str()) != ("1234", "7571", "0") {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "feature": "electricity.charging",
        "properties": {"totalEnergy": {"type": "number", "value": 1532.7, "unit": "kilowattHour"}}
    }))
    .into_response()
}

async fn bmw_status(headers: HeaderMap) -> Response {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth != Some("Bearer secret-token") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({"vin": "WBA000", "mileage": 15234})).into_response()
}

fn viessmann(base: &str) -> ChargerConfig {
    ChargerConfig {
        provider: ChargerProvider::Viessmann,
        endpoint: format!(
            "{}/installations/{{installation_id}}/gateways/{{gateway_id}}/devices/{{device_id}}/features/electricity/charging",
            base
        ),
        installation_id: "1234".to_string(),
        gateway_id: "7571".to_string(),
        device_id: "0".to_string(),
        ..ChargerConfig::default()
    }
}

fn bmw(base: &str, token: &str) -> VehicleConfig {
    VehicleConfig {
        provider: VehicleProvider::Bmw,
        endpoint: format!("{}/vehicles/{{vehicle_id}}/status", base),
        auth_token: token.to_string(),
        vehicle_id: "WBA000".to_string(),
        value_pointer: None,
    }
}

#[tokio::test]
async fn viessmann_energy_is_read_from_nested_property() {
    let app = Router::new().route(
        "/installations/{inst}/gateways/{gw}/devices/{dev}/features/electricity/charging",
        get(viessmann_feature),
    );
    let base = serve(app).await;

    let source = HttpEnergySource::from_config(&viessmann(&base), &http()).unwrap();
    assert!(
        source
            .url()
            .ends_with("/installations/1234/gateways/7571/devices/0/features/electricity/charging")
    );
    assert_eq!(source.read_total_energy().await.unwrap(), 1532.7);
}

#[tokio::test]
async fn easee_energy_accepts_top_level_field() {
    let app = Router::new().route(
        "/chargers/{id}/state",
        get(|| async { Json(json!({"chargerOpMode": 3, "totalKwh": "88.25"})) }),
    );
    let base = serve(app).await;

    let charger = ChargerConfig {
        provider: ChargerProvider::Easee,
        endpoint: format!("{}/chargers/{{charger_id}}/state", base),
        charger_id: "EH123456".to_string(),
        ..ChargerConfig::default()
    };
    let source = HttpEnergySource::from_config(&charger, &http()).unwrap();
    assert_eq!(source.read_total_energy().await.unwrap(), 88.25);
}

#[tokio::test]
async fn mileage_sends_bearer_token() {
    let app = Router::new().route("/vehicles/{vin}/status", get(bmw_status));
    let base = serve(app).await;

    let ok = HttpMileageSource::from_config(&bmw(&base, "secret-token"), &http()).unwrap();
    assert_eq!(ok.read_odometer().await.unwrap(), 15234.0);

    let denied = HttpMileageSource::from_config(&bmw(&base, "wrong"), &http()).unwrap();
    let err = denied.read_odometer().await.unwrap_err();
    assert!(matches!(err, ChargelogError::Fetch { .. }));
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn server_error_is_a_fetch_failure() {
    let app = Router::new().route(
        "/vehicles/{vin}/status",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = serve(app).await;

    let source = HttpMileageSource::from_config(&bmw(&base, "t"), &http()).unwrap();
    let err = source.read_odometer().await.unwrap_err();
    assert!(matches!(err, ChargelogError::Fetch { .. }));
    assert!(!err.is_persistence_failure());
}

#[tokio::test]
async fn missing_field_is_a_fetch_failure() {
    let app = Router::new().route(
        "/vehicles/{vin}/status",
        get(|| async { Json(json!({"vin": "WBA000"})) }),
    );
    let base = serve(app).await;

    let source = HttpMileageSource::from_config(&bmw(&base, "t"), &http()).unwrap();
    let err = source.read_odometer().await.unwrap_err();
    assert!(err.to_string().contains("/mileage"));
}

#[tokio::test]
async fn non_json_body_is_a_fetch_failure() {
    let app = Router::new().route(
        "/vehicles/{vin}/status",
        get(|| async { "<html>login</html>" }),
    );
    let base = serve(app).await;

    let source = HttpMileageSource::from_config(&bmw(&base, "t"), &http()).unwrap();
    assert!(matches!(
        source.read_odometer().await,
        Err(ChargelogError::Fetch { .. })
    ));
}

#[tokio::test]
async fn refused_connection_is_a_fetch_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let charger = ChargerConfig {
        provider: ChargerProvider::Custom,
        endpoint: format!("http://{}/energy", addr),
        value_pointer: Some("/kwh".to_string()),
        ..ChargerConfig::default()
    };
    let source = HttpEnergySource::from_config(&charger, &http()).unwrap();
    assert!(matches!(
        source.read_total_energy().await,
        Err(ChargelogError::Fetch { .. })
    ));
}

#[test]
fn unresolved_placeholder_is_rejected_at_setup() {
    let vehicle = VehicleConfig {
        endpoint: "https://example.invalid/{vin}/status".to_string(),
        ..VehicleConfig::default()
    };
    assert!(HttpMileageSource::from_config(&vehicle, &http()).is_err());
}
