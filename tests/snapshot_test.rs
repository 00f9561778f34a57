use axum::Router;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use chargelog::config::{
    ChargerConfig, ChargerProvider, HttpConfig, StorageConfig, VehicleConfig, VehicleProvider,
};
use chargelog::recorder::SqliteRecorder;
use chargelog::snapshot::{SnapshotOutcome, run_snapshot};
use chargelog::sources::{HttpEnergySource, HttpMileageSource};
use chargelog::storage::Store;
use serde_json::json;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn sources(base: &str) -> (HttpEnergySource, HttpMileageSource) {
    let http = HttpConfig::default();
    let charger = ChargerConfig {
        provider: ChargerProvider::Easee,
        endpoint: format!("{}/chargers/{{charger_id}}/state", base),
        charger_id: "EH1".to_string(),
        auth_token: "easee-token".to_string(),
        ..ChargerConfig::default()
    };
    let vehicle = VehicleConfig {
        provider: VehicleProvider::Mercedes,
        endpoint: format!("{}/vehicles/{{vehicle_id}}", base),
        vehicle_id: "WDD1".to_string(),
        auth_token: "mb-token".to_string(),
        value_pointer: None,
    };
    (
        HttpEnergySource::from_config(&charger, &http).unwrap(),
        HttpMileageSource::from_config(&vehicle, &http).unwrap(),
    )
}

fn storage(dir: &std::path::Path) -> StorageConfig {
    StorageConfig {
        database_path: dir.join("data.db").to_string_lossy().to_string(),
        export_dir: dir.to_string_lossy().to_string(),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn snapshot_stores_reading_and_daily_row() {
    let app = Router::new()
        .route(
            "/chargers/{id}/state",
            get(|| async { Json(json!({"totalKwh": 412.5})) }),
        )
        .route(
            "/vehicles/{vin}",
            get(|| async { Json(json!({"odometer": 20500})) }),
        );
    let base = serve(app).await;
    let (energy, mileage) = sources(&base);

    let dir = tempfile::tempdir().unwrap();
    let cfg = storage(dir.path());
    let recorder = SqliteRecorder::from_config(&cfg);

    let outcome = run_snapshot(&energy, &mileage, &recorder).await.unwrap();
    let SnapshotOutcome::Recorded(reading) = outcome else {
        panic!("snapshot should have been stored");
    };
    assert_eq!(reading.km_status, 20500.0);
    assert_eq!(reading.kwh_usage, 412.5);

    let store = Store::open(&cfg.database_path).unwrap();
    assert_eq!(store.readings().unwrap(), vec![reading.clone()]);

    let daily = dir
        .path()
        .join(format!("charging_data_{}.csv", reading.date));
    let content = std::fs::read_to_string(daily).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Date,KM Status,kWh Usage");
    assert!(lines[1].ends_with(",20500,412.5"));
}

#[tokio::test]
async fn snapshot_with_failed_vehicle_read_stores_nothing() {
    let app = Router::new()
        .route(
            "/chargers/{id}/state",
            get(|| async { Json(json!({"totalKwh": 1.0})) }),
        )
        .route("/vehicles/{vin}", get(|| async { StatusCode::FORBIDDEN }));
    let base = serve(app).await;
    let (energy, mileage) = sources(&base);

    let dir = tempfile::tempdir().unwrap();
    let cfg = storage(dir.path());
    let recorder = SqliteRecorder::from_config(&cfg);

    let outcome = run_snapshot(&energy, &mileage, &recorder).await.unwrap();
    assert_eq!(
        outcome,
        SnapshotOutcome::Incomplete {
            odometer: None,
            energy: Some(1.0)
        }
    );
    assert!(!std::path::Path::new(&cfg.database_path).exists());
}
