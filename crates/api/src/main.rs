//! FireGuard Pipeline - Main Entry Point

use std::collections::HashMap;
use std::sync::Arc;

use api::pipeline::{run_camera_loop, run_sensor_loop, StaticFrameDevice};
use api::settings::Settings;
use api::{create_router, init_logging, AppState};

use alerting::AlertingSettings;
use broadcast::Hub;
use capture::{PollConfig, PolledCamera, SensorListener};
use detection::FixedClassifier;
use notify::{ConsoleTransport, Notifier, RetryPolicy};
use tokio::sync::watch;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== FireGuard Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;
    let alerting_settings = AlertingSettings::load()?;
    let gate = alerting_settings.build_gate();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (ingest, listener) = SensorListener::channel(64, shutdown_rx.clone());
    let hub = Hub::new();

    // Real SMTP/carrier transports plug in here behind the Transport trait;
    // the console transport logs deliveries instead.
    let mut notifiers = HashMap::new();
    for (name, kind) in [("email", "email"), ("sms", "sms")] {
        notifiers.insert(
            name.to_string(),
            Arc::new(Notifier::new(
                name,
                Arc::new(ConsoleTransport::new(kind)),
                RetryPolicy::default(),
            )),
        );
    }

    let state = Arc::new(AppState {
        gate,
        hub,
        notifiers,
        ingest,
        location: settings.pipeline.location.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        start_time: std::time::Instant::now(),
        shutdown: shutdown_tx,
    });

    // One background task per reading source, started exactly once here;
    // the handles are joined after the server drains.
    let sensor_task = tokio::spawn(run_sensor_loop(
        Arc::clone(&state),
        settings.sensor.clone(),
        listener,
    ));

    let camera_task = if settings.pipeline.camera_enabled {
        let camera = PolledCamera::new(
            StaticFrameDevice::default(),
            &PollConfig {
                interval: settings.pipeline.poll_interval(),
                location: settings.pipeline.location.clone(),
            },
            shutdown_rx,
        );
        Some(tokio::spawn(run_camera_loop(
            Arc::clone(&state),
            Arc::new(FixedClassifier::neutral()),
            camera,
        )))
    } else {
        None
    };

    let app = create_router(Arc::clone(&state));
    let listener = tokio::net::TcpListener::bind(&settings.server.bind_addr).await?;
    info!("Starting API server on {}", settings.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&state)))
        .await?;

    // Server drained; make sure the sources have stopped too.
    let _ = state.shutdown.send(true);
    sensor_task.await?;
    if let Some(task) = camera_task {
        task.await?;
    }

    Ok(())
}

async fn shutdown_signal(state: Arc<AppState>) {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested, stopping sources");
        let _ = state.shutdown.send(true);
    }
}
