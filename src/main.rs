//! Demo: derives the children of a small parent app and prints them as JSON.
//!
//! Reads `APPNEST_CONFIG` (a TOML file) when set, otherwise starts from defaults plus
//! environment overrides.

use appnest::config::EngineConfig;
use appnest::labels::{ACORN_PUBLIC_NAME, DESTROY_JOB_FINALIZER};
use appnest::lifecycle::{setup_tracing, AppSystem};
use appnest::model::{Acorn, AppInstance, DevSessionInstance, NameValue, SecretBinding, Service};
use appnest_store::KindClient;
use std::error::Error;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::var("APPNEST_CONFIG") {
        Ok(path) => EngineConfig::load(path)?,
        Err(_) => EngineConfig::from_env()?,
    };
    setup_tracing(&config.logging);

    info!("Starting derivation demo");
    let system = AppSystem::new(config);
    let parent = demo_parent();

    // The service child "db" is being worked on in a dev session and its previous
    // instance is still running destroy jobs.
    system
        .dev_sessions
        .put(DevSessionInstance::new("acorn", "web-db"))
        .await?;
    let mut previous = AppInstance::new("acorn", "web-db");
    previous
        .metadata
        .finalizers
        .push(DESTROY_JOB_FINALIZER.to_string());
    system.app_instances.put(previous).await?;

    let span = tracing::info_span!("reconcile", app = %parent.name());
    let result = async { system.derive(&parent).await }
        .instrument(span)
        .await;

    match result {
        Ok(derivation) => println!("{}", serde_json::to_string_pretty(&derivation)?),
        Err(e) => error!(error = %e, terminal = e.is_terminal(), "Derivation failed"),
    }

    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}

fn demo_parent() -> AppInstance {
    let mut parent = AppInstance::new("acorn", "web");
    parent.metadata.generation = 3;
    parent
        .metadata
        .labels
        .insert(ACORN_PUBLIC_NAME.to_string(), "web".to_string());
    parent.status.app_image.name = "ghcr.io/acme/web:v1".to_string();

    parent.spec.environment = vec![
        NameValue::new("LOG_LEVEL", "info"),
        NameValue::new("worker.QUEUE", "jobs"),
    ];
    parent.spec.secrets = vec![SecretBinding {
        secret: "prod-db-creds".to_string(),
        target: "worker.db".to_string(),
    }];
    parent
        .spec
        .compute_classes
        .insert(String::new(), "standard".to_string());
    parent
        .spec
        .compute_classes
        .insert("worker".to_string(), "large".to_string());

    parent.status.app_spec.acorns.insert(
        "worker".to_string(),
        Acorn {
            image: "ghcr.io/acme/worker:v1.#".to_string(),
            secrets: vec![SecretBinding {
                secret: "worker-db".to_string(),
                target: "db".to_string(),
            }],
            ..Default::default()
        },
    );
    parent.status.app_spec.services.insert(
        "db".to_string(),
        Service {
            image: "postgres:16".to_string(),
            environment: vec![NameValue::new("PGDATA", "/data")],
            ..Default::default()
        },
    );
    parent
}
