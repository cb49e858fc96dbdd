//! Example consumer: reconcile a consumer and a JWT credential against a running Kong.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Reads `KONG_ADMIN_ADDR` (default `http://localhost:8001`), `KONG_TIMEOUT_SECS`, `KONG_USER_AGENT`.

use kong_reconcile::{HttpTransport, ProviderConfig, ResourceData, ResourceRegistry};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("kong_reconcile=info,example_consumer=info")),
        )
        .init();

    let config = ProviderConfig::from_env()?;
    let transport = HttpTransport::new(&config)?;
    tracing::info!("Admin API at {}", transport.base_url());

    let registry = ResourceRegistry::new();
    let consumers = registry.handler("kong_consumer")?;
    let jwts = registry.handler("kong_consumer_jwt_credential")?;

    let username = std::env::var("DEMO_USERNAME").unwrap_or_else(|_| "reconcile-demo".into());
    let desired_consumer = ResourceData::new().with("username", username.as_str());
    let plan = consumers.plan(None, Some(&desired_consumer));
    tracing::info!("plan:\n{}", plan.describe());
    let consumer = match consumers.apply(&transport, &plan).await {
        Ok(Some(state)) => state,
        Ok(None) => return Err("consumer plan produced no state".into()),
        Err(e) if e.is_conflict() => {
            tracing::warn!("{}; looking it up by username", e);
            consumers.import(&transport, &username).await?
        }
        Err(e) => return Err(e.into()),
    };

    let desired_jwt = ResourceData::new()
        .with("consumer", consumer.id())
        .with("algorithm", "HS256");
    let plan = jwts.plan(None, Some(&desired_jwt));
    tracing::info!("plan:\n{}", plan.describe());
    let jwt = jwts
        .apply(&transport, &plan)
        .await?
        .ok_or("jwt plan produced no state")?;
    let shown = jwts.schema().redact(jwt.fields());
    tracing::info!(
        "jwt key {} (secret {})",
        jwt.get_str("key"),
        shown.get("secret").and_then(|v| v.as_str()).unwrap_or("")
    );

    let refreshed = jwts.read(&transport, &jwt).await?;
    let plan = jwts.plan(Some(&refreshed), Some(&desired_jwt));
    tracing::info!("re-plan after refresh is a no-op: {}", plan.is_noop());

    let imported = jwts
        .import(&transport, &format!("{}/{}", consumer.id(), jwt.id()))
        .await?;
    tracing::info!("imported {} matches created state: {}", imported.id(), imported == refreshed);

    let plan = jwts.plan(Some(&refreshed), None);
    tracing::info!("plan:\n{}", plan.describe());
    jwts.apply(&transport, &plan).await?;
    consumers.delete(&transport, &consumer).await?;
    tracing::info!("cleaned up consumer {}", consumer.id());
    Ok(())
}
