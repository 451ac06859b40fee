use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::config_loader;

#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub service_name: String,
    pub environment: String,
    pub component: String,
}

impl ServiceContext {
    pub fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();

        let service_name = std::env::var("SERVICE_NAME")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        Self {
            service_name,
            environment: config_loader::get_stage().to_string(),
            component,
        }
    }
}

pub fn init_observability(component: &str) -> Result<()> {
    let service_context = ServiceContext::from_env(component);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Local time so `TZ` shows up as an offset in the timestamps.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()?;

    info!(
        service = %service_context.service_name,
        environment = %service_context.environment,
        component = %service_context.component,
        "observability: tracing initialized"
    );

    Ok(())
}
