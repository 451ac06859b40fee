use anyhow::{Context, Result};

use crate::config::{
    config_model::{AuthSecret, Database, DotEnvyConfig, Server},
    stage::Stage,
};

const DEFAULT_STAFF_ROLE: &str = "staff";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .context("SERVER_BODY_LIMIT is invalid")?
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .context("SERVER_TIMEOUT is invalid")?
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
    };

    Ok(DotEnvyConfig { server, database })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        secret: std::env::var("JWT_SECRET").context("JWT_SECRET is invalid")?,
        staff_role: std::env::var("JWT_STAFF_ROLE")
            .ok()
            .filter(|role| !role.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STAFF_ROLE.to_string()),
    })
}
