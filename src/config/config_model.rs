#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// Shared secret used to verify bearer tokens issued by the identity provider.
#[derive(Debug, Clone)]
pub struct AuthSecret {
    pub secret: String,
    pub staff_role: String,
}
