use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Redis,
    Memory,
}

impl StoreKind {
    fn parse(value: Option<&str>) -> anyhow::Result<Self> {
        match value {
            None | Some("redis") => Ok(StoreKind::Redis),
            Some("memory") => Ok(StoreKind::Memory),
            Some(other) => anyhow::bail!("unknown TODO_STORE '{other}', expected redis or memory"),
        }
    }
}

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub redis_url: String,
    pub store: StoreKind,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
            store: StoreKind::parse(env::var("TODO_STORE").ok().as_deref())?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
        })
    }
}
