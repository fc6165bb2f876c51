use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
    PgPool,
};

use crate::config::DatabaseConfig;

pub fn connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.name)
        .ssl_mode(PgSslMode::Disable)
}

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .connect_with(connect_options(cfg))
        .await
        .with_context(|| format!("connect to database {} at {}:{}", cfg.name, cfg.host, cfg.port))?;
    Ok(pool)
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_options_carry_config() {
        let cfg = DatabaseConfig {
            host: "db.local".into(),
            port: 6543,
            user: "svc".into(),
            password: "p@ss#word".into(),
            name: "users".into(),
            max_connections: 4,
        };
        let opts = connect_options(&cfg);
        assert_eq!(opts.get_host(), "db.local");
        assert_eq!(opts.get_port(), 6543);
        assert_eq!(opts.get_username(), "svc");
    }
}
