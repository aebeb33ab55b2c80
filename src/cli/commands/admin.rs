//! Admin account command handler

use dialoguer::{Input, Password};

use crate::config::Config;
use crate::db::{OwnerWrite, Store};

/// Display name given to an owner created by this command.
const DEFAULT_ADMIN_NAME: &str = "Admin";

fn prompt_username() -> anyhow::Result<String> {
    Ok(Input::<String>::new()
        .with_prompt("Username")
        .interact_text()?)
}

/// Reads the password without echo and asks for it twice.
fn prompt_password() -> anyhow::Result<String> {
    Ok(Password::new()
        .with_prompt("Password")
        .with_confirmation(
            "Repeat for confirmation",
            "Error: The two entered values do not match.",
        )
        .interact()?)
}

pub async fn cmd_admin(
    config: &Config,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = match username {
        Some(u) => u,
        None => prompt_username()?,
    };
    let password = match password {
        Some(p) => p,
        None => prompt_password()?,
    };

    if username.is_empty() || password.is_empty() {
        anyhow::bail!("Username and password cannot be empty");
    }

    let store = Store::new(&config.general.database_path).await?;

    if store.get_owner().await?.is_some() {
        println!("Updating user...");
    } else {
        println!("Creating user...");
    }

    let outcome = store
        .upsert_owner_credentials(&username, &password, DEFAULT_ADMIN_NAME, &config.security)
        .await?;

    match outcome {
        OwnerWrite::Created => tracing::info!("Created admin account: {username}"),
        OwnerWrite::Updated => tracing::info!("Updated admin account: {username}"),
    }

    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SecurityConfig;
    use crate::services::{AuthService, SeaOrmAuthService};

    fn temp_config() -> Config {
        let db_path = std::env::temp_dir()
            .join(format!("watchlist-admin-test-{}.db", uuid::Uuid::new_v4()));

        let mut config = Config::default();
        config.general.database_path = format!("sqlite:{}", db_path.display());
        config.security = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        };
        config
    }

    #[tokio::test]
    async fn test_admin_with_flags_skips_prompts() {
        let config = temp_config();

        cmd_admin(&config, Some("admin".into()), Some("secret".into()))
            .await
            .unwrap();
        cmd_admin(&config, Some("admin".into()), Some("changed".into()))
            .await
            .unwrap();

        let store = Store::new(&config.general.database_path).await.unwrap();
        assert_eq!(store.count_users().await.unwrap(), 1);

        let (owner, hash) = store.get_owner_with_password().await.unwrap().unwrap();
        assert_eq!(owner.name, DEFAULT_ADMIN_NAME);
        assert!(!hash.unwrap().contains("changed"));

        let auth = SeaOrmAuthService::new(store, config.security.clone());
        assert!(auth.verify("admin", "changed").await.unwrap());
        assert!(!auth.verify("admin", "secret").await.unwrap());
    }

    #[tokio::test]
    async fn test_admin_rejects_empty_credentials() {
        let config = temp_config();

        let result = cmd_admin(&config, Some(String::new()), Some("secret".into())).await;
        assert!(result.is_err());

        let result = cmd_admin(&config, Some("admin".into()), Some(String::new())).await;
        assert!(result.is_err());
    }
}
