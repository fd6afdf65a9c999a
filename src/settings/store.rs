use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::Database;

#[derive(Debug, Clone)]
pub struct UserSettings {
    pub user_id: String,
    pub rebrandly_api_key: Option<String>,
    pub custom_domain: Option<String>,
    pub auto_shorten_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl UserSettings {
    pub fn api_key(&self) -> Option<&str> {
        self.rebrandly_api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn custom_domain(&self) -> Option<&str> {
        self.custom_domain.as_deref().filter(|d| !d.is_empty())
    }
}

/// What the HTTP layer returns: the key is never echoed back in full.
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub user_id: String,
    pub has_api_key: bool,
    pub rebrandly_api_key: Option<String>,
    pub custom_domain: Option<String>,
    pub auto_shorten_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserSettings> for SettingsView {
    fn from(settings: UserSettings) -> Self {
        SettingsView {
            has_api_key: settings.api_key().is_some(),
            rebrandly_api_key: settings.api_key().map(mask_api_key),
            user_id: settings.user_id,
            custom_domain: settings.custom_domain,
            auto_shorten_enabled: settings.auto_shorten_enabled,
            created_at: settings.created_at,
            updated_at: settings.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettings {
    pub rebrandly_api_key: Option<String>,
    pub custom_domain: Option<String>,
    pub auto_shorten_enabled: Option<bool>,
}

/// Keeps only the last four characters visible.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}

pub struct SettingsStore<'a> {
    db: &'a Database,
}

impl<'a> SettingsStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn get_or_create(&self, user_id: &str) -> Result<UserSettings> {
        self.db
            .execute(
                "INSERT OR IGNORE INTO user_settings (user_id) VALUES (?)",
                libsql::params![user_id],
            )
            .await?;

        let query = r#"
            SELECT user_id, rebrandly_api_key, custom_domain, auto_shorten_enabled, created_at, updated_at
            FROM user_settings
            WHERE user_id = ?
        "#;

        let mut rows = self.db.connection().query(query, libsql::params![user_id]).await?;
        let Some(row) = rows.next().await? else {
            anyhow::bail!("settings for {} missing after insert", user_id)
        };

        let auto_shorten: i64 = row.get(3)?;
        Ok(UserSettings {
            user_id: row.get(0)?,
            rebrandly_api_key: row.get(1)?,
            custom_domain: row.get(2)?,
            auto_shorten_enabled: auto_shorten != 0,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }

    /// Applies the fields that are present. An empty key or domain clears it.
    pub async fn update(&self, user_id: &str, input: UpdateSettings) -> Result<UserSettings> {
        let existing = self.get_or_create(user_id).await?;

        let mut updates = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(key) = input.rebrandly_api_key {
            updates.push("rebrandly_api_key = ?");
            params.push(blank_to_null(key));
        }
        if let Some(domain) = input.custom_domain {
            updates.push("custom_domain = ?");
            params.push(blank_to_null(domain));
        }
        if let Some(enabled) = input.auto_shorten_enabled {
            updates.push("auto_shorten_enabled = ?");
            params.push(libsql::Value::Integer(enabled as i64));
        }

        if updates.is_empty() {
            return Ok(existing);
        }

        updates.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");
        params.push(user_id.into());

        let query = format!("UPDATE user_settings SET {} WHERE user_id = ?", updates.join(", "));
        self.db.execute(&query, params).await?;

        self.get_or_create(user_id).await
    }
}

fn blank_to_null(value: String) -> libsql::Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        libsql::Value::Null
    } else {
        trimmed.to_string().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_db;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("abcdef123456"), "********3456");
        assert_eq!(mask_api_key("abc"), "abc");
        assert_eq!(mask_api_key(""), "");
    }

    #[tokio::test]
    async fn test_get_creates_defaults_once() {
        let (db, _dir) = temp_db().await;
        let store = SettingsStore::new(&db);

        let settings = store.get_or_create("alice").await.unwrap();
        assert_eq!(settings.user_id, "alice");
        assert!(!settings.auto_shorten_enabled);
        assert_eq!(settings.api_key(), None);
        assert_eq!(settings.custom_domain(), None);

        store.get_or_create("alice").await.unwrap();
        let mut rows = db
            .connection()
            .query("SELECT COUNT(*) FROM user_settings", ())
            .await
            .unwrap();
        let count: i64 = rows.next().await.unwrap().unwrap().get(0).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_partial_update_and_clearing() {
        let (db, _dir) = temp_db().await;
        let store = SettingsStore::new(&db);

        let settings = store
            .update(
                "alice",
                UpdateSettings {
                    rebrandly_api_key: Some(" key-1234 ".to_string()),
                    custom_domain: Some("go.example".to_string()),
                    auto_shorten_enabled: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(settings.api_key(), Some("key-1234"));
        assert_eq!(settings.custom_domain(), Some("go.example"));
        assert!(settings.auto_shorten_enabled);

        // Absent fields stay; an empty domain clears.
        let settings = store
            .update(
                "alice",
                UpdateSettings {
                    custom_domain: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(settings.api_key(), Some("key-1234"));
        assert_eq!(settings.custom_domain(), None);
        assert!(settings.auto_shorten_enabled);

        let view = SettingsView::from(settings);
        assert!(view.has_api_key);
        assert_eq!(view.rebrandly_api_key.as_deref(), Some("****1234"));

        let other = store.get_or_create("bob").await.unwrap();
        assert_eq!(other.api_key(), None);
    }
}
