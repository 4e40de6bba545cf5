//! App-wide key/value configuration with translatable values.

use serde::{Deserialize, Serialize};

use crate::db::models::catalog::resolve_translation;
use crate::db::DbPool;
use crate::i18n::Lang;

/// Fallback literals used when no row (or no translation) exists.
pub const DEFAULT_PRIMARY_COLOR: &str = "#12D18E";
pub const DEFAULT_PLATFORM_NAME: &str = "SteamUp";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub async fn list(pool: &DbPool, lang: Lang) -> Result<Vec<Self>, sqlx::Error> {
        let rows: Vec<(i64, String, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT c.id, c.key, c.value, t.lang, t.value
             FROM app_config c
             LEFT JOIN app_config_translations t ON t.config_id = c.id
             ORDER BY c.id",
        )
        .fetch_all(pool)
        .await?;

        let mut entries: Vec<(i64, String, String, Vec<(String, String)>)> = Vec::new();
        for (id, key, canonical, t_lang, t_value) in rows {
            if entries.last().map(|(last_id, _, _, _)| *last_id) != Some(id) {
                entries.push((id, key, canonical, Vec::new()));
            }
            if let (Some(code), Some(text)) = (t_lang, t_value) {
                if let Some((_, _, _, pairs)) = entries.last_mut() {
                    pairs.push((code, text));
                }
            }
        }

        Ok(entries
            .into_iter()
            .map(|(_, key, canonical, pairs)| {
                let value = resolve_translation(lang, &pairs, &canonical).to_string();
                Self { key, value }
            })
            .collect())
    }

    /// Localized value for one key, or None when the row is absent.
    pub async fn get_value(
        pool: &DbPool,
        key: &str,
        lang: Lang,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, value FROM app_config WHERE key = ?")
                .bind(key)
                .fetch_optional(pool)
                .await?;

        let Some((id, canonical)) = row else {
            return Ok(None);
        };

        let translations: Vec<(String, String)> = sqlx::query_as(
            "SELECT lang, value FROM app_config_translations WHERE config_id = ?",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(Some(
            resolve_translation(lang, &translations, &canonical).to_string(),
        ))
    }
}
