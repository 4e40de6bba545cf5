//! Read-mostly catalog entities with per-language translations.
//!
//! Each entity keeps a canonical column plus a translations table keyed by
//! (entity id, lang). Lookups resolve the requested language, then English,
//! then any stored translation, then the canonical text.

use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::i18n::Lang;

/// Pick the best translation for `lang` out of (lang, text) pairs.
pub(crate) fn resolve_translation<'a>(
    lang: Lang,
    translations: &'a [(String, String)],
    canonical: &'a str,
) -> &'a str {
    let exact = translations
        .iter()
        .find(|(code, _)| code == lang.code())
        .map(|(_, text)| text.as_str());
    let english = || {
        translations
            .iter()
            .find(|(code, _)| code == "en")
            .map(|(_, text)| text.as_str())
    };
    let any = || translations.first().map(|(_, text)| text.as_str());

    exact
        .or_else(english)
        .or_else(any)
        .unwrap_or(canonical)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningDomainOption {
    pub id: i64,
    pub name: String,
}

impl LearningDomainOption {
    pub async fn list(pool: &DbPool, lang: Lang) -> Result<Vec<Self>, sqlx::Error> {
        let rows: Vec<(i64, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT d.id, d.name, t.lang, t.name
             FROM learning_domains d
             LEFT JOIN learning_domain_translations t ON t.domain_id = d.id
             ORDER BY d.id",
        )
        .fetch_all(pool)
        .await?;
        Ok(localize(rows, lang, |id, name| Self { id, name }))
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM learning_domains WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotivationOption {
    pub id: i64,
    pub title: String,
}

impl MotivationOption {
    pub async fn list(pool: &DbPool, lang: Lang) -> Result<Vec<Self>, sqlx::Error> {
        let rows: Vec<(i64, String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT m.id, m.title, t.lang, t.title
             FROM learning_motivations m
             LEFT JOIN learning_motivation_translations t ON t.motivation_id = m.id
             ORDER BY m.id",
        )
        .fetch_all(pool)
        .await?;
        Ok(localize(rows, lang, |id, title| Self { id, title }))
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM learning_motivations WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyGoalOption {
    pub id: i64,
    pub repeat_count: i64,
    pub period_unit: String,
    pub complement: String,
}

impl DailyGoalOption {
    pub async fn list(pool: &DbPool, lang: Lang) -> Result<Vec<Self>, sqlx::Error> {
        // Two queries: the target rows carry extra columns the generic
        // localize() fold doesn't know about.
        let targets: Vec<(i64, i64, String, String)> = sqlx::query_as(
            "SELECT id, repeat_count, period_unit, complement
             FROM learning_period_targets ORDER BY id",
        )
        .fetch_all(pool)
        .await?;

        let translations: Vec<(i64, String, String)> = sqlx::query_as(
            "SELECT target_id, lang, complement FROM learning_period_target_translations",
        )
        .fetch_all(pool)
        .await?;

        Ok(targets
            .into_iter()
            .map(|(id, repeat_count, period_unit, complement)| {
                let pairs: Vec<(String, String)> = translations
                    .iter()
                    .filter(|(tid, _, _)| *tid == id)
                    .map(|(_, lang, text)| (lang.clone(), text.clone()))
                    .collect();
                let complement = resolve_translation(lang, &pairs, &complement).to_string();
                Self {
                    id,
                    repeat_count,
                    period_unit,
                    complement,
                }
            })
            .collect())
    }

    pub async fn exists(pool: &DbPool, id: i64) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM learning_period_targets WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }
}

/// Fold (id, canonical, lang?, text?) join rows into localized entries.
fn localize<T>(
    rows: Vec<(i64, String, Option<String>, Option<String>)>,
    lang: Lang,
    build: impl Fn(i64, String) -> T,
) -> Vec<T> {
    let mut out: Vec<(i64, String, Vec<(String, String)>)> = Vec::new();
    for (id, canonical, t_lang, t_text) in rows {
        if out.last().map(|(last_id, _, _)| *last_id) != Some(id) {
            out.push((id, canonical, Vec::new()));
        }
        if let (Some(code), Some(text)) = (t_lang, t_text) {
            if let Some((_, _, pairs)) = out.last_mut() {
                pairs.push((code, text));
            }
        }
    }
    out.into_iter()
        .map(|(id, canonical, pairs)| {
            let text = resolve_translation(lang, &pairs, &canonical).to_string();
            build(id, text)
        })
        .collect()
}
