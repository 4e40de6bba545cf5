//! Startup seeders for catalog and configuration data.
//!
//! Runs after migrations on every start; existing rows are left untouched so
//! admin edits survive restarts.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// (canonical, en, uz, ru)
type Translated = (&'static str, &'static str, &'static str, &'static str);

const LEARNING_DOMAINS: &[Translated] = &[
    ("Science", "Science", "Ilm-fan", "Наука"),
    ("Technology", "Technology", "Texnologiya", "Технология"),
    ("Engineering", "Engineering", "Muhandislik", "Инженерия"),
    ("Math", "Mathematics", "Matematika", "Математика"),
    (
        "Computer Science",
        "Computer Science",
        "Kompyuter fanlari",
        "Информатика",
    ),
    ("Robotics", "Robotics", "Robototexnika", "Робототехника"),
    ("Astronomy", "Astronomy", "Astronomiya", "Астрономия"),
    (
        "Environmental Science",
        "Environmental Science",
        "Ekologiya",
        "Экология",
    ),
    ("Physics", "Physics", "Fizika", "Физика"),
    ("Chemistry", "Chemistry", "Kimyo", "Химия"),
    ("Biology", "Biology", "Biologiya", "Биология"),
];

const LEARNING_MOTIVATIONS: &[Translated] = &[
    (
        "Just for fun",
        "Just for fun",
        "Shunchaki qiziq",
        "Просто для удовольствия",
    ),
    (
        "Improve my career",
        "Improve my career",
        "Karyeramni rivojlantirish",
        "Улучшить карьеру",
    ),
    (
        "Support my education",
        "Support my education",
        "Ta'limni qo'llab-quvvatlash",
        "Поддержать образование",
    ),
    (
        "Personal growth",
        "Personal growth",
        "Shaxsiy rivojlanish",
        "Личностный рост",
    ),
    (
        "Contribution to society",
        "Contribution to society",
        "Jamiyatga hissa qo'shish",
        "Вклад в общество",
    ),
];

/// (period_unit, repeat_count, complement, en, uz, ru)
const PERIOD_TARGETS: &[(&str, i64, &str, &str, &str, &str)] = &[
    (
        "daily",
        1,
        "Just getting started",
        "Take it easy",
        "Bosqichma-bosqich",
        "Не торопясь",
    ),
    (
        "daily",
        2,
        "Building a habit",
        "Building a habit",
        "Odatni shakllantirish",
        "Формирование привычки",
    ),
    (
        "daily",
        5,
        "Consistent learner",
        "Consistent learner",
        "Doimiy o'rganuvchi",
        "Постоянный ученик",
    ),
    (
        "daily",
        10,
        "Ambitious achiever",
        "Ambitious achiever",
        "Shuhratparast yutuqqa erishuvchi",
        "Амбициозный ученик",
    ),
    (
        "weekly",
        3,
        "Weekend warrior",
        "Weekend warrior",
        "Dam olish kunlari o'rganuvchi",
        "Выходной воин",
    ),
    (
        "weekly",
        5,
        "Steady progress",
        "Steady progress",
        "Barqaror progress",
        "Стабильный прогресс",
    ),
    (
        "monthly",
        15,
        "Monthly milestone",
        "Monthly milestone",
        "Oylik maqsad",
        "Ежемесячная цель",
    ),
];

/// App config values are the same in every language today, but the rows are
/// translatable so per-language branding stays possible.
const APP_CONFIG: &[Translated] = &[
    ("#12D18E", "#12D18E", "#12D18E", "#12D18E"),
    ("SteamUp", "SteamUp", "SteamUp", "SteamUp"),
];

const APP_CONFIG_KEYS: &[&str] = &["primary_color", "platform_name"];

pub async fn seed_reference_data(pool: &SqlitePool) -> Result<()> {
    info!("Seeding reference data...");

    for &(canonical, en, uz, ru) in LEARNING_DOMAINS {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM learning_domains WHERE name = ?")
                .bind(canonical)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            continue;
        }
        let id = sqlx::query("INSERT INTO learning_domains (name) VALUES (?)")
            .bind(canonical)
            .execute(pool)
            .await?
            .last_insert_rowid();
        for (lang, name) in [("en", en), ("uz", uz), ("ru", ru)] {
            sqlx::query(
                "INSERT INTO learning_domain_translations (domain_id, lang, name) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(lang)
            .bind(name)
            .execute(pool)
            .await?;
        }
    }

    for &(canonical, en, uz, ru) in LEARNING_MOTIVATIONS {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM learning_motivations WHERE title = ?")
                .bind(canonical)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            continue;
        }
        let id = sqlx::query("INSERT INTO learning_motivations (title) VALUES (?)")
            .bind(canonical)
            .execute(pool)
            .await?
            .last_insert_rowid();
        for (lang, title) in [("en", en), ("uz", uz), ("ru", ru)] {
            sqlx::query(
                "INSERT INTO learning_motivation_translations (motivation_id, lang, title) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(lang)
            .bind(title)
            .execute(pool)
            .await?;
        }
    }

    for &(unit, count, complement, en, uz, ru) in PERIOD_TARGETS {
        let existing: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM learning_period_targets WHERE period_unit = ? AND repeat_count = ?",
        )
        .bind(unit)
        .bind(count)
        .fetch_optional(pool)
        .await?;
        if existing.is_some() {
            continue;
        }
        let id = sqlx::query(
            "INSERT INTO learning_period_targets (repeat_count, period_unit, complement) VALUES (?, ?, ?)",
        )
        .bind(count)
        .bind(unit)
        .bind(complement)
        .execute(pool)
        .await?
        .last_insert_rowid();
        for (lang, text) in [("en", en), ("uz", uz), ("ru", ru)] {
            sqlx::query(
                "INSERT INTO learning_period_target_translations (target_id, lang, complement) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(lang)
            .bind(text)
            .execute(pool)
            .await?;
        }
    }

    for (&key, &(canonical, en, uz, ru)) in APP_CONFIG_KEYS.iter().zip(APP_CONFIG) {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM app_config WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            continue;
        }
        let id = sqlx::query("INSERT INTO app_config (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(canonical)
            .execute(pool)
            .await?
            .last_insert_rowid();
        for (lang, value) in [("en", en), ("uz", uz), ("ru", ru)] {
            sqlx::query(
                "INSERT INTO app_config_translations (config_id, lang, value) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(lang)
            .bind(value)
            .execute(pool)
            .await?;
        }
    }

    info!("Reference data seeded");
    Ok(())
}
