use anyhow::{Context, Result};
use chrono::FixedOffset;
use rust_decimal::Decimal;
use storage::services::submission::SubmissionRules;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_keys: String,
    pub rules: SubmissionRules,
    /// Offset of the broadcast time zone, used for deadlines and leaderboard windows.
    pub utc_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = SubmissionRules::default();

        let rules = SubmissionRules {
            min_audience: optional_var("PREDICTION_MIN_AUDIENCE")?.unwrap_or(defaults.min_audience),
            max_audience: optional_var::<Decimal>("PREDICTION_MAX_AUDIENCE")?
                .unwrap_or(defaults.max_audience),
            deadline_hour: optional_var("SUBMISSION_DEADLINE_HOUR")?.unwrap_or(defaults.deadline_hour),
        };
        if rules.min_audience >= rules.max_audience {
            anyhow::bail!("PREDICTION_MIN_AUDIENCE must be lower than PREDICTION_MAX_AUDIENCE");
        }
        if rules.deadline_hour > 23 {
            anyhow::bail!("SUBMISSION_DEADLINE_HOUR must be between 0 and 23");
        }

        let offset_minutes: i32 = optional_var("LOCAL_UTC_OFFSET_MINUTES")?.unwrap_or(60);
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("LOCAL_UTC_OFFSET_MINUTES is out of range")?;

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: optional_var("DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            rules,
            utc_offset,
        })
    }
}

fn optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Cannot parse {name} env variable")),
        Err(_) => Ok(None),
    }
}
