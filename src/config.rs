//! Engine-wide settings for building tables.
//!
//! Settings come from the process environment, after a `.env` file in the
//! working directory (if any) has been loaded:
//!
//! - `REPORT_TABLE_COERCION`: `lenient` (default) or `strict`
//! - `REPORT_TABLE_SORT_BY_ROW_ID`: `true` (default) or `false`

use std::str::FromStr;

use log::warn;

pub const COERCION_VAR: &str = "REPORT_TABLE_COERCION";
pub const SORT_BY_ROW_ID_VAR: &str = "REPORT_TABLE_SORT_BY_ROW_ID";

/// What happens when text written into a typed column does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Coercion {
    /// Keep the raw text; the column type check then decides.
    #[default]
    Lenient,
    /// Fail the write with a coercion error.
    Strict,
}

impl FromStr for Coercion {
    type Err = String;

    fn from_str(s: &str) -> Result<Coercion, String> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(Coercion::Lenient),
            "strict" => Ok(Coercion::Strict),
            other => Err(format!("invalid coercion mode {}: expected strict or lenient", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub coercion: Coercion,
    pub sort_by_row_id: bool,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            coercion: Coercion::Lenient,
            sort_by_row_id: true,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> EngineConfig {
        //! Load `.env` if present, then read the settings from the environment.

        let _ = dotenvy::dotenv();
        EngineConfig::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> EngineConfig
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        //! Build a config from key/value pairs, ignoring unrelated keys.
        //!
        //! Unparseable values are logged and replaced by the default.

        let mut config = EngineConfig::default();

        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                COERCION_VAR => match value.parse() {
                    Ok(coercion) => config.coercion = coercion,
                    Err(message) => warn!("{}; using {:?}", message, config.coercion),
                },
                SORT_BY_ROW_ID_VAR => match value.trim().parse() {
                    Ok(sort) => config.sort_by_row_id = sort,
                    Err(_) => warn!(
                        "invalid {} value {}: expected true or false",
                        SORT_BY_ROW_ID_VAR, value
                    ),
                },
                _ => {}
            }
        }

        config
    }
}
