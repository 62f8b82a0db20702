use serde::de::DeserializeOwned;

/// Parse an enum from its canonical wire spelling via serde.
///
/// No alias folding: `in-progress` is not `in_progress`, and
/// `street_light` is not `street-light`.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// [`parse_enum`] over an optional flag.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|raw| parse_enum(raw, field)).transpose()
}
