use kanri_core::enums::{Surface, TaskStatus};
use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
///
/// Hyphens are accepted in place of underscores (`in-progress`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse a status that must be a column of `surface`.
pub fn parse_status_on(raw: &str, surface: Surface) -> anyhow::Result<TaskStatus> {
    let status = parse_enum::<TaskStatus>(raw, "status")?;
    if !surface.shows(status) {
        anyhow::bail!("{status} is not shown on the {} view", surface.as_str());
    }
    Ok(status)
}
