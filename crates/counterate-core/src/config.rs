/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field names map to upper-case
/// env vars) and call `Config::from_env()` once at startup.
///
/// # Panics
///
/// Panics if any required env var is missing or cannot be deserialized.
pub trait Config: Sized + serde::de::DeserializeOwned {
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Like [`Config::from_env`] but only reads vars starting with `prefix`,
    /// which is stripped before field matching.
    fn from_env_prefixed(prefix: &str) -> Self {
        envy::prefixed(prefix)
            .from_env()
            .expect("failed to load config from environment")
    }

    /// Same as [`Config::from_env`] but reads from an explicit iterator.
    fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
