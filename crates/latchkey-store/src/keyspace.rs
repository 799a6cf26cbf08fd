//! Key addressing
//!
//! Maps a logical field name and its owning entity's identifier onto the
//! namespaced key string the field lives under in the store.

/// Produces namespaced keys of the form `prefix:id:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    prefix: String,
}

impl Keyspace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key for a field owned by one entity: `prefix:id:name`.
    pub fn field_key(&self, id: &str, name: &str) -> String {
        format!("{}:{}:{}", self.prefix, id, name)
    }

    /// Key for a field shared across the whole prefix: `prefix:name`.
    pub fn global_key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_key() {
        let keyspace = Keyspace::new("job");
        assert_eq!(keyspace.field_key("42", "run_lock"), "job:42:run_lock");
    }

    #[test]
    fn test_global_key() {
        let keyspace = Keyspace::new("job");
        assert_eq!(keyspace.global_key("schedule_lock"), "job:schedule_lock");
    }

    #[test]
    fn test_prefix_accessor() {
        assert_eq!(Keyspace::new("session").prefix(), "session");
    }
}
