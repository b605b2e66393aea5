//! Local toot ID mapping
//!
//! Server status IDs are long opaque strings; nobody wants to type them.
//! [`IdMap`] hands out small per-session numbers the moment a toot is
//! printed and translates them back when a command references one.

/// Session-scoped mapping between local numbers and server status IDs
#[derive(Debug, Default)]
pub struct IdMap {
    globals: Vec<String>,
}

impl IdMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Local number for a server ID, assigning the next free one on first
    /// sight. Stable for the session: the same global ID always maps to
    /// the same local number.
    pub fn to_local(&mut self, global: &str) -> usize {
        if let Some(pos) = self.globals.iter().position(|g| g == global) {
            pos + 1
        } else {
            self.globals.push(global.to_string());
            self.globals.len()
        }
    }

    /// Server ID for a local number as typed by the user. `None` for
    /// non-numeric input or numbers never handed out.
    pub fn to_global(&self, local: &str) -> Option<&str> {
        let n: usize = local.trim().parse().ok()?;
        self.globals.get(n.checked_sub(1)?).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut ids = IdMap::new();
        let local = ids.to_local("109382001");
        assert_eq!(local, 1);
        assert_eq!(ids.to_global("1"), Some("109382001"));
    }

    #[test]
    fn test_stable_per_global() {
        let mut ids = IdMap::new();
        assert_eq!(ids.to_local("a"), 1);
        assert_eq!(ids.to_local("b"), 2);
        assert_eq!(ids.to_local("a"), 1);
    }

    #[test]
    fn test_to_global_rejects_unknown() {
        let ids = IdMap::new();
        assert_eq!(ids.to_global("1"), None);
        assert_eq!(ids.to_global("test"), None);
        assert_eq!(ids.to_global("0"), None);
    }
}
