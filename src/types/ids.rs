use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static RAW_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-f0-9]{32}$")
        .expect("Failed to compile raw Notion ID regex - this is a bug in the code")
});

// https://www.notion.so/<workspace>/<title->?<id>?v=<view>
static URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)notion\.(?:so|site)/(?:[^/?#]+/)?(?:[^/?#]*-)?([a-f0-9]{32})(?:[/?#]|$)")
        .expect("Failed to compile Notion URL regex - this is a bug in the code")
});

static DASHED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12})")
        .expect("Failed to compile dashed UUID regex - this is a bug in the code")
});

/// The identifier form accepted by every Notion endpoint.
///
/// Produced once per user-supplied identifier by [`CanonicalId::resolve`];
/// downstream calls never re-resolve. Resolution is best-effort: input that
/// matches none of the known shapes is carried through unchanged and the
/// remote service gets to reject it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Normalizes a raw id, a workspace URL, or a dashed UUID.
    pub fn resolve(input: &str) -> Self {
        if RAW_ID.is_match(input) {
            return Self(input.to_ascii_lowercase());
        }

        if let Some(id) = URL_ID.captures(input).and_then(|c| c.get(1)) {
            return Self(id.as_str().to_ascii_lowercase());
        }

        if let Some(uuid) = DASHED_ID.captures(input).and_then(|c| c.get(1)) {
            return Self(uuid.as_str().replace('-', "").to_ascii_lowercase());
        }

        log::debug!("Identifier '{}' left unresolved", input);
        Self(input.to_string())
    }

    /// Whether resolution produced the 32 lowercase hex form.
    pub fn is_canonical(&self) -> bool {
        self.0.len() == 32
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID format.
    pub fn to_hyphenated(&self) -> String {
        if self.is_canonical() {
            format!(
                "{}-{}-{}-{}-{}",
                &self.0[0..8],
                &self.0[8..12],
                &self.0[12..16],
                &self.0[16..20],
                &self.0[20..32]
            )
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1234567890abcdef1234567890abcdef";

    #[test]
    fn test_raw_id() {
        assert_eq!(CanonicalId::resolve(ID).as_str(), ID);
        assert_eq!(
            CanonicalId::resolve("1234567890ABCDEF1234567890ABCDEF").as_str(),
            ID
        );
    }

    #[test]
    fn test_workspace_url() {
        let id = CanonicalId::resolve(
            "https://www.notion.so/myws/1234567890abcdef1234567890abcdef?v=xyz",
        );
        assert_eq!(id.as_str(), ID);

        let id = CanonicalId::resolve("https://www.notion.so/1234567890abcdef1234567890abcdef");
        assert_eq!(id.as_str(), ID);

        let id = CanonicalId::resolve(
            "https://www.notion.so/myws/Reading-List-1234567890abcdef1234567890abcdef",
        );
        assert_eq!(id.as_str(), ID);
    }

    #[test]
    fn test_dashed_uuid() {
        let id = CanonicalId::resolve("12345678-90ab-cdef-1234-567890abcdef");
        assert_eq!(id.as_str(), ID);
        assert!(id.is_canonical());
    }

    #[test]
    fn test_unresolved_input_passes_through() {
        let id = CanonicalId::resolve("not an id");
        assert_eq!(id.as_str(), "not an id");
        assert!(!id.is_canonical());
        assert_eq!(CanonicalId::resolve("").as_str(), "");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let inputs = [
            ID,
            "12345678-90AB-cdef-1234-567890abcdef",
            "https://www.notion.so/myws/1234567890abcdef1234567890abcdef?v=xyz",
            "notion.so/abc",
            "garbage",
            "",
        ];
        for input in inputs {
            let once = CanonicalId::resolve(input);
            let twice = CanonicalId::resolve(once.as_str());
            assert_eq!(once, twice, "resolve not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_to_hyphenated() {
        let id = CanonicalId::resolve(ID);
        assert_eq!(id.to_hyphenated(), "12345678-90ab-cdef-1234-567890abcdef");
        assert_eq!(CanonicalId::resolve("x").to_hyphenated(), "x");
    }
}
