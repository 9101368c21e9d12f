//! Secret masking for command lines.

use std::collections::BTreeSet;

/// Flags whose following argument is always treated as a secret.
pub const SECRET_FLAGS: &[&str] = &["--password"];

const DEFAULT_MASK: &str = "[REDACTED]";

/// Replaces registered secret values with a mask string.
///
/// # Example
///
/// ```
/// use invenio_init::secrets::SecretMasker;
///
/// let masker = SecretMasker::new();
/// let argv: Vec<String> = ["invenio", "users", "create", "a@b.c", "--password", "s3cret"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// assert_eq!(
///     masker.display_argv(&argv),
///     "invenio users create a@b.c --password [REDACTED]"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SecretMasker {
    // Longest first so a secret containing another secret is masked whole.
    secrets: BTreeSet<(std::cmp::Reverse<usize>, String)>,
    mask: String,
}

impl SecretMasker {
    /// Create a masker with the default mask string.
    pub fn new() -> Self {
        Self::with_mask(DEFAULT_MASK)
    }

    /// Create a masker with a custom mask string.
    pub fn with_mask(mask: impl Into<String>) -> Self {
        Self {
            secrets: BTreeSet::new(),
            mask: mask.into(),
        }
    }

    /// Register a secret value. Empty strings are ignored.
    pub fn add_secret(&mut self, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.secrets
                .insert((std::cmp::Reverse(value.len()), value));
        }
    }

    /// Number of registered secrets.
    pub fn secret_count(&self) -> usize {
        self.secrets.len()
    }

    /// Mask any registered secret values in `input`.
    pub fn mask(&self, input: &str) -> String {
        let mut result = input.to_string();
        for (_, secret) in &self.secrets {
            result = result.replace(secret.as_str(), &self.mask);
        }
        result
    }

    /// Render an argument vector as one masked, space-joined line.
    ///
    /// Arguments following any of [`SECRET_FLAGS`] are masked even when
    /// they were never registered.
    pub fn display_argv(&self, argv: &[String]) -> String {
        let mut parts = Vec::with_capacity(argv.len());
        let mut hide_next = false;
        for arg in argv {
            if hide_next {
                parts.push(self.mask.clone());
                hide_next = false;
                continue;
            }
            if SECRET_FLAGS.contains(&arg.as_str()) {
                hide_next = true;
            }
            parts.push(self.mask(arg));
        }
        parts.join(" ")
    }
}

impl Default for SecretMasker {
    fn default() -> Self {
        Self::new()
    }
}
