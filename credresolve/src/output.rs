//! Rendering of resolved credentials and the type catalog

use std::collections::BTreeMap;
use vault_credential_resolver::{CredentialMap, CredentialType};

const MASK: &str = "********";

/// JSON object with keys in sorted order
pub fn render_json(credential: &CredentialMap) -> serde_json::Result<String> {
    let sorted: BTreeMap<String, String> = credential.expose().into_iter().collect();
    serde_json::to_string_pretty(&sorted)
}

/// Two column table, values masked unless `show_secrets` is set
pub fn render_table(credential: &CredentialMap, show_secrets: bool) -> String {
    let sorted: BTreeMap<String, String> = credential.expose().into_iter().collect();
    let width = sorted.keys().map(String::len).max().unwrap_or(0).max("KEY".len());

    let mut out = format!("{:<width$}  VALUE\n", "KEY");
    for (key, value) in &sorted {
        let shown = if show_secrets { value.as_str() } else { MASK };
        out.push_str(&format!("{key:<width$}  {shown}\n"));
    }
    out
}

/// Catalog listing, one type per line
pub fn render_types() -> String {
    let width = CredentialType::ALL
        .iter()
        .map(|t| t.name().len())
        .max()
        .unwrap_or(0);

    CredentialType::ALL
        .iter()
        .map(|t| format!("{:<width$}  {}\n", t.name(), t.required_fields().join(", ")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> CredentialMap {
        [("user", "admin"), ("pswd", "hunter2")].into_iter().collect()
    }

    #[test]
    fn test_json_sorted_keys() {
        let json = render_json(&credential()).unwrap();
        let pswd = json.find("\"pswd\"").unwrap();
        let user = json.find("\"user\"").unwrap();
        assert!(pswd < user);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["user"], "admin");
        assert_eq!(parsed["pswd"], "hunter2");
    }

    #[test]
    fn test_table_masks_values() {
        let table = render_table(&credential(), false);
        assert!(table.starts_with("KEY "));
        assert!(table.contains("user  ********"));
        assert!(!table.contains("hunter2"));
    }

    #[test]
    fn test_table_shows_values_on_request() {
        let table = render_table(&credential(), true);
        assert!(table.contains("pswd  hunter2"));
        assert!(table.contains("user  admin"));
    }

    #[test]
    fn test_types_lists_catalog() {
        let listing = render_types();
        assert_eq!(listing.lines().count(), CredentialType::ALL.len());
        assert!(listing.contains("ssh_private_key"));
        assert!(
            listing
                .lines()
                .any(|line| line.starts_with("windows") && line.ends_with("user, pswd"))
        );
    }
}
