//! Completeness checks for an extracted credential mapping

use log::debug;

use crate::credential_type::CredentialType;
use crate::error::{ResolverError, Result};
use crate::secret::CredentialMap;

/// Check that `result` is usable for the requested credential type.
///
/// An empty mapping always fails. Without a type, any non-empty mapping
/// passes; with one, every required key must be present.
///
/// # Errors
///
/// Returns [`ResolverError::Validation`] naming the first missing field.
pub fn validate_result(
    result: &CredentialMap,
    credential_type: Option<CredentialType>,
) -> Result<()> {
    if result.is_empty() {
        return Err(ResolverError::validation(
            "No fields to extract from Vault secret",
        ));
    }

    let Some(credential_type) = credential_type else {
        return Ok(());
    };

    if let Some(missing) = credential_type
        .required_fields()
        .iter()
        .find(|field| !result.contains_key(field))
    {
        return Err(ResolverError::validation(format!(
            "Expected '{missing}' field for credential type {credential_type}"
        )));
    }

    debug!("Credential satisfies type {credential_type}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::{
        VAL_AUTHKEY, VAL_AUTHPROTO, VAL_PASSPHRASE, VAL_PKEY, VAL_PRIVKEY, VAL_PRIVPROTO,
        VAL_PSWD, VAL_USER,
    };

    #[test]
    fn test_fully_populated_passes_every_type() {
        let result: CredentialMap = [
            VAL_USER,
            VAL_PSWD,
            VAL_PKEY,
            VAL_PASSPHRASE,
            VAL_AUTHPROTO,
            VAL_AUTHKEY,
            VAL_PRIVPROTO,
            VAL_PRIVKEY,
        ]
        .into_iter()
        .map(|key| (key, ""))
        .collect();

        for credential_type in CredentialType::ALL {
            assert!(validate_result(&result, Some(credential_type)).is_ok());
        }
        assert!(validate_result(&result, None).is_ok());
    }

    #[test]
    fn test_empty_fails_for_every_type() {
        let result = CredentialMap::new();
        for credential_type in CredentialType::ALL {
            let err = validate_result(&result, Some(credential_type)).unwrap_err();
            assert_eq!(err.to_string(), "No fields to extract from Vault secret");
        }
        assert!(validate_result(&result, None).is_err());
    }

    #[test]
    fn test_any_field_satisfies_untyped_request() {
        let result: CredentialMap = [("FOO_KEY", "")].into_iter().collect();
        assert!(validate_result(&result, None).is_ok());
    }

    #[test]
    fn test_minimally_populated_passes() {
        for credential_type in CredentialType::ALL {
            let result: CredentialMap = credential_type
                .required_fields()
                .iter()
                .map(|&key| (key, "value"))
                .collect();
            assert!(
                validate_result(&result, Some(credential_type)).is_ok(),
                "type {credential_type}"
            );
        }
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for credential_type in CredentialType::ALL {
            let required = credential_type.required_fields();
            for omitted in required {
                let result: CredentialMap = required
                    .iter()
                    .filter(|key| *key != omitted)
                    .map(|&key| (key, "value"))
                    // keep the map non-empty even for single-field types
                    .chain(std::iter::once((VAL_PASSPHRASE, "extra")))
                    .collect();

                let err = validate_result(&result, Some(credential_type)).unwrap_err();
                assert!(matches!(err, ResolverError::Validation { .. }));
                assert_eq!(
                    err.to_string(),
                    format!("Expected '{omitted}' field for credential type {credential_type}")
                );
            }
        }
    }
}
