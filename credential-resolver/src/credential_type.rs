//! Credential type catalog
//!
//! Each credential type the host can request names the output keys it needs.
//! The catalog is static; lookups are by exact, case-sensitive name.

use std::fmt;

use crate::secret::{VAL_PKEY, VAL_PSWD, VAL_USER};

const USER_PASSWORD: &[&str] = &[VAL_USER, VAL_PSWD];
const USER_PRIVATE_KEY: &[&str] = &[VAL_USER, VAL_PKEY];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    Basic,
    Windows,
    SshPassword,
    Vmware,
    Jdbc,
    Jms,
    Aws,
    SshPrivateKey,
    SnCfgAnsible,
    SnDiscoCertmgmtCertificateCa,
    CfgChefCredentials,
    Infoblox,
    ApiKey,
}

impl CredentialType {
    pub const ALL: [CredentialType; 13] = [
        CredentialType::Basic,
        CredentialType::Windows,
        CredentialType::SshPassword,
        CredentialType::Vmware,
        CredentialType::Jdbc,
        CredentialType::Jms,
        CredentialType::Aws,
        CredentialType::SshPrivateKey,
        CredentialType::SnCfgAnsible,
        CredentialType::SnDiscoCertmgmtCertificateCa,
        CredentialType::CfgChefCredentials,
        CredentialType::Infoblox,
        CredentialType::ApiKey,
    ];

    /// Name as the host spells it in a resolve request
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CredentialType::Basic => "basic",
            CredentialType::Windows => "windows",
            CredentialType::SshPassword => "ssh_password",
            CredentialType::Vmware => "vmware",
            CredentialType::Jdbc => "jdbc",
            CredentialType::Jms => "jms",
            CredentialType::Aws => "aws",
            CredentialType::SshPrivateKey => "ssh_private_key",
            CredentialType::SnCfgAnsible => "sn_cfg_ansible",
            CredentialType::SnDiscoCertmgmtCertificateCa => "sn_disco_certmgmt_certificate_ca",
            CredentialType::CfgChefCredentials => "cfg_chef_credentials",
            CredentialType::Infoblox => "infoblox",
            CredentialType::ApiKey => "api_key",
        }
    }

    /// Output keys that must be present for this type
    #[must_use]
    pub fn required_fields(self) -> &'static [&'static str] {
        match self {
            CredentialType::Basic
            | CredentialType::Windows
            | CredentialType::SshPassword
            | CredentialType::Vmware
            | CredentialType::Jdbc
            | CredentialType::Jms
            | CredentialType::Aws => USER_PASSWORD,
            CredentialType::SshPrivateKey
            | CredentialType::SnCfgAnsible
            | CredentialType::SnDiscoCertmgmtCertificateCa
            | CredentialType::CfgChefCredentials
            | CredentialType::Infoblox
            | CredentialType::ApiKey => USER_PRIVATE_KEY,
        }
    }

    /// Look up a type by exact name; unknown names yield `None`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for credential_type in CredentialType::ALL {
            assert_eq!(
                CredentialType::from_name(credential_type.name()),
                Some(credential_type)
            );
        }
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert_eq!(
            CredentialType::from_name("ssh_private_key"),
            Some(CredentialType::SshPrivateKey)
        );
        assert_eq!(CredentialType::from_name("SSH_PRIVATE_KEY"), None);
        assert_eq!(CredentialType::from_name("Basic"), None);
        assert_eq!(CredentialType::from_name(""), None);
        assert_eq!(CredentialType::from_name("snmpv3"), None);
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(CredentialType::Windows.required_fields(), &["user", "pswd"]);
        assert_eq!(CredentialType::Infoblox.required_fields(), &["user", "pkey"]);
        assert!(
            CredentialType::ALL
                .iter()
                .all(|t| !t.required_fields().is_empty())
        );
    }

    #[test]
    fn test_display_uses_wire_name() {
        assert_eq!(
            CredentialType::SnDiscoCertmgmtCertificateCa.to_string(),
            "sn_disco_certmgmt_certificate_ca"
        );
    }
}
