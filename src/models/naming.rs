//! Naming templates for resource group and storage account names.

use crate::error::ProvisionError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Substitution slot inside a template.
pub const SLOT: &str = "{0}";

static STORAGE_NAME_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_storage_name_regex() -> &'static Regex {
    STORAGE_NAME_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9]{3,24}$").expect("Invalid Regex"))
}

/// A name pattern with one `{0}` slot, e.g. `"{0}_resources"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamingTemplate(pub(crate) String);

impl NamingTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, ProvisionError> {
        let template = template.into();
        if !template.contains(SLOT) {
            return Err(ProvisionError::Template {
                template,
                reason: format!("missing substitution slot {SLOT}"),
            });
        }
        Ok(NamingTemplate(template))
    }

    /// Substitute `value` into every slot.
    pub fn render(&self, value: &str) -> String {
        self.0.replace(SLOT, value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NamingTemplate {
    type Error = ProvisionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NamingTemplate::new(value)
    }
}

impl From<NamingTemplate> for String {
    fn from(template: NamingTemplate) -> Self {
        template.0
    }
}

/// Azure only accepts 3-24 lowercase letters and digits for storage accounts.
/// The caller owns the naming, so a mismatch is reported but not rejected.
pub fn is_valid_storage_account_name(name: &str) -> bool {
    get_storage_name_regex().is_match(name)
}
