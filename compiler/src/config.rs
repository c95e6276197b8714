use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::XidlError;

/// Knobs for a compilation run. Every field has a default matching the
/// VirtualBox web service, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerOptions {
    /// `<if target="...">` sections are kept only for this transport.
    pub target:           String,
    /// Name of the implicit handle argument sent with non-global calls.
    pub this_argument:    String,
    /// Interface returned by the generated `connect()`. Defaults to the first
    /// `wsmap="global"` interface in the schema.
    pub entry_interface:  Option<String>,
    /// WSDL location, relative to the generated module's directory.
    pub wsdl_path:        String,
    pub service:          String,
    pub port:             String,
    pub default_endpoint: String,
    /// Banner placed verbatim at the very top of the generated file.
    pub license_header:   Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            target:           "wsdl".to_string(),
            this_argument:    "_this".to_string(),
            entry_interface:  None,
            wsdl_path:        "sdk-files/vboxwebService.wsdl".to_string(),
            service:          "vboxService".to_string(),
            port:             "vboxServicePort".to_string(),
            default_endpoint: "http://localhost:18083".to_string(),
            license_header:   None,
        }
    }
}

impl CompilerOptions {
    pub fn from_json(text: &str) -> Result<Self, XidlError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, XidlError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
