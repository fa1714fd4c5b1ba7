//! Library discovery: which event-stream-capable libraries are loaded into
//! this process, and which wire versions each can emit.

use serde::{Deserialize, Serialize};

use crate::version::WireVersion;

/// Describes one library able to produce this wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    pub name: String,
    pub version: String,
    #[serde(rename = "wireVersions")]
    pub wire_versions: Vec<WireVersion>,
}

/// Lists the libraries available in this process. Currently that is this
/// crate alone; hosts embedding additional runtimes append their own
/// descriptors.
pub fn available_libraries() -> Vec<LibraryDescriptor> {
    vec![LibraryDescriptor {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        wire_versions: WireVersion::KNOWN.to_vec(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn this_crate_reports_every_registered_version() {
        let libraries = available_libraries();
        assert_eq!(libraries.len(), 1);
        assert_eq!(libraries[0].name, "wire_events");
        assert_eq!(libraries[0].wire_versions, WireVersion::KNOWN.to_vec());
    }
}
