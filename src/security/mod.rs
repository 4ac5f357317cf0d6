//! Java security configuration and the NSS descriptors it references.
//!
//! - [`provider`] parses `security.provider.<rank>=...` lines
//! - [`descriptor`] parses NSS descriptors and checks the library they name
//! - [`scan`] walks a security file and decides whether NSS is configured
//! - [`locate`] finds the security file inside a runtime installation

pub mod descriptor;
pub mod locate;
pub mod provider;
pub mod scan;

pub use descriptor::LibraryConfig;
pub use locate::find_security_file;
pub use provider::{list_providers, ProviderLine, PROVIDER_PREFIX};
pub use scan::{ProviderScanner, ScanOutcome, ScanState};
