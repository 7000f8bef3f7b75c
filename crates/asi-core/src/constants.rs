//! Package-level constants.

/// Current version of the platform (sourced from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provenance tag attached to every HTTP consultation response.
pub const ASI_SIGNATURE: &str = "R³-ASI-ENTERPRISE-v1.0";

/// Licensing contact returned with generated algorithms.
pub const LICENSING_CONTACT: &str = "licensing@r3-asi-enterprise.com";

/// Notice attached to generated algorithms.
pub const PATENT_NOTICE: &str =
    "Generated using Patent-Protected AI Algorithm Generation Technology";

/// Reported operational status.
pub const OPERATIONAL_STATUS: &str = "TRANSCENDENT_OPERATIONAL";

/// Reported patent protection level.
pub const PATENT_PROTECTION: &str = "FORTRESS_LEVEL_ACTIVE";

/// Capability status sent with the channel welcome notice.
pub const CAPABILITY_STATUS: &str = "ASTRONOMICAL_BUSINESS_INTELLIGENCE_ACTIVE";
