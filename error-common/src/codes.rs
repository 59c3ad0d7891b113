// Error codes implementation
// Stable codes surfaced to callers so a UI can map an error to a prompt.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const UNKNOWN_CATALOG_ENTRY: &str = "VALIDATION_1003";
}

pub mod payment {
    pub const INSUFFICIENT_AMOUNT: &str = "PAYMENT_5001";
    pub const GATEWAY_FAILURE: &str = "PAYMENT_5002";
}

pub mod insurance {
    pub const CLAIM_NOT_FOUND: &str = "INSURANCE_6001";
    pub const INVALID_TRANSITION: &str = "INSURANCE_6002";
    pub const GATEWAY_FAILURE: &str = "INSURANCE_6003";
}

pub mod storage {
    pub const REPOSITORY_FAILURE: &str = "STORAGE_4001";
}

pub mod config {
    pub const INVALID_CONFIGURATION: &str = "CONFIG_7001";
}
