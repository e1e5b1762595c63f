/// Error code registry for flow-variableizer
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors (rule source, settings)
/// - 2000-2999: Input errors (flow files)
/// - 3000-3999: Structure errors (mutation contract violations)
/// - 4000-4999: Output errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_JSON: u16 = 1002;
    pub const CONFIG_INVALID_TOML: u16 = 1003;
    pub const CONFIG_NOT_AN_OBJECT: u16 = 1004;
    pub const CONFIG_READ_FAILED: u16 = 1005;

    // Input errors (2000-2999)
    pub const INPUT_GENERIC: u16 = 2000;
    pub const INPUT_NOT_FOUND: u16 = 2001;
    pub const INPUT_READ_FAILED: u16 = 2002;
    pub const INPUT_INVALID_JSON: u16 = 2003;
    pub const INPUT_NOT_AN_OBJECT: u16 = 2004;
    pub const INPUT_NO_MATCHING_FILES: u16 = 2005;

    // Structure errors (3000-3999)
    pub const STRUCTURE_GENERIC: u16 = 3000;
    pub const STRUCTURE_NOT_A_SEQUENCE: u16 = 3001;
    pub const STRUCTURE_INDEX_OUT_OF_RANGE: u16 = 3002;
    pub const STRUCTURE_NOT_A_MAPPING: u16 = 3003;
    pub const STRUCTURE_UNRESOLVED_LOCATION: u16 = 3004;

    // Output errors (4000-4999)
    pub const OUTPUT_GENERIC: u16 = 4000;
    pub const OUTPUT_DIR_CREATE_FAILED: u16 = 4001;
    pub const OUTPUT_WRITE_FAILED: u16 = 4002;
    pub const OUTPUT_SERIALIZATION_FAILED: u16 = 4003;
    pub const OUTPUT_PATH_CONFLICT: u16 = 4004;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_categorized() {
        assert!((1000..2000).contains(&ErrorCode::CONFIG_INVALID_JSON));
        assert!((2000..3000).contains(&ErrorCode::INPUT_INVALID_JSON));
        assert!((3000..4000).contains(&ErrorCode::STRUCTURE_NOT_A_SEQUENCE));
        assert!((4000..5000).contains(&ErrorCode::OUTPUT_WRITE_FAILED));
    }
}
