pub const TIMEOUT_SENTINEL: &str = "TIMEOUT";
pub const ENROLL_COUNT_PARAM: &str = "enrollCount";
pub const DIGITS_PARAM: &str = "digits";
pub const ENROLL_DIGIT: &str = "1";
pub const GATHER_TIMEOUT_SECONDS: u32 = 3;
pub const GATHER_NUM_DIGITS: u32 = 1;
pub const RECORDING_MAX_LENGTH_SECONDS: u32 = 5;
pub const AUTHENTICATION_FINISH_KEY: &str = "#";
pub const WAV_EXTENSION: &str = ".wav";
pub const ENROLLMENT_SUCCESS_RESULT: &str = "Success";
pub const TEST_PHONE_NUMBER: &str = "+15551230000";
