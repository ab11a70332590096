//! Shared constants for vault tests

pub const TEST_TOKEN: &str = "pts_test_token";
pub const BEARER_TEST_TOKEN: &str = "Bearer pts_test_token";

pub const ID_DB_PASSWORD: &str = "pvi_db_password";
pub const ID_API_KEY: &str = "pvi_api_key";
pub const ID_SERVICE_TOKEN: &str = "pvi_service_token";

pub const DB_PASSWORD: &str = "correct-horse-battery-staple";
pub const API_KEY: &str = "ak_live_123";
pub const SERVICE_TOKEN: &str = "pts_service";
