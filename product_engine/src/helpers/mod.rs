mod password;

pub use password::{dummy_verify, hash_password, verify_password};
