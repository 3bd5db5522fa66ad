//! Field bounds shared by the validators and the storage schema.

pub const NAME_LENGTH: usize = 256;
pub const SLUG_LENGTH: usize = 50;
pub const ROLE_LENGTH: usize = 20;
pub const CODE_LENGTH: usize = 255;

pub const USERNAME_LENGTH: usize = 150;
pub const EMAIL_LENGTH: usize = 254;
pub const PERSON_NAME_LENGTH: usize = 150;

/// Inclusive bounds for `Review::score`.
pub const SCORE_MIN: i32 = 1;
pub const SCORE_MAX: i32 = 10;

/// Rejected by `User::validate`.
pub const RESERVED_USERNAME: &str = "me";
