use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Minimum password length enforced when creating an account.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Console login name. Trimmed and non-empty.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        TryFrom,
        Into,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct Nickname(String);

/// One console user in the "usuarios" slot.
///
/// The password is stored as entered. Real credential handling is out of
/// scope for the console; the login screen only checks this store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub nickname: Nickname,
    pub password: String,
}
