pub(crate) mod config;
pub use config::{AppConfig, AppConfigError, Config};

pub(crate) mod field;
pub use field::{FieldName, UnknownField};

pub(crate) mod record;
pub use record::{Draft, Estado, Record, RecordId, UnknownEstado};

pub(crate) mod account;
pub use account::{Account, MIN_PASSWORD_LEN, Nickname, NicknameError};
