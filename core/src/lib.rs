pub mod accounts;
pub mod backend;
pub mod filter;
pub mod store;
pub mod types;

pub use accounts::AccountStore;
pub use filter::FilterQuery;
pub use store::RecordStore;
