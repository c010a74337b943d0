pub mod category;
pub mod money;
pub mod summary;
pub mod transaction;

pub use category::{Category, UnknownCategory};
pub use money::Money;
pub use summary::Summary;
pub use transaction::{Transaction, DEFAULT_STATUS};
