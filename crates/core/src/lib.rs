pub mod category;
pub mod cell;
pub mod money;
pub mod period;
pub mod report;
pub mod transaction;

pub use category::{CategoryError, CategoryStats, CategoryTable, UNCATEGORIZED};
pub use cell::{Cell, RawRecord, RawTable};
pub use money::{parse_amount, parse_amount_str, Money};
pub use period::{MonthKey, WeekKey};
pub use transaction::{Flow, NormalizedTransaction};
