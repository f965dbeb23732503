pub mod availability;
pub mod date;
pub mod macros;
pub mod product;
pub mod social;
pub mod user;

pub use availability::*;
pub use date::{format_calendar_date, parse_calendar_date, DateError, YearMonth};
pub use product::*;
pub use social::*;
pub use user::*;
