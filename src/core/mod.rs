pub mod calendar;
pub mod expense_manager;
pub mod services;
pub mod time;
pub mod utils;

pub use calendar::{CalendarFrame, DateKey, MAX_WINDOW_DAYS};
pub use expense_manager::ExpenseManager;
pub use time::{Clock, FixedClock, SystemClock};
