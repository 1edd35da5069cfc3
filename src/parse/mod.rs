mod date;
mod fetch;
mod record;
mod repeat;
mod slug;

pub use date::{compact_token, normalize_date, parse_timestamp, DISPLAY_FORMAT};
pub use fetch::get_raw_records;
pub use record::*;
pub use repeat::normalize_recurrence;
pub use slug::{keywordize, slugify};
