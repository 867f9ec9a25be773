pub mod constants;
pub mod placeholders;
pub mod timestamps;

pub use constants::*;
pub use placeholders::{count_format_placeholders, count_placeholders, to_positional};
pub use timestamps::{format_naive, format_utc_micros};
