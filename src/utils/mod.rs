pub mod spreadsheet;
pub mod username_cache;
pub mod username_filter;
pub mod username_index;
