pub mod entry;
pub mod weekly_summary;
