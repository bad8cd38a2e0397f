pub mod query_bar;
pub mod results;
pub mod status_bar;
