pub mod case_api;
pub mod search_index;
