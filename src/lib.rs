pub mod analysis;
pub mod analysis_export;
pub mod config;
pub mod fields;
pub mod flags;
pub mod form;
pub mod generate;
pub mod half_data;
pub mod http_client;
pub mod index_block;
pub mod league_table;
pub mod persist;
pub mod ppg_block;
pub mod prompts;
pub mod raw_data;
pub mod resilience;
pub mod results;
pub mod segments;
pub mod session_store;
pub mod tokenize;
pub mod venue_block;
pub mod volatility;
