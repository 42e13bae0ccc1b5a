pub mod memory_store;
pub mod mock_config;
