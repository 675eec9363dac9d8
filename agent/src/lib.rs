pub mod executions;
pub mod gateway_in;
pub mod order_book;

// Re-export gateway_in as gateway for shorter paths
pub use gateway_in as gateway;
