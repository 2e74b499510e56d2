pub mod fetch_flow;

pub use fetch_flow::FetchFlow;
