pub mod bridge;
pub mod config;
pub mod inbound;
pub mod outbound;
