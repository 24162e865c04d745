pub mod implementations;
pub mod optimization;
pub mod traits;
