pub mod create;
pub mod heuristics;
pub mod judge;
pub mod optimize;
pub mod replay;
pub mod synthesize;
