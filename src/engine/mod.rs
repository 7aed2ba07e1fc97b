pub mod auto_foundation;
pub mod heuristics;
pub mod hinting;
pub mod metrics;
pub mod search;

#[cfg(test)]
mod tests;
