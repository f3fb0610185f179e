pub mod aggregator;
pub mod chart;
pub mod roller;
pub mod sampler;
