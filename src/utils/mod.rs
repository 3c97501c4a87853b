mod aggregation;

pub use aggregation::downsample;
