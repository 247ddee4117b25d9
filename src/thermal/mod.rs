pub mod gradient;
pub mod hotspot;
pub mod units;
