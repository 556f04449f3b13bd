pub mod driver;
pub mod report;

pub use driver::{Sweep, SweepConfig};
pub use report::{Metrics, ReportRow, write_table};
