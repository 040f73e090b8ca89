pub mod base;
pub mod linalg;
pub mod metric;
pub mod naming;
pub mod predefined;

pub use base::RelativityTensor;
pub use metric::{MetricTensor, DEFAULT_METRIC_NAME};
pub use naming::change_name;
