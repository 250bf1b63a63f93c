pub mod inner_product;
pub mod error;
pub mod config;
pub mod domain;
pub mod accumulator;
pub mod estimator;
pub mod reader;
pub mod report;
pub mod synth;

pub use accumulator::{CorrelationAccumulator, LagObserver, TraceObserver};
pub use config::{AutocrrConfig, DEFAULT_THRESHOLD};
pub use error::{AutocrrError, Result};
pub use estimator::CorrelationCurve;
pub use reader::{DataSet, DataSetReader, ParseContext};
