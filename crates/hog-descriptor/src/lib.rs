#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// block grouping and L2 normalization.
pub mod block;

/// per-cell orientation histograms.
pub mod cell;

/// orientation binning with linear interpolation.
pub mod binning;

/// descriptor configuration and derived geometry.
pub mod config;

/// error types for the descriptor pipeline.
pub mod error;

/// centered finite difference gradients.
pub mod gradient;

/// observers of the intermediate artifacts.
pub mod observer;

/// module containing parallization utilities.
pub mod parallel;

/// the end to end descriptor pipeline.
pub mod pipeline;

/// gradient magnitude and orientation.
pub mod polar;

pub use crate::binning::{OrientationBinner, OrientationVote};
pub use crate::cell::CellHistograms;
pub use crate::config::{AngleConvention, HogConfig, HogLayout};
pub use crate::error::HogError;
pub use crate::gradient::GradientField;
pub use crate::observer::{HogObserver, NoopObserver, RecordingObserver};
pub use crate::parallel::ExecutionStrategy;
pub use crate::pipeline::{HogDescriptor, HogPipeline};
pub use crate::polar::PolarField;
