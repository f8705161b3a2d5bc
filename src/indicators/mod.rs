pub mod rolling_extrema;

pub use rolling_extrema::{
    rolling_extrema, RollingExtremaBuilder, RollingExtremaError, RollingExtremaInput,
    RollingExtremaOutput, RollingExtremaParams, RollingExtremaStream,
};
