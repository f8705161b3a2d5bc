pub mod indicators;
pub mod utilities;

pub use indicators::rolling_extrema::{
    rolling_extrema, RollingExtremaBuilder, RollingExtremaError, RollingExtremaInput,
    RollingExtremaOutput, RollingExtremaParams, RollingExtremaStream,
};
pub use utilities::priority_list::{PriorityList, MAX_REMOVALS_PER_SWEEP};
