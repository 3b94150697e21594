//! Spot curve construction and forward-rate extraction.

pub mod analysis;
pub mod forward;
pub mod spot_curve;
pub mod tenor;

pub use analysis::{
    analyze_forward_rate, analyze_spot_curve, ForwardRateInput, ForwardRateOutput, SpotCurveInput,
};
pub use forward::{forward_rate, interpolate_spot};
pub use spot_curve::{build_spot_curve, build_spot_curve_with_unit, SpotCurve, SpotPoint, SwapQuote};
pub use tenor::{parse_tenor_label, Tenor};
