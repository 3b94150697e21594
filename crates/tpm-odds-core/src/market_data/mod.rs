//! Normalisation of central bank swap-rate series into model inputs.

pub mod siete;
pub mod table;

pub use siete::{
    series_label, swap_series_catalogue, Observation, SeriesInfo, SeriesObservationsResponse,
    SeriesSearchResponse, SwapCurrency, SwapSeries,
};
pub use table::{pivot_observations, LabelledObservations, SwapRateRow, SwapRateTable};
