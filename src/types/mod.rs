pub mod date_range;
pub mod day_of_week;
pub mod pollutant;
