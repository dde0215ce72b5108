pub mod year_2015;
pub mod year_2020;
