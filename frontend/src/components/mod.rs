pub mod right_col;
pub mod uploads;
