pub mod interval;
pub mod models;
pub mod problems;
pub mod time;
pub mod validation;
pub mod week;
pub mod work_window;
