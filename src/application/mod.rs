pub mod bootstrap;
pub mod commands;
pub mod scheduler;
pub mod task_fitter;
