pub mod utils;

mod schedules;
