pub mod evaluate_work_item;
pub mod ports;
