pub mod forms;
pub mod model;
