mod manager;

pub use manager::{BoardManager, BoardUpdate, NewBoard, NewTask, TaskUpdate};
