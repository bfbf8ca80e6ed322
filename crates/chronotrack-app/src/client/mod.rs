mod manager;

pub use manager::{ClientManager, ClientUpdate, NewClient};
