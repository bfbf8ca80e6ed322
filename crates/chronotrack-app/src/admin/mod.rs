mod manager;

pub use manager::{AdminAnalytics, AdminManager, UserUsage};
