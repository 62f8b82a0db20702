pub mod audit;
pub mod auth;
pub mod board;
pub mod dispatch;
pub mod import;
pub mod issue;
pub mod seed;
pub mod serve;
pub mod shared;
pub mod worker;
