pub mod auth;
pub mod complaints;
pub mod dashboard;
pub mod issues;
pub mod workers;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Success {
    pub success: bool,
}

pub const SUCCESS: Success = Success { success: true };
