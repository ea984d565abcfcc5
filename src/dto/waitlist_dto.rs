//! DTO de la lista de espera

use serde::Deserialize;
use validator::Validate;

/// Request para anotarse en la lista de espera
#[derive(Debug, Deserialize, Validate)]
pub struct JoinWaitlistRequest {
    #[validate(email)]
    pub email: String,
}
