use serde::Serialize;

use crate::dto::users::UserDto;

/// Signed-in user with a fresh session token.
#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub user: UserDto,
    pub token: String,
}

/// Name of a file stored by the generic upload endpoint.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct UploadedName {
    pub name: String,
}
