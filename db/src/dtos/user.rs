pub struct UserCreateRequest {
    /// Already normalized (trimmed, lower-cased).
    pub email: String,
    pub name: String,
    pub password_hash: String,
}
