/// Database types for user credentials

#[derive(Debug, Clone)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub subject: String,
}
