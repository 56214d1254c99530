pub struct CreateUser {
    pub display_name: String,
    pub email: String,
    pub password: String,
}
