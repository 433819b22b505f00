#[derive(serde::Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(serde::Deserialize)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query of the login page, set after a successful sign up
#[derive(serde::Deserialize, Debug)]
pub struct LoginQuery {
    pub registered: Option<bool>,
}
