pub mod jwt;
pub mod password;
pub mod request;
pub mod validation;
