pub mod decode_token;
pub mod login;
pub mod register;
