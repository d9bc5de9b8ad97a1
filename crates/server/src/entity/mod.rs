pub mod option;
pub mod question;
pub mod quiz;
