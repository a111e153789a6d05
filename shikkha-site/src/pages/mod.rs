pub mod admin;
pub mod catalog;
pub mod dashboard;
pub mod login;
pub mod player;
pub mod teach;
