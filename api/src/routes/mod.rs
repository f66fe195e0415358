pub mod admin;
pub mod catalog;
pub mod chat;
pub mod faq;
pub mod health;
