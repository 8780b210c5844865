pub mod navigate;
pub mod projects;
pub mod session;
