pub mod history;
pub mod players;
pub mod session;
