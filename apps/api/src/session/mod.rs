// Session State Store and the HTTP surface around it.
// Global UI state is replaced by explicit per-session objects in SessionStore.

pub mod handlers;
pub mod report;
pub mod store;
pub mod view;
