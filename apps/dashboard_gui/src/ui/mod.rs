//! UI layer for the product dashboard: app shell, product table and add form.

pub mod app;

pub use app::DashboardApp;
