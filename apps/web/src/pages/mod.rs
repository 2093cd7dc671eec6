//! Page Components

mod dashboard;
mod session;

pub use dashboard::Dashboard;
pub use session::SessionView;
