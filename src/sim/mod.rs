pub mod bridge;
pub mod event;
pub mod session;
pub mod step;
pub mod view;
pub mod world;
