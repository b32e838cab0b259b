pub mod asana;
pub mod dispatch;
pub mod formatter;
pub mod hosts;
pub mod logging;
pub mod platform;
pub mod suggest;
pub mod token;
