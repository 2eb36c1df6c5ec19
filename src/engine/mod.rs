pub mod alert;
pub mod clock;
pub mod countdown;
pub mod dashboard;
pub mod dispatch;
pub mod queue;
pub mod sequence;
pub mod snooze;
