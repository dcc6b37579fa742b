pub mod activity;
pub mod award;
pub mod event;
pub mod message;
pub mod team;
pub mod team_metric;
pub mod user;

pub use activity::Activity;
pub use award::Award;
pub use event::{Event, EventType, Rsvp, RsvpStatus};
pub use message::Message;
pub use team::{JoinRequest, JoinRequestStatus, Team};
pub use team_metric::TeamMetric;
pub use user::{Badge, User, UserRole};
