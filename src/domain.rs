mod submission;
mod waitlist_email;

pub use submission::*;
pub use waitlist_email::WaitlistEmail;
