mod ballot;
mod identity;
mod poll;
mod results;
mod user;

pub use ballot::{Ballot, BallotId, CreateBallot};
pub use identity::Identity;
pub use poll::{CreatePoll, Poll, PollId};
pub use results::{OptionTally, PollResults};
pub use user::{CreateUser, User, UserCredentials, UserId};
