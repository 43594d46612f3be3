//! Database repositories.

mod category;
mod food_poll_vote;
mod presence_vote;
mod restaurant;
mod review;
mod user;

pub use category::CategoryRepository;
pub use food_poll_vote::FoodPollVoteRepository;
pub use presence_vote::PresenceVoteRepository;
pub use restaurant::RestaurantRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
