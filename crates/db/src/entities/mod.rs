//! Database entities.

pub mod category;
pub mod food_poll_vote;
pub mod presence_vote;
pub mod restaurant;
pub mod review;
pub mod user;

pub use category::Entity as Category;
pub use food_poll_vote::Entity as FoodPollVote;
pub use presence_vote::Entity as PresenceVote;
pub use restaurant::Entity as Restaurant;
pub use review::Entity as Review;
pub use user::Entity as User;

pub use presence_vote::Presence;
