//! Business logic services.

#![allow(missing_docs)]

pub mod catalog;
pub mod poll;
pub mod review;
pub mod statistics;
pub mod tally;
pub mod user;
pub mod weather;
pub mod weather_codes;

pub use catalog::{CatalogService, RestaurantListing};
pub use poll::{
    FoodPollSnapshot, FoodVoteTransition, PollService, PresencePollSnapshot, PresenceTransition,
};
pub use review::{CreateReviewInput, RECENT_REVIEWS_LIMIT, ReviewListing, ReviewService};
pub use statistics::{Statistics, StatisticsService};
pub use tally::{
    CategoryTally, FoodPollData, PresenceData, PresenceTally, VoteIndex, tally_food_votes,
    tally_presence,
};
pub use user::{AdminCreateUserInput, RegisterInput, UserDeletion, UserService};
pub use weather::{
    HourlyForecast, HourlySeries, OpenMeteoClient, WeatherClient, WeatherError, WeatherReport,
    WeatherService, build_report, next_friday, parse_timezone,
};
