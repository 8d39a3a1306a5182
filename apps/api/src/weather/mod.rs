pub mod card;
pub mod handlers;
pub mod openweather;
pub mod wttr;

pub use openweather::OpenWeatherClient;
