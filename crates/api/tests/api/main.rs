mod helpers;
mod weather_routes;
