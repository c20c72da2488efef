mod cycle;
mod fetchers;
mod helpers;
