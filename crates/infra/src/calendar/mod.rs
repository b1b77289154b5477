//! Google Calendar integration

mod client;
mod types;

pub use client::GoogleCalendarClient;
