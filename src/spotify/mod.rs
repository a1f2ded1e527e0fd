//! Spotify Web API integration
//!
//! Supplies track candidates and album tracklists for matching.
//! Authentication uses the client-credentials flow; tokens are cached
//! through a [`TokenStore`] so repeated runs skip the exchange.
//!
//! API docs: https://developer.spotify.com/documentation/web-api

pub mod dto;
mod adapter;
mod auth;
mod client;
mod retry;

pub use auth::{AccessToken, Credentials, TokenStore};
pub use client::SpotifyClient;
pub use retry::RetryPolicy;
