// SPDX-License-Identifier: MIT

pub mod cache;
pub mod commands;
pub mod config;
pub mod library;
pub mod models;
pub mod playback;
pub mod providers;
pub mod tmdb;

pub use cache::RequestCache;
pub use config::Config;
pub use library::Library;
pub use playback::PlaybackSelection;
pub use providers::ProviderResolver;
pub use tmdb::TmdbClient;
