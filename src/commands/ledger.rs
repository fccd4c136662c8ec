// SPDX-License-Identifier: MIT

use anyhow::Result;

use super::App;
use crate::library::Entry;
use crate::models::MediaType;

pub async fn watchlist_add(app: &mut App, media: MediaType, id: u64) -> Result<()> {
    if app.library.in_watchlist(id, media) {
        println!("Already in watchlist.");
        return Ok(());
    }

    // Fetch the title so the stored entry carries a name and poster.
    let details = app.client.details(media, id).await?;
    let entry = Entry::from_details(&details, media);
    let title = entry.title.clone();
    app.library.toggle_watchlist(entry);
    println!("Added \"{}\" to watchlist.", title);
    Ok(())
}

pub fn watchlist_remove(app: &mut App, media: MediaType, id: u64) -> Result<()> {
    if !app.library.in_watchlist(id, media) {
        println!("Not in watchlist.");
        return Ok(());
    }

    app.library.toggle_watchlist(Entry {
        id,
        media_type: media,
        title: String::new(),
        poster_path: None,
        timestamp: chrono::Utc::now(),
    });
    println!("Removed from watchlist.");
    Ok(())
}

pub fn watchlist_list(app: &App) {
    if app.library.watchlist().is_empty() {
        println!("Your watchlist is empty.");
        return;
    }
    println!("Watchlist");
    for entry in app.library.watchlist() {
        println!(
            "  {:>9}  [{}] {}",
            entry.id,
            entry.media_type.as_path(),
            entry.title
        );
    }
}

pub fn history_list(app: &App) {
    if app.library.history().is_empty() {
        println!("No watch history.");
        return;
    }
    println!("History (most recent first)");
    for entry in app.library.history() {
        println!(
            "  {:>9}  [{}] {}  {}",
            entry.id,
            entry.media_type.as_path(),
            entry.title,
            entry.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
}

pub fn history_clear(app: &mut App) {
    app.library.clear_history();
    println!("History cleared.");
}
