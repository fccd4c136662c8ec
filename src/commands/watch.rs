// SPDX-License-Identifier: MIT

use anyhow::Result;

use super::App;
use crate::library::Entry;
use crate::models::MediaType;
use crate::playback::PlaybackSelection;

/// Resolves an embed URL for a title and records it in the watch history.
/// Server, season, and episode are validated against the configured server
/// list and the title's aired seasons.
pub async fn run(
    app: &mut App,
    media: MediaType,
    id: u64,
    server: Option<usize>,
    season: Option<u32>,
    episode: Option<u32>,
) -> Result<()> {
    let details = app.client.details(media, id).await?;
    let templates = app.config.servers.for_media(media);

    let mut selection = PlaybackSelection::open(id, media, &details.seasons);
    if let Some(index) = server {
        selection.set_server(index, templates.len())?;
    }
    if let Some(number) = season {
        selection.set_season(number)?;
    }
    if let Some(number) = episode {
        selection.set_episode(number)?;
    }

    app.library.record_history(Entry::from_details(&details, media));

    let year = details.year().map(|y| format!(" ({})", y)).unwrap_or_default();
    match media {
        MediaType::Movie => println!("{}{}", details.display_title(), year),
        MediaType::Tv => println!(
            "{}{} - S{:02}E{:02}",
            details.display_title(),
            year,
            selection.season,
            selection.episode
        ),
    }

    println!("\nEmbed URL (server {} of {})", selection.server_index + 1, templates.len());
    println!("  {}", selection.embed_url(templates)?);
    println!("Download");
    println!("  {}", selection.download_url(&app.config.servers.download));

    if media == MediaType::Tv {
        let available = selection.available_seasons();
        if available.is_empty() {
            println!("\nNo aired seasons listed for this title.");
        } else {
            println!("\nSeasons");
            for s in available {
                let marker = if s.season_number == selection.season {
                    ">"
                } else {
                    " "
                };
                println!("{} {} ({} episodes)", marker, s.label(), s.episode_count);
            }
        }
    }

    println!("\nServers");
    for (index, template) in templates.iter().enumerate() {
        let marker = if index == selection.server_index { ">" } else { " " };
        println!("{} {:>2}  {}", marker, index + 1, template);
    }

    Ok(())
}
