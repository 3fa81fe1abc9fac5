use std::path::Path;

use color_eyre::Result;
use color_eyre::eyre::Context;

use crate::playlist::Playlist;
use crate::services::catalog::Catalog;

/// Reads a playlist file, resolves it and writes one URI per line.
///
/// The output file is only written once every query has resolved, so a failed
/// run leaves no output behind. Returns the number of URIs written.
pub async fn export_playlist(
    input: &Path,
    output: &Path,
    catalog: &Catalog,
    album_limit: Option<i64>,
) -> Result<usize> {
    let text = tokio::fs::read_to_string(input)
        .await
        .wrap_err_with(|| format!("Failed to read playlist: {}", input.display()))?;

    let mut playlist = Playlist::parse(&text).with_album_limit(album_limit);
    log::info!(
        "Resolving {} queries from {}",
        playlist.queries().len(),
        input.display()
    );

    let rendered = playlist
        .dispatch(catalog)
        .await
        .wrap_err_with(|| format!("Failed to resolve playlist: {}", input.display()))?;

    tokio::fs::write(output, &rendered)
        .await
        .wrap_err_with(|| format!("Failed to write output: {}", output.display()))?;

    Ok(rendered.lines().count())
}
