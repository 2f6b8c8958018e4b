//! Playlist page rendering
//!
//! The page shell is a static template; each song becomes one list entry
//! with an embedded player, a delete link and a hidden update form.

use playlist_common::api::Song;

const PAGE_TEMPLATE: &str = include_str!("../ui/playlist.html");
const SONGS_PLACEHOLDER: &str = "{{SONGS}}";

const PLAYER_URL: &str = "https://w.soundcloud.com/player/?url=https%3A//api.soundcloud.com/tracks/";
const PLAYER_OPTIONS: &str = "&color=%23ff5500&auto_play=false&hide_related=true&show_comments=false&show_user=false&show_reposts=false&show_teaser=true&visual=true";

/// Render the full page
///
/// `None` renders the page before any list was fetched; an empty slice
/// renders the "No songs available" entry.
pub fn render_page(songs: Option<&[Song]>) -> String {
    let entries = match songs {
        Some(songs) if !songs.is_empty() => songs.iter().map(render_song).collect::<String>(),
        _ => "        <li>No songs available</li>\n".to_string(),
    };
    PAGE_TEMPLATE.replace(SONGS_PLACEHOLDER, &entries)
}

fn render_song(song: &Song) -> String {
    let id = escape_html(&song.id);
    let title = escape_html(&song.title);
    let artist = escape_html(&song.artist);
    let album = escape_html(&song.album);
    let duration = escape_html(&song.duration);
    let link = escape_html(&song.link);
    let player = escape_html(&player_url(&song.link));

    format!(
        r##"        <li>
            <span>{title} - {artist} - {album} - {duration}</span>
            <div class="actions">
                <a href="#" data-song="{id}" onclick="toggleUpdateForm(this.dataset.song); return false;">Update</a>
                <a class="delete" href="/delete?id={id}">Delete</a>
            </div>
            <iframe width="100%" height="166" scrolling="no" frameborder="no" allow="autoplay" src="{player}"></iframe>
            <form id="update-{id}" class="update-form" action="/update" method="post">
                <input type="hidden" name="id" value="{id}">
                <label for="title-{id}">New Title:</label>
                <input type="text" id="title-{id}" name="title" value="{title}">
                <label for="artist-{id}">New Artist:</label>
                <input type="text" id="artist-{id}" name="artist" value="{artist}">
                <label for="album-{id}">New Album:</label>
                <input type="text" id="album-{id}" name="album" value="{album}">
                <label for="duration-{id}">New Duration:</label>
                <input type="text" id="duration-{id}" name="duration" value="{duration}">
                <label for="link-{id}">New Link:</label>
                <input type="text" id="link-{id}" name="link" value="{link}">
                <input type="submit" value="Update Song">
                <a href="/playlist" class="btn btn-back">Back</a>
            </form>
        </li>
"##
    )
}

/// Embedded player address for a SoundCloud track number
pub fn player_url(link: &str) -> String {
    format!("{}{}{}", PLAYER_URL, link, PLAYER_OPTIONS)
}

/// Escape text for use in HTML content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
