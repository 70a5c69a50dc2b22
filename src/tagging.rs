/*!
 * Metadata tags for finished files.
 */

use id3::{ErrorKind, Tag, TagLike, Version};
use std::fmt::Debug;
use std::path::Path;

use crate::errors::TagError;

/// Title, artist and album of one drill file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackTags {
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// Writes metadata into a finished audio file
pub trait TagWriter: Send + Sync + Debug {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TagError>;
}

/// ID3v2.4 tag writer
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagWriter;

impl Id3TagWriter {
    /// Read the tags back, mostly useful for checking output
    pub fn read_tags(path: &Path) -> Result<TrackTags, TagError> {
        let tag = Tag::read_from_path(path).map_err(|e| tag_error(path, e))?;
        Ok(TrackTags {
            title: tag.title().unwrap_or_default().to_string(),
            artist: tag.artist().unwrap_or_default().to_string(),
            album: tag.album().unwrap_or_default().to_string(),
        })
    }
}

impl TagWriter for Id3TagWriter {
    fn write_tags(&self, path: &Path, tags: &TrackTags) -> Result<(), TagError> {
        // Keep any frames already present, only the three fields are replaced
        let mut tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Tag::new(),
            Err(e) => return Err(tag_error(path, e)),
        };

        tag.set_title(tags.title.as_str());
        tag.set_artist(tags.artist.as_str());
        tag.set_album(tags.album.as_str());

        tag.write_to_path(path, Version::Id3v24)
            .map_err(|e| tag_error(path, e))
    }
}

fn tag_error(path: &Path, error: id3::Error) -> TagError {
    TagError::Write {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}
