use serde::Deserialize;

/// Envelope returned by every Flickr REST call with `nojsoncallback=1`.
#[derive(Debug, Deserialize)]
pub struct FlickrResponse {
    /// `"ok"` or `"fail"`.
    pub stat: String,
    /// Listing payload, present when `stat` is `"ok"`.
    pub photos: Option<PhotosPage>,
    /// Error code, present when `stat` is `"fail"`.
    pub code: Option<i64>,
    /// Error message, present when `stat` is `"fail"`.
    pub message: Option<String>,
}

/// One page of photos.
#[derive(Debug, Deserialize)]
pub struct PhotosPage {
    /// Photos on this page.
    #[serde(default)]
    pub photo: Vec<PhotoEntry>,
}

/// A single photo entry.
#[derive(Debug, Deserialize)]
pub struct PhotoEntry {
    /// Photo ID.
    pub id: String,
    /// Photo title.
    #[serde(default)]
    pub title: String,
    /// Small thumbnail URL, only present when requested through `extras`.
    pub url_s: Option<String>,
}
