//! Mock CDN fixtures and media records

use wedding_export::Media;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of an asset as stored on the CDN
pub fn asset_path(id: &str, ext: &str) -> String {
    format!("/demo/image/upload/v1/{id}.{ext}")
}

/// Path the exporter is expected to request for an asset
pub fn attachment_path(id: &str, ext: &str) -> String {
    format!("/demo/image/upload/fl_attachment/v1/{id}.{ext}")
}

/// Deterministic body for an asset, distinct per id
pub fn asset_body(id: &str) -> Vec<u8> {
    format!("binary content of {id} ").repeat(64).into_bytes()
}

/// A photo record hosted on `server`
pub fn photo_on(server: &MockServer, id: &str) -> Media {
    Media::photo(id, format!("{}{}", server.uri(), asset_path(id, "jpg")))
}

/// A video record hosted on `server`
pub fn video_on(server: &MockServer, id: &str) -> Media {
    Media::video(id, format!("{}{}", server.uri(), asset_path(id, "mp4")))
}

/// Serve `id` at its attachment path, expecting exactly one request
pub async fn serve_asset(server: &MockServer, id: &str, ext: &str) {
    Mock::given(method("GET"))
        .and(path(attachment_path(id, ext)))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Disposition", "attachment")
                .set_body_bytes(asset_body(id)),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Answer `id` with `status`, expecting exactly one request (no retries)
pub async fn fail_asset(server: &MockServer, id: &str, ext: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(attachment_path(id, ext)))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// Reject any request for the un-rewritten asset path
pub async fn forbid_inline_paths(server: &MockServer, ids: &[&str], ext: &str) {
    for id in ids {
        Mock::given(method("GET"))
            .and(path(asset_path(id, ext)))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(server)
            .await;
    }
}
