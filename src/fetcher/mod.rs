//! Asset retrieval
//!
//! The exporter talks to the network only through the [`AssetFetcher`] trait,
//! so the archive pipeline can be driven by any byte source.
//!
//! - [`HttpFetcher`]: reqwest-backed fetcher used in production
//!
//! ## Usage
//!
//! ```no_run
//! use wedding_export::fetcher::{AssetFetcher, HttpFetcher};
//! use wedding_export::config::FetchConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = HttpFetcher::new(&FetchConfig::default())?;
//!
//!     match fetcher.fetch("https://res.cloudinary.com/demo/image/upload/fl_attachment/a1.jpg").await {
//!         Ok(bytes) => println!("got {} bytes", bytes.len()),
//!         Err(e) => println!("skipping: {e}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod http;
mod traits;

pub use http::HttpFetcher;
pub use traits::AssetFetcher;
