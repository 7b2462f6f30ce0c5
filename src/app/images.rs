use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use eframe::egui::{ColorImage, Context, TextureHandle, TextureOptions};

#[derive(Debug)]
struct DecodedImage {
    width: usize,
    height: usize,
    rgba: Vec<u8>,
}

/// Background thumbnail loader. Each node's image is fetched and decoded
/// off the render thread; completions land as egui textures on whatever
/// frame polls them first. A failure marks the URL so the node keeps its
/// placeholder card instead of retrying forever.
pub struct ImageLoader {
    pending: HashMap<String, Receiver<Result<DecodedImage>>>,
    loaded: HashMap<String, TextureHandle>,
    failed: HashSet<String>,
}

fn fetch_and_decode(url: &str) -> Result<DecodedImage> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()?;
    let bytes = client.get(url).send()?.error_for_status()?.bytes()?;

    let decoded = image::load_from_memory(&bytes)?.into_rgba8();
    Ok(DecodedImage {
        width: decoded.width() as usize,
        height: decoded.height() as usize,
        rgba: decoded.into_raw(),
    })
}

impl ImageLoader {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Requests a fetch unless the URL is already loaded, in flight, or
    /// known to have failed.
    pub fn request(&mut self, url: &str) {
        if self.loaded.contains_key(url)
            || self.pending.contains_key(url)
            || self.failed.contains(url)
        {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let url_owned = url.to_owned();
        thread::spawn(move || {
            let result = fetch_and_decode(&url_owned);
            let _ = tx.send(result);
        });
        self.pending.insert(url.to_owned(), rx);
    }

    /// Drains completed fetches into textures. Called once per frame;
    /// never blocks the simulation tick.
    pub fn poll(&mut self, ctx: &Context) {
        let mut completed = Vec::new();
        for (url, rx) in &self.pending {
            let Ok(result) = rx.try_recv() else {
                continue;
            };
            match result {
                Ok(decoded) => {
                    let color_image = ColorImage::from_rgba_unmultiplied(
                        [decoded.width, decoded.height],
                        &decoded.rgba,
                    );
                    let texture = ctx.load_texture(url.clone(), color_image, TextureOptions::LINEAR);
                    self.loaded.insert(url.clone(), texture);
                }
                Err(error) => {
                    log::warn!("image load failed for {url}, using placeholder: {error:#}");
                    self.failed.insert(url.clone());
                }
            }
            completed.push(url.clone());
        }
        for url in completed {
            self.pending.remove(&url);
        }
    }

    pub fn texture(&self, url: &str) -> Option<&TextureHandle> {
        self.loaded.get(url)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_carry_their_cause() {
        let error = fetch_and_decode("not a url").unwrap_err();
        assert!(!format!("{error:#}").is_empty());
    }
}
