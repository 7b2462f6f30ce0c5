mod app;
mod content;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON content source. Falls back to the embedded sample set.
    #[arg(long)]
    content_path: Option<String>,

    /// Base URL used to resolve relative outbound links on nodes.
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "content-atlas",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ContentAtlasApp::new(
                cc,
                args.content_path.clone(),
                args.base_url.clone(),
            )))
        }),
    )
}
