//! Terminal front end: submit a post URL, then print what the results page would show.
//!
//! Usage: `sentirax-fetch <post-url>`

use sentirax_web::flow::{open_results, HomeView};
use sentirax_web::info::HttpInfoClient;
use sentirax_web::preview::PreviewTarget;
use sentirax_web::session::MemorySessionStore;
use sentirax_web::{telemetry, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();

    let Some(input) = std::env::args().nth(1) else {
        eprintln!("usage: sentirax-fetch <post-url>");
        std::process::exit(2);
    };

    let cfg = AppConfig::from_env()?;
    let client = HttpInfoClient::new(&cfg.api_base, cfg.connect_timeout, cfg.request_timeout)?;
    let store = MemorySessionStore::new();

    let home = HomeView::new(input);
    let outcome = home.handle_submit(&client, &store).await;
    if let Some(alert) = outcome.alert {
        eprintln!("{alert}");
        std::process::exit(1);
    }

    let page = match open_results(&store) {
        Ok(p) => p,
        Err(_) => {
            eprintln!("no result to show");
            std::process::exit(1);
        }
    };
    let v = &page.view;

    println!("{}", v.title);
    println!("{}", v.meta);
    if !v.duration.is_empty() {
        println!("Duration: {}", v.duration);
    }
    println!("Status: {}", v.status.label());

    for action in [&v.primary, &v.thumbnail, &v.audio] {
        match action.link(&cfg.api_base) {
            Some(link) => {
                println!("{} ({}): {}  -> {}", action.label, action.sublabel, link.href, link.filename)
            }
            None => println!("{} ({}): unavailable", action.label, action.sublabel),
        }
    }

    match &page.preview {
        Some(PreviewTarget::Embed { embed_url, .. }) => println!("Preview: {embed_url}"),
        Some(PreviewTarget::Audio { src })
        | Some(PreviewTarget::Image { src })
        | Some(PreviewTarget::Video { src, .. }) => println!("Preview: {src}"),
        None => println!("Preview: unavailable"),
    }

    Ok(())
}
