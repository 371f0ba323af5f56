use multitable::{error, info, load_settings, RedbCollection};
use school::demo;

#[tokio::main]
async fn main() {
    let settings = match load_settings("config/settings", "MULTITABLE") {
        Ok(settings) => settings,
        Err(e) => {
            error!("Unable to load settings: {}", e);
            std::process::exit(1);
        }
    };
    let result = match RedbCollection::open(&settings).await {
        Ok(collection) => demo(collection).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(()) => info!("Demo finished"),
        Err(e) => {
            error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
