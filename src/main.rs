#[cfg(not(target_arch = "wasm32"))]
fn main() -> keyportal::Result<()> {
    use keyportal::{App, LandingConfig};

    env_logger::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "keyportal.json".to_string());
    let config = LandingConfig::load_or_default(&path);

    App::new(config).run()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
