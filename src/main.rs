use wiremesh::{SceneLayout, ViewerConfig, WireMeshApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = ViewerConfig::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "single" => config = config.with_layout(SceneLayout::Single),
            "rings" => config = config.with_layout(SceneLayout::Rings),
            "--mouse-look" => config = config.with_mouse_look(true),
            other => log::warn!("Ignoring unknown argument {other}"),
        }
    }

    log::info!("Starting {} ({:?})", config.title, config.layout);
    WireMeshApp::new(config)?.run()
}
