#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{render_scene_to_png, RenderConfig, Scene};

/// Route `tracing` output through `env_logger`. Honors `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
