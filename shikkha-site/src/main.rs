mod app;
mod components;
mod context;
mod pages;
mod platform;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<app::App>::new().render();
}
