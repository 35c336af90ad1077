// Log sink behind the console_log! macro (defined in lib.rs).
// In the browser this is console.log; natively it goes through the `log` facade.

#[cfg(target_arch = "wasm32")]
pub fn log(s: &str) {
    web_sys::console::log_1(&s.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(s: &str) {
    ::log::debug!(target: "arcgis_pbf", "{}", s);
}
