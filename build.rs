fn main() {
    println!("cargo:rerun-if-changed=monitor.json");

    // Host builds (no `espidf` feature) need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
