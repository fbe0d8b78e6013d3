fn main() {
    // Host builds (tests, fuzzing) have no ESP-IDF toolchain to wire up.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
