fn main() {
    // ESP-IDF environment propagation is only needed when building the
    // firmware image; host builds (tests, simulation) skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
